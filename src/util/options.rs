// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Probe options.

use itertools::Itertools;
use log::*;

use clap::{Arg, Command};

use crate::runtime::receiver::ExecutionMode;
use crate::runtime::value::Value;

const PROBE_USAGE: &str = r#"probe [OPTIONS] [ARGS]... [-- ARGS...]"#;

/// Creates the clap::Command metadata for argument parsing.
fn make_options_parser() -> Command<'static> {
    // No `default_value`s here: options parsed from the environment first must survive a
    // command line that does not mention them, so defaults live in `ProbeOptions::default`.
    let parser = Command::new("probe")
        .no_binary_name(true)
        .override_usage(PROBE_USAGE)
        .version(env!("CARGO_PKG_VERSION"))
        .allow_negative_numbers(true)
        .arg(Arg::new("mode")
            .long("mode")
            .takes_value(true)
            .value_parser(["strict", "sloppy", "script", "module"])
            .help("The execution mode deciding the ambient top-level receiver. [default: strict]")
            .long_help("strict: the ambient receiver is undefined. sloppy (or script): it is \
                the global object. module: it is the module's export object."))
        .arg(Arg::new("capture")
            .long("capture")
            .takes_value(true)
            .allow_hyphen_values(true)
            .help("The value the factory is first called with. [default: 1]"))
        .arg(Arg::new("factory-only")
            .long("factory-only")
            .takes_value(false)
            .help("Call the factory once and discard the closure it returns."))
        .arg(Arg::new("dump-stats")
            .long("dump-stats")
            .takes_value(false)
            .help("Print statistics of the run to stderr."))
        .arg(Arg::new("trace-output")
            .long("dump-trace")
            .takes_value(true)
            .help("Dump the observation trace as JSON to the output file."))
        .arg(Arg::new("call-graph-output")
            .long("dump-call-graph")
            .takes_value(true)
            .help("Dump the call graph in DOT format to the output file."))
        .arg(Arg::new("ARGS")
            .multiple_values(true)
            .help("Arguments the closure is called with, one call each. [default: 1 2 3]")
        );
    parser
}

#[derive(Clone, Debug)]
pub struct ProbeOptions {
    pub mode: ExecutionMode,
    pub capture: Value,
    pub closure_args: Vec<Value>,
    pub factory_only: bool,

    pub dump_stats: bool,
    pub trace_output: Option<String>,
    pub call_graph_output: Option<String>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Strict,
            capture: Value::from(1),
            closure_args: vec![Value::from(1), Value::from(2), Value::from(3)],
            factory_only: false,
            dump_stats: false,
            trace_output: None,
            call_graph_output: None,
        }
    }
}

impl ProbeOptions {
    /// Parses options from a list of strings. Anything after the leftmost `--` token is
    /// taken verbatim as closure arguments.
    ///
    /// Options from the environment (`from_env`) that fail to parse are ignored with a
    /// warning; on the command line they are reported and the process exits.
    pub fn parse_from_args(&mut self, args: &[String], from_env: bool) {
        let mut probe_args_end = args.len();
        let mut trailing_args: &[String] = &[];
        if let Some((p, _)) = args.iter().find_position(|s| s.as_str() == "--") {
            probe_args_end = p;
            trailing_args = &args[p + 1..];
        }
        let probe_args = &args[0..probe_args_end];

        let matches = match make_options_parser().try_get_matches_from(probe_args.iter()) {
            Ok(matches) => matches,
            Err(e) if from_env => {
                warn!("Ignoring PROBE_FLAGS: {}", e);
                return;
            }
            Err(e) => e.exit(),
        };

        if let Some(mode) = matches.get_one::<String>("mode") {
            match mode.parse() {
                Ok(mode) => self.mode = mode,
                Err(e) => warn!("{}", e),
            }
        }

        if let Some(capture) = matches.get_one::<String>("capture") {
            self.capture = Value::from_literal(capture);
        }

        self.factory_only |= matches.contains_id("factory-only");
        self.dump_stats |= matches.contains_id("dump-stats");
        if let Some(s) = matches.get_one::<String>("trace-output") {
            self.trace_output = Some(s.clone());
        }
        if let Some(s) = matches.get_one::<String>("call-graph-output") {
            self.call_graph_output = Some(s.clone());
        }

        let mut closure_args: Vec<Value> = matches
            .get_many::<String>("ARGS")
            .map(|args| args.map(|s| Value::from_literal(s)).collect())
            .unwrap_or_default();
        closure_args.extend(trailing_args.iter().map(|s| Value::from_literal(s)));
        if !closure_args.is_empty() {
            self.closure_args = closure_args;
        }
    }
}
