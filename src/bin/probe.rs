// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The main routine of `probe`.
//!
//! Runs the closure probe program and writes every value the factory emits to stdout.

use log::*;
use std::env;

use closure_probe::driver;
use closure_probe::util::options::ProbeOptions;

fn main() {
    // Initialize loggers.
    if env::var("PROBE_LOG").is_ok() {
        let e = env_logger::Env::new()
            .filter("PROBE_LOG")
            .write_style("PROBE_LOG_STYLE");
        env_logger::init_from_env(e);
    }

    // Get any options specified via the PROBE_FLAGS environment variable
    let mut options = ProbeOptions::default();
    let probe_flags = env::var("PROBE_FLAGS").unwrap_or_default();
    let env_args: Vec<String> = serde_json::from_str(&probe_flags).unwrap_or_default();
    options.parse_from_args(&env_args[..], true);

    // Let arguments supplied on the command line override the environment variable.
    let args = env::args_os()
        .enumerate()
        .map(|(i, arg)| {
            arg.into_string().unwrap_or_else(|arg| {
                eprintln!("Argument {i} is not valid Unicode: {arg:?}");
                std::process::exit(2)
            })
        })
        .collect::<Vec<_>>();
    options.parse_from_args(args.get(1..).unwrap_or(&[]), false);
    info!("Probe options: {:?}", options);

    let stdout = std::io::stdout();
    let exit_code = match driver::run(&options, stdout.lock()) {
        Ok(_) => 0,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("probe: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}
