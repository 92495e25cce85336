// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The probe program and its entry point.
//!
//! The program is a fixed statement sequence:
//!
//! ```text
//! aggregate.probe.probe();
//! aggregate.probe.probe.call(<ambient receiver>);
//! let f = aggregate.factory(<capture>);
//! f(<arg>);   // once per closure argument, results discarded
//! ```

use anyhow::{Context, Result};
use log::*;
use std::io::{self, Write};

use crate::runtime::aggregate::Aggregate;
use crate::runtime::closure::{Closure, Invocable};
use crate::runtime::value::Value;
use crate::runtime::ProbeContext;
use crate::util::options::ProbeOptions;
use crate::util::results_dumper;

/// Runs the probe program against `out` as configured by `options`, then dumps the
/// requested results. Returns the context so callers can inspect what was observed.
pub fn run<W: Write>(options: &ProbeOptions, out: W) -> Result<ProbeContext<W>> {
    let mut cx = ProbeContext::new(options.mode, out);
    info!("Running probe in {} mode", options.mode);

    let result = if options.factory_only {
        run_factory_only(&mut cx, options.capture.clone())
    } else {
        run_program(&mut cx, options.capture.clone(), &options.closure_args).map(|_| ())
    };
    result.context("Failed to write to the output stream")?;
    cx.flush().context("Failed to flush the output stream")?;

    results_dumper::dump_results(&cx, options)?;
    Ok(cx)
}

/// Runs the full statement sequence and returns the closure bound to `f`.
pub fn run_program<W: Write>(
    cx: &mut ProbeContext<W>,
    capture: Value,
    closure_args: &[Value],
) -> io::Result<Closure> {
    let aggregate = Aggregate::new(cx);

    let implicit = aggregate.probe_implicit(cx);
    let ambient = cx.realm().ambient_receiver();
    let explicit = aggregate.probe_explicit(cx, ambient);
    debug!("Implicit receiver: {}, explicit receiver: {}", implicit, explicit);

    let f = aggregate.call_factory(cx, capture)?;
    for arg in closure_args {
        // Each call returns a fresh closure, which the program drops.
        f.invoke(cx, arg.clone())?;
    }
    Ok(f)
}

/// Calls the factory once and discards the closure it returns.
pub fn run_factory_only<W: Write>(cx: &mut ProbeContext<W>, capture: Value) -> io::Result<()> {
    let aggregate = Aggregate::new(cx);
    aggregate.call_factory(cx, capture)?;
    Ok(())
}
