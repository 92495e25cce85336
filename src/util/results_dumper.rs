// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use log::*;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::graph::call_graph::CallGraph;
use crate::runtime::trace::Trace;
use crate::runtime::ProbeContext;
use crate::util::call_graph_stat::call_graph_stat;
use crate::util::options::ProbeOptions;

pub fn dump_results<W: Write>(cx: &ProbeContext<W>, options: &ProbeOptions) -> Result<()> {
    // dump the observation trace
    if let Some(trace_output) = &options.trace_output {
        info!("Dumping observation trace...");
        dump_trace(cx.trace(), Path::new(trace_output))?;
    }

    // dump call graph
    if let Some(cg_output) = &options.call_graph_output {
        info!("Dumping call graph...");
        dump_call_graph(cx.call_graph(), Path::new(cg_output))?;
    }

    if options.dump_stats {
        let stderr = std::io::stderr();
        let mut stat_writer = BufWriter::new(stderr.lock());
        call_graph_stat(cx.call_graph(), cx.trace(), &mut stat_writer)
            .context("Failed to write statistics")?;
    }
    Ok(())
}

pub fn dump_trace(trace: &Trace, trace_path: &Path) -> Result<()> {
    let json = trace.to_json().context("Failed to serialize the observation trace")?;
    std::fs::write(trace_path, json)
        .with_context(|| format!("Failed to write trace output {}", trace_path.display()))
}

pub fn dump_call_graph(call_graph: &CallGraph, dot_path: &Path) -> Result<()> {
    std::fs::write(dot_path, call_graph.to_dot())
        .with_context(|| format!("Failed to write dot file output {}", dot_path.display()))
}
