// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;
use std::io::{BufWriter, Result, Write};

use crate::graph::call_graph::CallGraph;
use crate::runtime::call_site::CallType;
use crate::runtime::trace::Trace;

pub fn call_graph_stat<W: Write>(
    call_graph: &CallGraph,
    trace: &Trace,
    stat_writer: &mut BufWriter<W>,
) -> Result<()> {
    let num_funcs = call_graph.node_count();
    let num_call_edges = call_graph.edge_count();
    let num_closures = call_graph
        .graph
        .node_weights()
        .filter(|node| node.func.name.starts_with("closure#"))
        .count();

    let emitted: Vec<String> = trace.emitted().map(|v| v.to_string()).collect();
    // Emitted values are compared by their printed form, which is what the output shows.
    let distinct_emitted = emitted.iter().collect::<HashSet<_>>().len();

    writeln!(stat_writer, "##########################################################")?;
    writeln!(stat_writer, "Call Graph Statistics:")?;
    writeln!(stat_writer, "#Functions: {}", num_funcs)?;
    writeln!(stat_writer, "#Closures created: {}", num_closures)?;
    writeln!(stat_writer, "#Call graph edges: {}", num_call_edges)?;
    for call_type in CallType::all() {
        writeln!(
            stat_writer,
            "  #{} calls: {}",
            call_type,
            call_graph.edge_count_of(call_type)
        )?;
    }
    writeln!(stat_writer, "Observation Statistics:")?;
    writeln!(stat_writer, "#Observations: {}", trace.len())?;
    writeln!(stat_writer, "#Emitted lines: {}", emitted.len())?;
    writeln!(stat_writer, "#Distinct emitted values: {}", distinct_emitted)?;
    for call_type in [CallType::Method, CallType::Explicit] {
        for receiver in trace.receivers(call_type) {
            writeln!(stat_writer, "Receiver of {} call: {}", call_type, receiver)?;
        }
    }
    writeln!(stat_writer, "##########################################################")?;
    stat_writer.flush()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::runtime::call_site::CallSite;
    use crate::runtime::value::{FuncId, FuncRef, Value};

    #[test]
    fn stat_lines() {
        let top = FuncRef::new(FuncId(0), "<top>");
        let closure = FuncRef::new(FuncId(5), "closure#5");
        let mut cg = CallGraph::new();
        cg.add_edge(CallSite::new(0, CallType::Closure), &top, &closure);
        let mut trace = Trace::new();
        trace.push_receiver(CallType::Method, Value::Undefined);
        trace.push_emitted("<top>".to_owned(), Value::from(1));
        trace.push_emitted("closure#5".to_owned(), Value::from(1));

        let mut writer = BufWriter::new(Vec::new());
        call_graph_stat(&cg, &trace, &mut writer).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(text.contains("#Functions: 2"));
        assert!(text.contains("#Closures created: 1"));
        assert!(text.contains("  #closure calls: 1"));
        assert!(text.contains("#Emitted lines: 2"));
        assert!(text.contains("#Distinct emitted values: 1"));
        assert!(text.contains("Receiver of method call: undefined"));
    }
}
