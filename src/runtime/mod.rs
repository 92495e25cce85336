// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The probe runtime: values, receivers, closures and the context they run in.

use log::*;
use std::io::{self, Write};

use self::call_site::{CallSite, CallType};
use self::receiver::{ExecutionMode, Realm};
use self::trace::Trace;
use self::value::{FuncId, FuncRef, ObjectId, ObjectRef, Value};
use crate::graph::call_graph::CallGraph;

pub mod aggregate;
pub mod call_site;
pub mod closure;
pub mod receiver;
pub mod trace;
pub mod value;

/// The name of the pseudo-function standing for top-level code.
pub const TOP_LEVEL: &str = "<top>";

/// Everything a probe run touches: the output stream, the realm deciding the ambient
/// receiver, the call stack and the records of what was observed.
pub struct ProbeContext<W: Write> {
    out: W,
    realm: Realm,
    top: FuncRef,
    /// Functions currently executing, innermost last. Never empty.
    frames: Vec<FuncRef>,
    call_graph: CallGraph,
    trace: Trace,
    next_object_id: u32,
    next_func_id: u32,
    next_callsite: usize,
}

impl<W: Write> ProbeContext<W> {
    pub fn new(mode: ExecutionMode, out: W) -> Self {
        let global = ObjectRef::new(ObjectId(0), "global");
        let exports = ObjectRef::new(ObjectId(1), "exports");
        let top = FuncRef::new(FuncId(0), TOP_LEVEL);
        let mut call_graph = CallGraph::new();
        call_graph.add_node(&top);
        ProbeContext {
            out,
            realm: Realm::new(mode, global, exports),
            frames: vec![top.clone()],
            top,
            call_graph,
            trace: Trace::new(),
            next_object_id: 2,
            next_func_id: 1,
            next_callsite: 0,
        }
    }

    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    pub fn top_level(&self) -> &FuncRef {
        &self.top
    }

    pub fn call_graph(&self) -> &CallGraph {
        &self.call_graph
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Consumes the context, returning the output stream.
    pub fn into_output(self) -> W {
        self.out
    }

    pub fn new_object(&mut self, name: &str) -> ObjectRef {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        ObjectRef::new(id, name)
    }

    pub fn new_function(&mut self, name: &str) -> FuncRef {
        let id = FuncId(self.next_func_id);
        self.next_func_id += 1;
        FuncRef::new(id, name)
    }

    /// Allocates a function value for a fresh closure, named after its id.
    pub fn new_closure_function(&mut self) -> FuncRef {
        let id = FuncId(self.next_func_id);
        self.next_func_id += 1;
        FuncRef::new(id, &format!("closure#{}", id.0))
    }

    /// The function whose body is currently executing.
    pub fn current(&self) -> &FuncRef {
        // `frames` starts with the top level, and `leave` never pops it.
        self.frames.last().unwrap_or(&self.top)
    }

    /// The function that called the one currently executing.
    pub fn caller(&self) -> &FuncRef {
        let n = self.frames.len();
        if n >= 2 {
            &self.frames[n - 2]
        } else {
            &self.top
        }
    }

    /// Records a call from the current function to `callee` and enters it.
    pub fn enter(&mut self, callee: &FuncRef, call_type: CallType) {
        let callsite = CallSite::new(self.next_callsite, call_type);
        self.next_callsite += 1;
        debug!("{} -> {} ({})", self.current(), callee, callsite);
        let caller = self.current().clone();
        self.call_graph.add_edge(callsite, &caller, callee);
        self.frames.push(callee.clone());
    }

    /// Returns from the current function.
    pub fn leave(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        } else {
            warn!("Unbalanced return from top level");
        }
    }

    /// Writes one line holding `value` and records it as emitted by the current call.
    pub fn emit(&mut self, value: &Value) -> io::Result<()> {
        writeln!(self.out, "{value}")?;
        let caller = self.caller().to_string();
        self.trace.push_emitted(caller, value.clone());
        Ok(())
    }

    pub fn observe_receiver(&mut self, call_type: CallType, receiver: &Value) {
        debug!("Receiver observed by {} call: {}", call_type, receiver);
        self.trace.push_receiver(call_type, receiver.clone());
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
