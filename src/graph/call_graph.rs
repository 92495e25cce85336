// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DefaultIx, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Graph;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::{self, Display};

use crate::runtime::call_site::{CallSite, CallType};
use crate::runtime::value::{FuncId, FuncRef};

/// Unique identifiers for call graph nodes.
pub type CGNodeId = NodeIndex<DefaultIx>;
/// Unique identifiers for call graph edges.
pub type CGEdgeId = EdgeIndex<DefaultIx>;

#[derive(Debug)]
pub struct CallGraphNode {
    pub(crate) func: FuncRef,
}

impl CallGraphNode {
    pub fn new(func: FuncRef) -> Self {
        CallGraphNode { func }
    }
}

impl Display for CallGraphNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.func, f)
    }
}

#[derive(Debug)]
pub struct CallGraphEdge {
    pub(crate) callsite: CallSite,
}

impl CallGraphEdge {
    pub fn new(callsite: CallSite) -> Self {
        CallGraphEdge { callsite }
    }
}

impl Display for CallGraphEdge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.callsite, f)
    }
}

/// The dynamic call graph of one probe run. Every invocation adds one edge, so a closure
/// called three times from the top level shows up as three parallel edges.
#[derive(Debug, Default)]
pub struct CallGraph {
    /// The graph structure capturing call relationships.
    pub graph: Graph<CallGraphNode, CallGraphEdge>,
    /// A map from functions to their corresponding call graph nodes.
    pub func_nodes: HashMap<FuncId, CGNodeId>,
}

impl CallGraph {
    pub fn new() -> Self {
        CallGraph {
            graph: Graph::new(),
            func_nodes: HashMap::new(),
        }
    }

    /// Add a new node to the call graph.
    pub fn add_node(&mut self, func: &FuncRef) {
        self.get_or_insert_node(func);
    }

    fn get_or_insert_node(&mut self, func: &FuncRef) -> CGNodeId {
        match self.func_nodes.entry(func.id) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(v) => {
                let node_id = self.graph.add_node(CallGraphNode::new(func.clone()));
                *v.insert(node_id)
            }
        }
    }

    /// Adds an edge for a call from `caller` to `callee` at `callsite`.
    pub fn add_edge(&mut self, callsite: CallSite, caller: &FuncRef, callee: &FuncRef) -> CGEdgeId {
        let caller_node = self.get_or_insert_node(caller);
        let callee_node = self.get_or_insert_node(callee);
        self.graph.add_edge(caller_node, callee_node, CallGraphEdge::new(callsite))
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Counts the edges of the given call type.
    pub fn edge_count_of(&self, call_type: CallType) -> usize {
        self.graph
            .edge_weights()
            .filter(|edge| edge.callsite.call_type == call_type)
            .count()
    }

    /// Returns the callees of `caller` in call order, one entry per call.
    pub fn get_callees(&self, caller: FuncId) -> Vec<FuncRef> {
        let Some(node) = self.func_nodes.get(&caller) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self.graph.edges(*node).collect();
        edges.sort_by_key(|edge| edge.weight().callsite.seq);
        edges
            .into_iter()
            .map(|edge| self.graph[edge.target()].func.clone())
            .collect()
    }

    /// Returns true if `caller` has called `callee` at least once.
    pub fn has_edge(&self, caller: FuncId, callee: FuncId) -> bool {
        match (self.func_nodes.get(&caller), self.func_nodes.get(&callee)) {
            (Some(a), Some(b)) => self.graph.contains_edge(*a, *b),
            _ => false,
        }
    }

    /// Produce a dot representation of the call graph for displaying with Graphviz.
    pub fn to_dot(&self) -> String {
        format!(
            "digraph calls {{\n{}}}\n",
            Dot::with_config(&self.graph, &[Config::GraphContentOnly])
        )
    }
}
