//! The disjointness graph.
//!
//! A plain directed graph: no acyclicity requirement, and self-loops and
//! duplicate edges are silently ignored. Direction only records which
//! classifier declared the fact; consumers normalize both directions to the
//! same "disjoint" statement.

use indexmap::IndexSet;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use taxonomize_schemas::{ClassifierId, DisjointnessEdge};

#[derive(Debug, Clone, Default)]
pub struct DisjointnessGraph {
    graph: DiGraph<(), ()>,
    ids: IndexSet<ClassifierId>,
}

impl DisjointnessGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `a` declared itself disjoint from `b`.
    ///
    /// Returns false when nothing changed (self-loop or duplicate).
    pub fn add_edge(&mut self, a: &ClassifierId, b: &ClassifierId) -> bool {
        if a == b {
            return false;
        }
        let from = self.add_vertex(a);
        let to = self.add_vertex(b);
        if self.graph.find_edge(from, to).is_some() {
            return false;
        }
        self.graph.add_edge(from, to, ());
        true
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates declared edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = DisjointnessEdge> + '_ {
        self.graph.edge_references().map(|e| DisjointnessEdge {
            a: self.ids[e.source().index()].clone(),
            b: self.ids[e.target().index()].clone(),
        })
    }

    fn add_vertex(&mut self, id: &ClassifierId) -> NodeIndex {
        if let Some(index) = self.ids.get_index_of(id) {
            return NodeIndex::new(index);
        }
        self.ids.insert(id.clone());
        self.graph.add_node(())
    }
}
