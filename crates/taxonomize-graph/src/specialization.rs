//! The specialization ("is-a") graph.
//!
//! Vertices are classifier ids; an edge `sub -> sup` means `sub` specializes
//! `sup`. The graph is kept acyclic at every step: an insertion that would
//! close a cycle is rejected before any state changes, including the
//! creation of vertices.

use indexmap::IndexSet;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use taxonomize_schemas::{ClassifierId, Provenance, SpecializationEdge};
use tracing::trace;

use crate::closure::Closure;
use crate::error::GraphError;

/// Mutable specialization graph, open for insertion.
///
/// Vertex ids are stored in an `IndexSet` whose positions line up with the
/// petgraph node indices: vertices are never removed, so position `i` is
/// always `NodeIndex::new(i)`.
#[derive(Debug, Clone, Default)]
pub struct SpecializationGraph {
    graph: DiGraph<(), Provenance>,
    ids: IndexSet<ClassifierId>,
}

impl SpecializationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` as a vertex. Adding an existing vertex is a no-op.
    pub fn add_vertex(&mut self, id: &ClassifierId) -> NodeIndex {
        if let Some(index) = self.ids.get_index_of(id) {
            return NodeIndex::new(index);
        }
        self.ids.insert(id.clone());
        self.graph.add_node(())
    }

    /// Adds the edge `sub -> sup`, creating either vertex if needed.
    ///
    /// Returns `Ok(true)` when the edge was inserted and `Ok(false)` when an
    /// edge between the same endpoints already existed (the first
    /// provenance wins).
    ///
    /// # Errors
    ///
    /// Returns a cycle [`GraphError`] when `sub == sup` or when `sub` is
    /// already reachable from `sup`. The graph is unchanged in that case.
    pub fn add_edge(
        &mut self,
        sub: &ClassifierId,
        sup: &ClassifierId,
        provenance: Provenance,
    ) -> Result<bool, GraphError> {
        if sub == sup {
            return Err(GraphError::cycle(sub, sup));
        }

        // A vertex that doesn't exist yet has no edges, so a cycle is only
        // possible when both endpoints are already present.
        if let (Some(from), Some(to)) = (self.index_of(sub), self.index_of(sup)) {
            if self.graph.find_edge(from, to).is_some() {
                return Ok(false);
            }
            if has_path_connecting(&self.graph, to, from, None) {
                return Err(GraphError::cycle(sub, sup));
            }
        }

        let from = self.add_vertex(sub);
        let to = self.add_vertex(sup);
        self.graph.add_edge(from, to, provenance);
        trace!(%sub, %sup, %provenance, "added specialization");
        Ok(true)
    }

    pub fn contains_vertex(&self, id: &ClassifierId) -> bool {
        self.ids.contains(id)
    }

    pub fn vertex_count(&self) -> usize {
        self.ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if `id` has at least one outgoing edge.
    pub fn has_supertype(&self, id: &ClassifierId) -> bool {
        self.index_of(id)
            .is_some_and(|n| self.graph.neighbors(n).next().is_some())
    }

    /// Iterates vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &ClassifierId> {
        self.ids.iter()
    }

    /// Iterates edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = SpecializationEdge> + '_ {
        self.graph.edge_references().map(|e| SpecializationEdge {
            sub: self.ids[e.source().index()].clone(),
            sup: self.ids[e.target().index()].clone(),
            provenance: *e.weight(),
        })
    }

    /// Stops insertion. Only a frozen graph can compute ancestor sets.
    pub fn freeze(self) -> FrozenSpecializationGraph {
        FrozenSpecializationGraph {
            graph: self.graph,
            ids: self.ids,
        }
    }

    fn index_of(&self, id: &ClassifierId) -> Option<NodeIndex> {
        self.ids.get_index_of(id).map(NodeIndex::new)
    }
}

/// Specialization graph after the last edge has been merged.
///
/// Immutable; every read is side-effect free.
#[derive(Debug, Clone)]
pub struct FrozenSpecializationGraph {
    graph: DiGraph<(), Provenance>,
    ids: IndexSet<ClassifierId>,
}

impl FrozenSpecializationGraph {
    pub fn vertex_count(&self) -> usize {
        self.ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_vertex(&self, id: &ClassifierId) -> bool {
        self.ids.contains(id)
    }

    /// Iterates vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &ClassifierId> {
        self.ids.iter()
    }

    /// Iterates edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = SpecializationEdge> + '_ {
        self.graph.edge_references().map(|e| SpecializationEdge {
            sub: self.ids[e.source().index()].clone(),
            sup: self.ids[e.target().index()].clone(),
            provenance: *e.weight(),
        })
    }

    /// Computes the reflexive transitive closure of every vertex.
    pub fn closure(&self) -> Closure {
        Closure::compute(&self.graph, self.ids.clone())
    }
}
