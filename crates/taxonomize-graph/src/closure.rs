//! Ancestor sets and pairwise satisfiability.
//!
//! The ancestor set of `v` is `v` plus everything `v` transitively
//! specializes. Two classifiers are jointly satisfiable iff their ancestor
//! sets intersect; a pair sharing no ancestor (not even one specializing the
//! other) is unsatisfiable.
//!
//! Ancestor sets are computed once in DFS post-order, which on a DAG visits
//! every supertype before its subtypes, so each set is the union of the
//! already-finished sets of its direct supertypes.

use std::collections::HashSet;

use indexmap::IndexSet;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::DfsPostOrder;
use rayon::prelude::*;
use taxonomize_schemas::{
    ClassifierId, PairVerdict, Provenance, SatisfiabilityReport,
};
use tracing::{debug, debug_span};

/// Bounds on pairwise enumeration.
///
/// Pair counts grow quadratically with the vertex count, so enumeration is
/// capped explicitly rather than left to run unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairwiseOptions {
    /// Maximum number of pairs to enumerate. `None` enumerates every pair.
    pub max_pairs: Option<u64>,
    /// Record a [`PairVerdict`] for every enumerated pair in the report.
    pub record_verdicts: bool,
}

/// Reflexive transitive closure of a frozen specialization graph.
#[derive(Debug, Clone)]
pub struct Closure {
    ids: IndexSet<ClassifierId>,
    /// `ancestors[i]` holds vertex positions, always including `i` itself.
    ancestors: Vec<HashSet<usize>>,
}

impl Closure {
    pub(crate) fn compute(
        graph: &DiGraph<(), Provenance>,
        ids: IndexSet<ClassifierId>,
    ) -> Self {
        let _span = debug_span!("closure", vertices = ids.len()).entered();

        let mut ancestors: Vec<HashSet<usize>> =
            (0..ids.len()).map(|i| HashSet::from([i])).collect();

        let mut dfs = DfsPostOrder::empty(graph);
        for start in graph.node_indices() {
            dfs.move_to(start);
            while let Some(node) = dfs.next(graph) {
                // Post-order: all supertypes of `node` are already final.
                let supers: Vec<usize> =
                    graph.neighbors(node).map(NodeIndex::index).collect();
                for sup in supers {
                    let inherited = ancestors[sup].clone();
                    ancestors[node.index()].extend(inherited);
                }
            }
        }

        debug!("computed ancestor sets");
        Self { ids, ancestors }
    }

    pub fn vertex_count(&self) -> usize {
        self.ids.len()
    }

    /// Iterates vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &ClassifierId> {
        self.ids.iter()
    }

    /// Returns the ancestor set of `id`, or `None` if `id` is not a vertex.
    pub fn ancestors(&self, id: &ClassifierId) -> Option<Vec<&ClassifierId>> {
        let index = self.ids.get_index_of(id)?;
        let mut out: Vec<&ClassifierId> =
            self.ancestors[index].iter().map(|&i| &self.ids[i]).collect();
        out.sort();
        Some(out)
    }

    /// Returns true if `sup` is in the ancestor set of `sub`.
    pub fn is_ancestor(&self, sub: &ClassifierId, sup: &ClassifierId) -> bool {
        match (self.ids.get_index_of(sub), self.ids.get_index_of(sup)) {
            (Some(sub), Some(sup)) => self.ancestors[sub].contains(&sup),
            _ => false,
        }
    }

    /// Returns whether `a` and `b` share an ancestor, or `None` if either is
    /// not a vertex.
    pub fn satisfiable(&self, a: &ClassifierId, b: &ClassifierId) -> Option<bool> {
        let a = self.ids.get_index_of(a)?;
        let b = self.ids.get_index_of(b)?;
        Some(self.satisfiable_at(a, b))
    }

    fn satisfiable_at(&self, a: usize, b: usize) -> bool {
        !self.ancestors[a].is_disjoint(&self.ancestors[b])
    }

    /// Analyzes every unordered pair of distinct vertices, in row-major
    /// order `(0,1), (0,2), ..., (1,2), ...`, up to `options.max_pairs`.
    ///
    /// Rows are evaluated in parallel; the result does not depend on the
    /// thread count.
    pub fn analyze(&self, options: PairwiseOptions) -> SatisfiabilityReport {
        let _span = debug_span!("analyze", ?options).entered();

        let n = self.ids.len() as u64;
        let pair_count = n * n.saturating_sub(1) / 2;
        let cap = options.max_pairs.unwrap_or(pair_count).min(pair_count);

        let rows: Vec<(u64, u64, Vec<PairVerdict>)> = (0..self.ids.len())
            .into_par_iter()
            .map(|i| self.analyze_row(i, cap, options.record_verdicts))
            .collect();

        let mut report = SatisfiabilityReport {
            vertex_count: self.ids.len(),
            pair_count,
            truncated: cap < pair_count,
            ..Default::default()
        };
        for (analyzed, unsatisfiable, verdicts) in rows {
            report.analyzed_pairs += analyzed;
            report.unsatisfiable_pairs += unsatisfiable;
            report.pairs.extend(verdicts);
        }

        debug!(
            analyzed = report.analyzed_pairs,
            unsatisfiable = report.unsatisfiable_pairs,
            "analyzed pairs"
        );
        report
    }

    /// Evaluates the pairs `(i, j)` for `j > i` whose row-major position is
    /// below `cap`.
    fn analyze_row(
        &self,
        i: usize,
        cap: u64,
        record: bool,
    ) -> (u64, u64, Vec<PairVerdict>) {
        let n = self.ids.len() as u64;
        let row = i as u64;
        // Number of pairs in all rows before `row`.
        let offset = row * (2 * n - row - 1) / 2;
        let len = n - row - 1;
        let take = cap.saturating_sub(offset).min(len);

        let mut unsatisfiable = 0;
        let mut verdicts = Vec::new();
        let end = (i + 1)
            .saturating_add(usize::try_from(take).unwrap_or(usize::MAX))
            .min(self.ids.len());
        for j in (i + 1)..end {
            let satisfiable = self.satisfiable_at(i, j);
            if !satisfiable {
                unsatisfiable += 1;
            }
            if record {
                verdicts.push(PairVerdict {
                    a: self.ids[i].clone(),
                    b: self.ids[j].clone(),
                    satisfiable,
                });
            }
        }
        (take, unsatisfiable, verdicts)
    }
}
