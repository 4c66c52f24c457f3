//! Run summaries and the pairwise satisfiability report.

use serde::{Deserialize, Serialize};

use crate::ClassifierId;

/// Counts logged at the end of graph construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Documents that loaded successfully.
    pub documents: usize,
    /// Documents that failed to load and were skipped.
    pub failed_documents: usize,
    /// Classifiers extracted across all documents.
    pub classifiers: usize,
    /// Explicit specialization edges inserted into the graph.
    pub explicit_edges: usize,
    /// Implicit specialization edges inserted into the graph.
    pub implicit_edges: usize,
    /// Implicit edges whose target qualified name named no classifier.
    pub dropped_implicit_edges: usize,
    /// Edges rejected because they would have closed a cycle.
    pub rejected_edges: usize,
    /// Disjointness edges inserted into the disjointness graph.
    pub disjointness_edges: usize,
}

/// Verdict for one unordered pair of classifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairVerdict {
    pub a: ClassifierId,
    pub b: ClassifierId,
    /// True iff the ancestor sets of `a` and `b` intersect.
    pub satisfiable: bool,
}

/// Result of pairwise satisfiability analysis over the specialization graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatisfiabilityReport {
    /// Vertices in the frozen specialization graph.
    pub vertex_count: usize,
    /// Unordered pairs of distinct vertices: `n * (n - 1) / 2`.
    pub pair_count: u64,
    /// Pairs actually enumerated (bounded by the configured cap).
    pub analyzed_pairs: u64,
    /// Analyzed pairs whose ancestor sets do not intersect.
    pub unsatisfiable_pairs: u64,
    /// True when the cap stopped enumeration before `pair_count`.
    pub truncated: bool,
    /// Per-pair verdicts, in enumeration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pairs: Vec<PairVerdict>,
}
