//! Taxonomy graphs and ancestor-set satisfiability.
//!
//! This crate owns the two graphs built from an extracted corpus and the
//! reasoning done over them once construction is finished.
//!
//! ## Algorithm
//!
//! 1. Insert explicit and implicit specialization edges into a
//!    [`SpecializationGraph`], rejecting any edge that would close a cycle
//! 2. Insert declared disjointness facts into a [`DisjointnessGraph`]
//! 3. [`SpecializationGraph::freeze`] the graph once the last edge is merged
//! 4. Compute every ancestor set with [`FrozenSpecializationGraph::closure`]
//! 5. [`Closure::analyze`] every unordered pair: a pair is satisfiable iff
//!    the ancestor sets of its members intersect
//!
//! Freezing is a move, so ancestor sets can never be computed while edges
//! are still being added.
//!
//! ## Usage
//!
//! ```
//! use taxonomize_graph::{PairwiseOptions, SpecializationGraph};
//! use taxonomize_schemas::{ClassifierId, Provenance};
//!
//! let (a, b, c) = (ClassifierId::new("a"), ClassifierId::new("b"), ClassifierId::new("c"));
//! let mut graph = SpecializationGraph::new();
//! graph.add_edge(&a, &c, Provenance::Explicit).unwrap();
//! graph.add_edge(&b, &c, Provenance::Explicit).unwrap();
//! assert!(graph.add_edge(&c, &a, Provenance::Explicit).is_err());
//!
//! let closure = graph.freeze().closure();
//! assert_eq!(closure.satisfiable(&a, &b), Some(true));
//! assert_eq!(closure.analyze(PairwiseOptions::default()).unsatisfiable_pairs, 0);
//! ```

mod closure;
mod disjointness;
mod error;
mod specialization;

#[doc(inline)]
pub use crate::closure::{Closure, PairwiseOptions};
#[doc(inline)]
pub use crate::disjointness::DisjointnessGraph;
#[doc(inline)]
pub use crate::error::GraphError;
#[doc(inline)]
pub use crate::specialization::{FrozenSpecializationGraph, SpecializationGraph};
