//! Schema definitions for the taxonomize pipeline.
//!
//! This crate contains the data structures shared by every phase: the
//! identifiers that name classifiers and documents, the extracted
//! [`Classifier`] and [`Document`] records, the two kinds of taxonomy edges,
//! and the serializable reports produced by the satisfiability analysis.
//!
//! The types are deliberately plain: they carry no behavior beyond parsing
//! and formatting their own string forms, so they can be shared between the
//! extraction, graph, and emission crates without pulling in any of their
//! dependencies.

mod ids;
mod report;
mod taxonomy;
#[cfg(test)]
mod testutil;

#[doc(inline)]
pub use ids::*;
#[doc(inline)]
pub use report::*;
#[doc(inline)]
pub use taxonomy::*;
