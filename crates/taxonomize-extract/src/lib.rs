//! Taxonomy extraction from SysML v2 / KerML XMI libraries.
//!
//! This crate walks a corpus of `.kermlx` / `.sysmlx` documents, extracts the
//! classifiers each library package owns, and resolves their declared and
//! implicit specialization edges into one acyclic graph plus a separate
//! disjointness graph.
//!
//! ## Phases
//!
//! 1. Load: discover files and parse them in parallel
//! 2. Extract: collect classifiers and their declared references per
//!    document, also in parallel
//! 3. Resolve: merge documents into the [`Taxonomy`] graphs in corpus order
//! 4. Infer: add implicit supertypes from the [`KindMap`] for classifiers
//!    left without an outgoing specialization edge
//! 5. Freeze: the returned [`Taxonomy`] is immutable
//!
//! ## Usage
//!
//! ```no_run
//! use taxonomize_extract::{ExtractConfig, KindMap, run};
//!
//! let config = ExtractConfig::with_roots(["sysml.library.xmi"]);
//! let kind_map = KindMap::load("implicit-supertypes.csv".as_ref()).unwrap();
//! let taxonomy = run(&config, &kind_map).unwrap();
//! println!("{} classifiers", taxonomy.classifiers.len());
//! ```
//!
//! ## Re-exports
//!
//! Model types come from [`taxonomize_schemas`].

mod classifiers;
mod config;
mod corpus;
mod error;
mod kind_map;
mod paths;
mod queries;
mod run;
mod xmi;

use rayon::prelude::*;
#[doc(inline)]
pub use taxonomize_schemas::{
    Classifier, ClassifierId, Document, DocumentIri, ImplicitEdge, Provenance, QualifiedName,
    RunSummary,
};
use tracing::{debug_span, instrument};

use crate::classifiers::{ExtractedClassifier, extract_classifiers};
#[doc(inline)]
pub use crate::config::{
    DEFAULT_CLASSIFIER_KINDS, DEFAULT_NAMESPACE, DEFAULT_SOURCE_ROOT_MARKER, DEFAULT_SUFFIXES,
    DEFAULT_TARGET_SUFFIX, ExtractConfig, LoadPolicy,
};
#[doc(inline)]
pub use crate::error::ExtractError;
#[doc(inline)]
pub use crate::kind_map::KindMap;
use crate::run::Run;
#[doc(inline)]
pub use crate::run::Taxonomy;

/// Builds the taxonomy of every document under `config.roots`.
///
/// # Errors
///
/// Under [`LoadPolicy::Abort`], returns the first document (or root) that
/// fails to load. Under [`LoadPolicy::Continue`] those failures are
/// collected in [`Taxonomy::failures`] and the run always succeeds.
#[instrument(skip_all, fields(roots = config.roots.len()))]
pub fn run(config: &ExtractConfig, kind_map: &KindMap) -> Result<Taxonomy, ExtractError> {
    let corpus = corpus::load(config)?;

    let extracted: Vec<Vec<ExtractedClassifier>> = {
        let _span = debug_span!("extract", documents = corpus.documents.len()).entered();
        corpus
            .documents
            .par_iter()
            .map(|doc| extract_classifiers(doc, &config.classifier_kinds))
            .collect()
    };

    let mut run = Run::new();
    run.record_failures(corpus.failures);
    {
        let _span = debug_span!("resolve").entered();
        for (doc, classifiers) in corpus.documents.into_iter().zip(extracted) {
            run.merge_document(doc.document, classifiers);
        }
    }
    run.infer_implicit(kind_map);
    run.merge_implicit();
    Ok(run.freeze())
}
