//! OML artifact emission for extracted taxonomies.
//!
//! Consumes a frozen [`Taxonomy`] (and, optionally, its pairwise
//! satisfiability report) and writes:
//!
//! - one OML vocabulary per loaded document
//! - an OASIS XML catalog resolving vocabulary IRIs to those files
//! - optionally, a bundle including every document vocabulary
//! - optionally, a pairwise-intersection vocabulary (requires the bundle)
//! - optionally, a `super,sub` CSV edge list
//!
//! The catalog is written first and its failure aborts emission. Every
//! other artifact fails on its own: the error is logged, recorded in
//! [`EmitSummary::failures`], and the remaining artifacts are still written.
//!
//! ## Usage
//!
//! ```no_run
//! use taxonomize_emit::{EmitConfig, emit};
//! use taxonomize_extract::{ExtractConfig, KindMap, run};
//!
//! let taxonomy = run(&ExtractConfig::with_roots(["sysml.library.xmi"]), &KindMap::default()).unwrap();
//! let config = EmitConfig::new("build/oml");
//! let summary = emit(&taxonomy, None, &config).unwrap();
//! assert!(summary.failures.is_empty());
//! ```

mod catalog;
mod config;
mod edges;
mod error;
mod oml;
mod pairwise;
mod vocabularies;

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use taxonomize_extract::Taxonomy;
use taxonomize_schemas::{SatisfiabilityReport, hyphenate};
use tracing::{debug, info, instrument, warn};

#[doc(inline)]
pub use crate::catalog::Catalog;
#[doc(inline)]
pub use crate::config::{DEFAULT_CATALOG, DEFAULT_CATALOG_FALLBACK, EmitConfig};
#[doc(inline)]
pub use crate::error::EmitError;
#[doc(inline)]
pub use crate::oml::{Annotation, Bundle, Concept, Import, ImportKind, Vocabulary};
use crate::vocabularies::{EdgeIndex, document_vocabulary};

/// What an emission run produced.
#[derive(Debug, Default)]
pub struct EmitSummary {
    /// Every file written, in write order.
    pub written: Vec<PathBuf>,
    /// Artifacts that failed to write.
    pub failures: Vec<EmitError>,
    /// Document vocabularies written.
    pub vocabularies: usize,
    /// Analyzed pairs left out of the pairwise vocabulary because a member
    /// is not a known classifier.
    pub skipped_pairs: u64,
    /// Rows written to the edge list.
    pub edge_rows: usize,
}

impl EmitSummary {
    fn record(&mut self, result: Result<PathBuf, EmitError>) -> bool {
        match result {
            Ok(path) => {
                self.written.push(path);
                true
            }
            Err(err) => {
                warn!(path = %err.path().display(), error = %err, "failed to write artifact");
                self.failures.push(err);
                false
            }
        }
    }
}

/// Writes every configured artifact for `taxonomy`.
///
/// `report` feeds the pairwise vocabulary; it must have been produced with
/// [`EmitConfig::pairwise_options`] so that per-pair verdicts are present.
///
/// # Errors
///
/// Returns an error only if the output root or the catalog cannot be
/// written. Failures of individual artifacts are reported in
/// [`EmitSummary::failures`].
#[instrument(skip_all, fields(output = %config.output_root.display()))]
pub fn emit(
    taxonomy: &Taxonomy,
    report: Option<&SatisfiabilityReport>,
    config: &EmitConfig,
) -> Result<EmitSummary, EmitError> {
    let mut summary = EmitSummary::default();
    fs::create_dir_all(&config.output_root)
        .map_err(|source| EmitError::io(&config.output_root, source))?;

    let bundle = config
        .bundle_stem
        .as_deref()
        .map(|stem| (config.aggregate_iri(stem), config.aggregate_path(stem)));
    let pairwise = config
        .pairwise_artifact()
        .map(|stem| (config.aggregate_iri(stem), config.aggregate_path(stem)));

    if let Some(name) = &config.catalog {
        let mut catalog = Catalog::new(&config.catalog_fallback);
        for document in taxonomy.documents.values() {
            catalog.add_artifact(document.iri.as_str(), &document.output_path);
        }
        for (iri, path) in bundle.iter().chain(&pairwise) {
            catalog.add_artifact(iri, path);
        }
        let path = write_artifact(&config.output_root, Path::new(name), &catalog.to_string())?;
        summary.written.push(path);
    }

    let index = EdgeIndex::new(taxonomy);
    let documents: Vec<_> = taxonomy.documents.values().collect();
    let results: Vec<Result<PathBuf, EmitError>> = documents
        .par_iter()
        .map(|document| {
            let vocabulary = document_vocabulary(taxonomy, &index, document);
            write_artifact(&config.output_root, &document.output_path, &vocabulary.to_string())
        })
        .collect();
    for result in results {
        if summary.record(result) {
            summary.vocabularies += 1;
        }
    }

    if let (Some(stem), Some((iri, path))) = (&config.bundle_stem, &bundle) {
        let mut artifact = Bundle::new(iri, &hyphenate(stem));
        for document in taxonomy.documents.values() {
            artifact.include(document.iri.as_str());
        }
        summary.record(write_artifact(&config.output_root, path, &artifact.to_string()));
    }

    if let Some((iri, path)) = &pairwise {
        match report {
            Some(report) => {
                let (vocabulary, skipped) = pairwise::pairwise_vocabulary(taxonomy, report, iri);
                summary.skipped_pairs = skipped;
                summary.record(write_artifact(&config.output_root, path, &vocabulary.to_string()));
            }
            None => warn!("pairwise artifact requested without a satisfiability report"),
        }
    }

    if let Some(path) = &config.edge_list {
        let result = write_edges(taxonomy, path);
        if let Ok(rows) = &result {
            summary.edge_rows = *rows;
        }
        summary.record(result.map(|_| path.clone()));
    }

    info!(
        written = summary.written.len(),
        vocabularies = summary.vocabularies,
        failed = summary.failures.len(),
        "emitted artifacts"
    );
    Ok(summary)
}

/// Writes `contents` to `root/relative`, creating parent directories.
fn write_artifact(root: &Path, relative: &Path, contents: &str) -> Result<PathBuf, EmitError> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| EmitError::io(parent, source))?;
    }
    fs::write(&path, contents).map_err(|source| EmitError::io(&path, source))?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(path)
}

fn write_edges(taxonomy: &Taxonomy, path: &Path) -> Result<usize, EmitError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| EmitError::io(parent, source))?;
    }
    let file = fs::File::create(path).map_err(|source| EmitError::io(path, source))?;
    let rows = edges::write_edge_list(taxonomy, std::io::BufWriter::new(file))
        .map_err(|source| EmitError::csv(path, source))?;
    debug!(path = %path.display(), rows, "wrote edge list");
    Ok(rows)
}
