//! Corpus discovery and document loading.
//!
//! Files are discovered sequentially (sorted, so runs are reproducible) and
//! then read and parsed in parallel. Each parse is independent; nothing here
//! touches the shared graphs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use taxonomize_schemas::Document;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::error::{ExtractError, ExtractErrorKind};
use crate::paths::{document_iri, output_path, trail};
use crate::queries::top_library_package;
use crate::xmi::{self, Element, ParseError};
use crate::{ExtractConfig, LoadPolicy};

/// A parsed document together with its derived identity.
#[derive(Debug, Clone)]
pub(crate) struct LoadedDocument {
    pub document: Document,
    /// Root of the parsed tree; the library package is found again from it
    /// during extraction.
    pub root: Element,
}

impl LoadedDocument {
    pub(crate) fn package(&self) -> Option<&Element> {
        top_library_package(&self.root)
    }
}

/// Every document that loaded, plus the failures that were tolerated.
#[derive(Debug, Default)]
pub(crate) struct Corpus {
    pub documents: Vec<LoadedDocument>,
    pub failures: Vec<ExtractError>,
}

/// Lists every accepted file under the configured roots, in sorted order.
///
/// A root may also be a single file, which is accepted if its suffix
/// matches.
pub(crate) fn discover(
    config: &ExtractConfig,
) -> Vec<(PathBuf, Result<PathBuf, ExtractError>)> {
    let mut found = Vec::new();
    for root in &config.roots {
        for entry in WalkDir::new(root).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    let accepted = entry.file_type().is_file()
                        && config.accepts(&entry.file_name().to_string_lossy());
                    if accepted {
                        found.push((root.clone(), Ok(entry.into_path())));
                    }
                }
                Err(err) => found.push((root.clone(), Err(err.into()))),
            }
        }
    }
    found
}

/// Loads the corpus: discover, then parse every file in parallel.
///
/// A document whose IRI or output path was already claimed by an earlier
/// one (in discovery order) is a load failure.
///
/// Under [`LoadPolicy::Abort`] the first failure (in discovery order) is
/// returned; under [`LoadPolicy::Continue`] failures are logged and kept in
/// [`Corpus::failures`].
#[instrument(skip(config), fields(roots = ?config.roots))]
pub(crate) fn load(config: &ExtractConfig) -> Result<Corpus, ExtractError> {
    let candidates = discover(config);
    debug!(candidates = candidates.len(), "discovered candidate files");

    let results: Vec<Result<LoadedDocument, ExtractError>> = candidates
        .into_par_iter()
        .map(|(root, path)| path.and_then(|path| load_document(config, &root, &path)))
        .collect();

    let mut corpus = Corpus::default();
    let mut seen_iris = HashSet::new();
    let mut seen_outputs = HashSet::new();
    for result in results {
        let result = result.and_then(|doc| {
            let document = &doc.document;
            if !seen_iris.insert(document.iri.clone()) {
                return Err(ExtractError::new(ExtractErrorKind::DuplicateDocument {
                    path: document.source_path.clone(),
                    iri: document.iri.to_string(),
                }));
            }
            if !seen_outputs.insert(document.output_path.clone()) {
                return Err(ExtractError::new(ExtractErrorKind::DuplicateOutput {
                    path: document.source_path.clone(),
                    output: document.output_path.clone(),
                }));
            }
            Ok(doc)
        });
        match result {
            Ok(doc) => corpus.documents.push(doc),
            Err(err) => match config.load_policy {
                LoadPolicy::Abort => return Err(err),
                LoadPolicy::Continue => {
                    warn!(path = ?err.path(), error = %err, "skipping document");
                    corpus.failures.push(err);
                }
            },
        }
    }

    info!(
        documents = corpus.documents.len(),
        failed = corpus.failures.len(),
        "loaded documents"
    );
    Ok(corpus)
}

/// Reads, parses, and identifies one document.
pub(crate) fn load_document(
    config: &ExtractConfig,
    root: &Path,
    path: &Path,
) -> Result<LoadedDocument, ExtractError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        ExtractError::new(ExtractErrorKind::Io {
            path: path.to_path_buf(),
            source,
        })
    })?;

    let tree = xmi::parse(&text).map_err(|err| {
        let path = path.to_path_buf();
        ExtractError::new(match err {
            ParseError::Xml(source) => ExtractErrorKind::Xml { path, source },
            ParseError::Malformed(reason) => ExtractErrorKind::Malformed { path, reason },
        })
    })?;

    let package = top_library_package(&tree).ok_or_else(|| {
        ExtractError::new(ExtractErrorKind::MissingLibraryPackage {
            path: path.to_path_buf(),
        })
    })?;
    let package_name = package
        .attr("declaredName")
        .map(str::to_owned)
        .ok_or_else(|| {
            ExtractError::new(ExtractErrorKind::UnnamedLibraryPackage {
                path: path.to_path_buf(),
            })
        })?;

    let trail = trail(root, path, &config.source_root_marker);
    let document = Document {
        source_path: path.to_path_buf(),
        iri: document_iri(config, &trail, &package_name),
        output_path: output_path(config, &trail, path),
        package_name,
    };
    debug!(
        path = %path.display(),
        iri = %document.iri,
        output = %document.output_path.display(),
        "loaded document"
    );

    Ok(LoadedDocument {
        document,
        root: tree,
    })
}
