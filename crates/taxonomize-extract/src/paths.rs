//! Document IRI and output path derivation.
//!
//! Both are computed from the document's directory *trail*: the directories
//! between the source-root marker (or, failing that, the input root) and the
//! file itself.
//!
//! ```text
//! source:  <root>/sysml.library.xmi/Kernel Libraries/Base.kermlx   (package "Base")
//! trail:   Kernel Libraries
//! iri:     http://omg.org/SysML-v2/Kernel-Libraries/Base
//! output:  omg.org/SysML-v2/Kernel-Libraries/Base.oml
//! ```

use std::path::{Component, Path, PathBuf};

use taxonomize_schemas::{DocumentIri, hyphenate};

use crate::ExtractConfig;

/// Returns the trail of directory names leading to `file`.
///
/// If any ancestor directory is named `marker`, the trail starts after the
/// last such directory; otherwise it starts after `root`.
pub(crate) fn trail(root: &Path, file: &Path, marker: &str) -> Vec<String> {
    let dir = file.parent().unwrap_or(Path::new(""));
    let names: Vec<String> = dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(pos) = names.iter().rposition(|n| n == marker) {
        return names[pos + 1..].to_vec();
    }

    // A root that is itself a file contributes no trail.
    let base = if root.is_file() { root.parent().unwrap_or(root) } else { root };
    dir.strip_prefix(base)
        .map(|rel| {
            rel.components()
                .filter_map(|c| match c {
                    Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Builds `namespace/trail.../package`, hyphenating whitespace.
pub(crate) fn document_iri(config: &ExtractConfig, trail: &[String], package: &str) -> DocumentIri {
    let namespace = config.namespace.trim_end_matches('/');
    let mut iri = String::from(namespace);
    for segment in trail.iter().map(String::as_str).chain([package]) {
        if !segment.is_empty() {
            iri.push('/');
            iri.push_str(segment);
        }
    }
    DocumentIri::new(&iri)
}

/// Builds `namespace-path/trail.../stem.<target suffix>` relative to the
/// output root, hyphenating whitespace.
///
/// The stem is the file name up to its first `.`, so `Base.kermlx` and
/// `Base.v2.kermlx` both become `Base.oml`. Colliding paths are rejected
/// when the corpus is loaded.
pub(crate) fn output_path(config: &ExtractConfig, trail: &[String], file: &Path) -> PathBuf {
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.split_once('.').map_or(file_name.as_str(), |(stem, _)| stem);

    let mut path = PathBuf::new();
    for segment in config.namespace_path().split('/').filter(|s| !s.is_empty()) {
        path.push(hyphenate(segment));
    }
    for segment in trail.iter().filter(|s| !s.is_empty()) {
        path.push(hyphenate(segment));
    }
    path.push(hyphenate(&format!("{stem}.{}", config.target_suffix)));
    path
}
