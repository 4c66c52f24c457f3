//! Extraction settings.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Classifier kinds recognized by default (SysML v2 / KerML metaclass
/// names with the namespace prefix removed).
pub const DEFAULT_CLASSIFIER_KINDS: &[&str] = &[
    "Association",
    "AssociationStructure",
    "Behavior",
    "Class",
    "Classifier",
    "DataType",
    "Function",
    "Interaction",
    "Metaclass",
    "Predicate",
    "Structure",
    "SysMLClass",
];

/// File suffixes of taxonomy-source documents.
pub const DEFAULT_SUFFIXES: &[&str] = &["kermlx", "sysmlx"];

/// Directory name marking the root of the source library tree. Everything
/// up to and including it is replaced by the namespace in document IRIs.
pub const DEFAULT_SOURCE_ROOT_MARKER: &str = "sysml.library.xmi";

/// Canonical namespace for document IRIs.
pub const DEFAULT_NAMESPACE: &str = "http://omg.org/SysML-v2";

/// Extension of emitted artifacts, used when deriving output paths.
pub const DEFAULT_TARGET_SUFFIX: &str = "oml";

/// What to do when a single document fails to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Log the failure, skip the document, and keep going.
    #[default]
    Continue,
    /// Stop the run at the first failure.
    Abort,
}

/// Settings for corpus loading and classifier extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Directories (or single files) to walk recursively.
    pub roots: Vec<PathBuf>,
    /// Accepted file suffixes, without the leading dot.
    pub suffixes: Vec<String>,
    pub source_root_marker: String,
    pub namespace: String,
    pub target_suffix: String,
    /// Structural kinds that become classifiers; everything else is skipped.
    pub classifier_kinds: BTreeSet<String>,
    pub load_policy: LoadPolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            suffixes: DEFAULT_SUFFIXES.iter().map(|&s| s.to_owned()).collect(),
            source_root_marker: DEFAULT_SOURCE_ROOT_MARKER.to_owned(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            target_suffix: DEFAULT_TARGET_SUFFIX.to_owned(),
            classifier_kinds: DEFAULT_CLASSIFIER_KINDS
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
            load_policy: LoadPolicy::default(),
        }
    }
}

impl ExtractConfig {
    /// Creates a default configuration over the given roots.
    pub fn with_roots(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Returns true if `file_name` ends in one of the accepted suffixes.
    pub fn accepts(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| self.suffixes.iter().any(|s| s == ext))
    }

    /// Returns the namespace without its URI scheme
    /// (`http://omg.org/SysML-v2` becomes `omg.org/SysML-v2`).
    pub fn namespace_path(&self) -> &str {
        self.namespace
            .split_once("://")
            .map_or(self.namespace.as_str(), |(_, rest)| rest)
            .trim_matches('/')
    }
}
