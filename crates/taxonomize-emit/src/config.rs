//! Emission settings.

use std::path::PathBuf;

use taxonomize_graph::PairwiseOptions;
use taxonomize_schemas::hyphenate;

/// Default catalog file name, written at the output root.
pub const DEFAULT_CATALOG: &str = "catalog.xml";

/// Default rewrite prefix for IRIs no document entry matches.
pub const DEFAULT_CATALOG_FALLBACK: &str = "./";

/// Settings for artifact emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    /// Directory every artifact path is relative to.
    pub output_root: PathBuf,
    /// Canonical namespace; aggregate artifacts are placed directly under it.
    pub namespace: String,
    /// Extension of emitted vocabularies and bundles.
    pub target_suffix: String,
    /// Catalog file name under the output root. `None` skips the catalog.
    pub catalog: Option<String>,
    /// Rewrite prefix of the catalog's `http://` fallback rule.
    pub catalog_fallback: String,
    /// Stem of the aggregate bundle. `None` skips the bundle and the
    /// pairwise artifact.
    pub bundle_stem: Option<String>,
    /// Stem of the pairwise-intersection vocabulary. Only honored when
    /// `bundle_stem` is set.
    pub pairwise_stem: Option<String>,
    /// Maximum number of pairs to analyze. `None` analyzes every pair.
    pub max_pairs: Option<u64>,
    /// Where to write the `super,sub` edge list, if anywhere.
    pub edge_list: Option<PathBuf>,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            namespace: taxonomize_extract::DEFAULT_NAMESPACE.to_owned(),
            target_suffix: taxonomize_extract::DEFAULT_TARGET_SUFFIX.to_owned(),
            catalog: Some(DEFAULT_CATALOG.to_owned()),
            catalog_fallback: DEFAULT_CATALOG_FALLBACK.to_owned(),
            bundle_stem: None,
            pairwise_stem: None,
            max_pairs: None,
            edge_list: None,
        }
    }
}

impl EmitConfig {
    /// Creates a default configuration writing under `output_root`.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            ..Self::default()
        }
    }

    /// Returns the pairwise stem if the pairwise artifact is enabled.
    pub fn pairwise_artifact(&self) -> Option<&str> {
        self.bundle_stem.as_ref()?;
        self.pairwise_stem.as_deref()
    }

    /// Options for pairwise analysis. Per-pair verdicts are only recorded
    /// when the pairwise artifact will consume them.
    pub fn pairwise_options(&self) -> PairwiseOptions {
        PairwiseOptions {
            max_pairs: self.max_pairs,
            record_verdicts: self.pairwise_artifact().is_some(),
        }
    }

    /// IRI of an aggregate artifact named `stem`, whitespace hyphenated.
    pub(crate) fn aggregate_iri(&self, stem: &str) -> String {
        format!("{}/{}", self.namespace.trim_end_matches('/'), hyphenate(stem))
    }

    /// Output path of an aggregate artifact, relative to the output root.
    pub(crate) fn aggregate_path(&self, stem: &str) -> PathBuf {
        let authority_path = self
            .namespace
            .split_once("://")
            .map_or(self.namespace.as_str(), |(_, rest)| rest);
        let mut path: PathBuf = authority_path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        path.push(format!("{}.{}", hyphenate(stem), self.target_suffix));
        path
    }
}
