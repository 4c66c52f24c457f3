//! Extracted taxonomy records: documents, classifiers, and edges.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ClassifierId, DocumentIri, QualifiedName};

/// One loaded input document.
///
/// Every field is a pure function of the source path, the input root it was
/// found under, and the document's top-level package name, so loading the
/// same corpus twice yields identical documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Path of the `.kermlx` / `.sysmlx` file that was parsed.
    pub source_path: PathBuf,
    /// Declared name of the document's top-level library package.
    pub package_name: String,
    /// IRI of the vocabulary emitted for this document.
    pub iri: DocumentIri,
    /// Output artifact path, relative to the configured output root.
    pub output_path: PathBuf,
}

/// A candidate taxonomy node extracted from a library package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifier {
    /// Durable element id; unique across the corpus.
    pub id: ClassifierId,
    /// Human-readable declared name. Not unique.
    pub declared_name: String,
    /// `package:declaredName`.
    pub qualified_name: QualifiedName,
    /// Structural kind with its namespace prefix removed (`Class`, `Behavior`).
    pub kind: String,
    /// Document that declared this classifier.
    pub owner_document: DocumentIri,
}

/// Where a specialization edge came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Declared in the source document.
    #[default]
    Explicit,
    /// Synthesized from the kind map because the classifier had no
    /// explicit supertype edge.
    Implicit,
}

impl Provenance {
    /// Returns the lowercase label used in emitted annotations.
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Explicit => "explicit",
            Provenance::Implicit => "implicit",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `sub` is-a `sup`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpecializationEdge {
    pub sub: ClassifierId,
    pub sup: ClassifierId,
    pub provenance: Provenance,
}

/// Declared mutual exclusion between `a` and `b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisjointnessEdge {
    pub a: ClassifierId,
    pub b: ClassifierId,
}

impl DisjointnessEdge {
    /// Returns the edge with its endpoints in sorted order, so `(a, b)` and
    /// `(b, a)` normalize to the same fact.
    #[must_use]
    pub fn normalized(&self) -> Self {
        if self.a <= self.b {
            self.clone()
        } else {
            Self {
                a: self.b.clone(),
                b: self.a.clone(),
            }
        }
    }
}

/// Implicit edge as first inferred, before qualified names are resolved to
/// identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImplicitEdge {
    pub sub: QualifiedName,
    pub sup: QualifiedName,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::testutil::arb_element_id;

    #[test]
    fn test_provenance_serializes_snake_case() {
        let json = serde_json::to_string(&Provenance::Implicit).unwrap();
        assert_eq!(json, "\"implicit\"");
        assert_eq!(Provenance::default(), Provenance::Explicit);
    }

    #[test]
    fn test_classifier_json_shape() {
        let classifier = Classifier {
            id: ClassifierId::new("c1"),
            declared_name: "Anything".into(),
            qualified_name: QualifiedName::new("Base", "Anything"),
            kind: "Classifier".into(),
            owner_document: DocumentIri::new("http://x/Base"),
        };
        let value = serde_json::to_value(&classifier).unwrap();
        assert_eq!(value["id"], "c1");
        assert_eq!(value["qualified_name"], "Base:Anything");
        assert_eq!(value["owner_document"], "http://x/Base");
    }

    proptest! {
        /// Both orientations of a disjointness edge normalize identically.
        #[test]
        fn prop_disjointness_normalization_symmetric(
            a in arb_element_id(),
            b in arb_element_id(),
        ) {
            let ab = DisjointnessEdge { a: ClassifierId::new(&a), b: ClassifierId::new(&b) };
            let ba = DisjointnessEdge { a: ClassifierId::new(&b), b: ClassifierId::new(&a) };
            prop_assert_eq!(ab.normalized(), ba.normalized());
        }
    }
}
