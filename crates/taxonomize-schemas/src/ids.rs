//! String-backed identifiers for classifiers and documents.
//!
//! All three identifiers serialize transparently as plain strings so the
//! JSON report and the CSV edge list stay readable.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Durable identifier of a classifier (the XMI `elementId`).
///
/// Unique across the whole corpus. References in the source documents carry
/// a location prefix (`../Base.kermlx#<id>`); [`ClassifierId::from_reference`]
/// strips it.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClassifierId(String);

impl ClassifierId {
    /// Creates an identifier from a bare element id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parses a raw cross-reference into a bare identifier.
    ///
    /// Everything up to and including the last `#` is the document location
    /// and is discarded. Returns `None` for references that are empty once
    /// the location is removed.
    pub fn from_reference(raw: &str) -> Option<Self> {
        let bare = raw.rsplit_once('#').map_or(raw, |(_, id)| id).trim();
        (!bare.is_empty()).then(|| Self(bare.to_owned()))
    }

    /// Returns the underlying string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ClassifierId {
    /// Enables `HashMap<ClassifierId, _>::get("id")` lookups.
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Package-qualified classifier name: `package:declaredName`.
///
/// Declared names are not unique across the corpus, qualified names are
/// (within the libraries this tool targets). Implicit supertype edges are
/// keyed by qualified name because their targets are named in the kind map
/// rather than referenced by id.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct QualifiedName(String);

impl QualifiedName {
    /// Builds a qualified name from its package and declared name.
    pub fn new(package: &str, declared_name: &str) -> Self {
        Self(format!("{package}:{declared_name}"))
    }

    /// Parses a qualified name written either as `Package:Name` or in
    /// library form `Package::Name`.
    ///
    /// Only the last `::` separator is rewritten, so nested library paths
    /// such as `A::B::C` become `A::B:C` and still split into package and
    /// name at the final colon.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.rsplit_once("::") {
            Some((package, name)) if !name.contains(':') => {
                Some(Self::new(package, name))
            }
            _ => Some(Self(raw.to_owned())),
        }
    }

    /// Returns the package portion (everything before the last `:`).
    pub fn package(&self) -> &str {
        self.0.rsplit_once(':').map_or("", |(package, _)| package)
    }

    /// Returns the declared-name portion (everything after the last `:`).
    pub fn name(&self) -> &str {
        self.0.rsplit_once(':').map_or(self.0.as_str(), |(_, name)| name)
    }

    /// Returns the underlying string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for QualifiedName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// IRI of one input document, e.g.
/// `http://omg.org/SysML-v2/Kernel-Libraries/Kernel-Semantic-Library/Base`.
///
/// Derived from the document's directory trail and its top-level package
/// name, with whitespace runs replaced by hyphens.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DocumentIri(String);

impl DocumentIri {
    /// Creates an IRI, normalizing every whitespace run to a single `-`.
    pub fn new(iri: &str) -> Self {
        Self(hyphenate(iri))
    }

    /// Returns the final `/`-separated segment, used as the default prefix
    /// when another vocabulary imports this document.
    pub fn last_segment(&self) -> &str {
        self.0.rsplit_once('/').map_or(self.0.as_str(), |(_, last)| last)
    }

    /// Returns the underlying string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentIri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DocumentIri {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Replaces every run of whitespace in `s` with a single `-`.
pub fn hyphenate(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::testutil::arb_name;

    #[test]
    fn test_reference_strips_location() {
        let id = ClassifierId::from_reference("../Base.kermlx#abc-123").unwrap();
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn test_reference_without_location() {
        let id = ClassifierId::from_reference(" abc ").unwrap();
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn test_empty_reference_rejected() {
        assert!(ClassifierId::from_reference("Base.kermlx#").is_none());
        assert!(ClassifierId::from_reference("").is_none());
    }

    #[test]
    fn test_qualified_name_library_form() {
        let qn = QualifiedName::parse("Performances::Performance").unwrap();
        assert_eq!(qn.as_str(), "Performances:Performance");
        assert_eq!(qn.package(), "Performances");
        assert_eq!(qn.name(), "Performance");
    }

    #[test]
    fn test_qualified_name_nested_library_form() {
        let qn = QualifiedName::parse("A::B::C").unwrap();
        assert_eq!(qn.as_str(), "A::B:C");
        assert_eq!(qn.package(), "A::B");
        assert_eq!(qn.name(), "C");
    }

    #[test]
    fn test_qualified_name_without_package() {
        let qn = QualifiedName::parse("Kind.Behavior").unwrap();
        assert_eq!(qn.package(), "");
        assert_eq!(qn.name(), "Kind.Behavior");
    }

    #[test]
    fn test_document_iri_hyphenates() {
        let iri = DocumentIri::new("http://x/Kernel  Libraries/Base\tTypes");
        assert_eq!(iri.as_str(), "http://x/Kernel-Libraries/Base-Types");
        assert_eq!(iri.last_segment(), "Base-Types");
    }

    proptest! {
        /// Building then re-parsing a qualified name is stable.
        #[test]
        fn prop_qualified_name_parse_stable(pkg in arb_name(), name in arb_name()) {
            let qn = QualifiedName::new(&pkg, &name);
            prop_assert_eq!(QualifiedName::parse(qn.as_str()), Some(qn.clone()));
            prop_assert_eq!(qn.package(), pkg.as_str());
            prop_assert_eq!(qn.name(), name.as_str());
        }

        /// Hyphenated strings never contain whitespace.
        #[test]
        fn prop_hyphenate_removes_whitespace(s in "[a-z \\t\\n]{0,30}") {
            prop_assert!(!hyphenate(&s).chars().any(char::is_whitespace));
        }
    }
}
