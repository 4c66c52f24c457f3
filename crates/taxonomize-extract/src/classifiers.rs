//! Classifier and relationship extraction from one library package.
//!
//! Extraction is read-only with respect to every other document, so it runs
//! per document in parallel; the results are merged into the run's graphs
//! afterwards, in document order.

use std::collections::BTreeSet;

use taxonomize_schemas::{Classifier, ClassifierId, QualifiedName};
use tracing::trace;

use crate::corpus::LoadedDocument;
use crate::queries::{DISJOINING_TYPE, SUPERCLASSIFIER, owned_members, references};

/// One classifier together with the references declared on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtractedClassifier {
    pub classifier: Classifier,
    /// Declared superclasses, in document order.
    pub superclasses: Vec<ClassifierId>,
    /// Declared disjoint classes, in document order.
    pub disjoint_with: Vec<ClassifierId>,
}

/// Extracts every recognized classifier owned by the document's library
/// package.
///
/// Members without a `declaredName`, without an `elementId`, or whose kind is
/// not in `kinds` are skipped; none of these is an error.
pub(crate) fn extract_classifiers(
    doc: &LoadedDocument,
    kinds: &BTreeSet<String>,
) -> Vec<ExtractedClassifier> {
    let Some(package) = doc.package() else {
        return Vec::new();
    };
    let package_name = &doc.document.package_name;

    owned_members(package)
        .filter_map(|member| {
            let declared_name = member.attr("declaredName")?;
            let kind = member.type_tag()?;
            if !kinds.contains(kind) {
                trace!(declared_name, kind, "skipping unrecognized kind");
                return None;
            }
            let id = member.attr("elementId").and_then(ClassifierId::from_reference)?;

            Some(ExtractedClassifier {
                classifier: Classifier {
                    id,
                    declared_name: declared_name.to_owned(),
                    qualified_name: QualifiedName::new(package_name, declared_name),
                    kind: kind.to_owned(),
                    owner_document: doc.document.iri.clone(),
                },
                superclasses: references(member, SUPERCLASSIFIER),
                disjoint_with: references(member, DISJOINING_TYPE),
            })
        })
        .collect()
}
