//! One OML vocabulary per loaded document.
//!
//! Every classifier becomes a concept named by its element id and labeled
//! with its declared name. Specialization edges become supertypes of the
//! concept, each annotated with its provenance and the supertype reference
//! it explains; disjointness edges become
//! annotations. Edges whose target is not a known classifier are not
//! emitted.

use std::collections::{HashMap, HashSet};

use taxonomize_extract::Taxonomy;
use taxonomize_schemas::{Classifier, ClassifierId, Document, DocumentIri, SpecializationEdge};
use tracing::trace;

use crate::oml::{Annotation, Concept, Vocabulary};

/// Per-classifier edge lists, computed once and shared by every
/// vocabulary.
#[derive(Debug, Default)]
pub(crate) struct EdgeIndex<'a> {
    classifiers: HashMap<&'a DocumentIri, Vec<&'a Classifier>>,
    supertypes: HashMap<ClassifierId, Vec<SpecializationEdge>>,
    disjoint: HashMap<ClassifierId, Vec<ClassifierId>>,
}

impl<'a> EdgeIndex<'a> {
    pub(crate) fn new(taxonomy: &'a Taxonomy) -> Self {
        let mut index = EdgeIndex::default();
        for classifier in taxonomy.classifiers.values() {
            index
                .classifiers
                .entry(&classifier.owner_document)
                .or_default()
                .push(classifier);
        }
        for edge in taxonomy.specialization.edges() {
            index.supertypes.entry(edge.sub.clone()).or_default().push(edge);
        }
        // Both directions of a declared pair collapse into one fact, kept on
        // whichever classifier declared it first.
        let mut seen = HashSet::new();
        for edge in taxonomy.disjointness.edges() {
            if seen.insert(edge.normalized()) {
                index.disjoint.entry(edge.a).or_default().push(edge.b);
            }
        }
        index
    }
}

/// Builds the vocabulary for `document`.
pub(crate) fn document_vocabulary(
    taxonomy: &Taxonomy,
    index: &EdgeIndex<'_>,
    document: &Document,
) -> Vocabulary {
    let mut vocabulary = Vocabulary::new(document.iri.as_str(), document.iri.last_segment());
    let owned = index
        .classifiers
        .get(&document.iri)
        .map_or(&[][..], Vec::as_slice);

    for classifier in owned {
        let mut concept = Concept {
            name: classifier.id.to_string(),
            annotations: vec![Annotation::Label(classifier.declared_name.clone())],
            supertypes: Vec::new(),
        };

        for edge in index.supertypes.get(&classifier.id).into_iter().flatten() {
            let Some(target) = taxonomy.classifier(&edge.sup) else {
                trace!(sub = %edge.sub, sup = %edge.sup, "no axiom for dangling supertype");
                continue;
            };
            let supertype = reference(&mut vocabulary, &document.iri, target);
            concept.annotations.push(Annotation::Comment(format!(
                "specializes {} as {supertype} ({})",
                target.declared_name, edge.provenance
            )));
            concept.supertypes.push(supertype);
        }

        for other in index.disjoint.get(&classifier.id).into_iter().flatten() {
            if let Some(target) = taxonomy.classifier(other) {
                concept.annotations.push(Annotation::Comment(format!(
                    "disjoint with {}",
                    target.qualified_name
                )));
            }
        }

        vocabulary.add_concept(concept);
    }
    vocabulary
}

/// Returns how `vocabulary` (emitted at `from`) refers to `target`,
/// importing the target's vocabulary when it lives elsewhere.
pub(crate) fn reference(vocabulary: &mut Vocabulary, from: &DocumentIri, target: &Classifier) -> String {
    if target.owner_document == *from {
        return target.id.to_string();
    }
    let prefix = vocabulary.import(
        target.owner_document.as_str(),
        target.owner_document.last_segment(),
    );
    format!("{prefix}:{}", target.id)
}
