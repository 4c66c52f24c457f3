//! The per-run context that owns every index and graph.
//!
//! A [`Run`] is created empty, fed one document at a time in corpus order,
//! then moved through implicit inference and frozen into a [`Taxonomy`].
//! Nothing outlives the run except the returned taxonomy.

use indexmap::IndexMap;
use indexmap::map::Entry;
use taxonomize_graph::{
    Closure, DisjointnessGraph, FrozenSpecializationGraph, SpecializationGraph,
};
use taxonomize_schemas::{
    Classifier, ClassifierId, Document, DocumentIri, ImplicitEdge, Provenance, QualifiedName,
    RunSummary,
};
use tracing::{debug, info, instrument, warn};

use crate::KindMap;
use crate::classifiers::ExtractedClassifier;
use crate::error::ExtractError;

/// The finished, immutable result of graph construction.
#[derive(Debug)]
pub struct Taxonomy {
    /// Loaded documents, in corpus order.
    pub documents: IndexMap<DocumentIri, Document>,
    /// Extracted classifiers, in extraction order.
    pub classifiers: IndexMap<ClassifierId, Classifier>,
    pub specialization: FrozenSpecializationGraph,
    pub disjointness: DisjointnessGraph,
    /// Implicit edges as inferred, keyed by qualified name. Includes edges
    /// that were dropped because their target named no classifier.
    pub implicit_edges: Vec<ImplicitEdge>,
    pub summary: RunSummary,
    /// Documents that failed to load and were skipped.
    pub failures: Vec<ExtractError>,
    by_declared_name: IndexMap<String, ClassifierId>,
    by_qualified_name: IndexMap<QualifiedName, ClassifierId>,
}

impl Taxonomy {
    pub fn classifier(&self, id: &ClassifierId) -> Option<&Classifier> {
        self.classifiers.get(id)
    }

    /// Looks a classifier up by declared name. Declared names are not
    /// unique; the first classifier extracted under the name is returned.
    pub fn by_declared_name(&self, name: &str) -> Option<&Classifier> {
        self.by_declared_name
            .get(name)
            .and_then(|id| self.classifiers.get(id))
    }

    pub fn by_qualified_name(&self, name: &QualifiedName) -> Option<&Classifier> {
        self.by_qualified_name
            .get(name)
            .and_then(|id| self.classifiers.get(id))
    }

    /// The document that declared `id`, if `id` is a known classifier.
    pub fn owner(&self, id: &ClassifierId) -> Option<&Document> {
        self.classifiers
            .get(id)
            .and_then(|c| self.documents.get(&c.owner_document))
    }

    /// Computes every ancestor set over the frozen specialization graph.
    pub fn closure(&self) -> Closure {
        self.specialization.closure()
    }
}

/// Mutable state of one extraction run.
#[derive(Debug, Default)]
pub(crate) struct Run {
    documents: IndexMap<DocumentIri, Document>,
    classifiers: IndexMap<ClassifierId, Classifier>,
    by_declared_name: IndexMap<String, ClassifierId>,
    by_qualified_name: IndexMap<QualifiedName, ClassifierId>,
    specialization: SpecializationGraph,
    disjointness: DisjointnessGraph,
    implicit_edges: Vec<ImplicitEdge>,
    summary: RunSummary,
    failures: Vec<ExtractError>,
}

impl Run {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_failures(&mut self, failures: Vec<ExtractError>) {
        self.summary.failed_documents += failures.len();
        self.failures.extend(failures);
    }

    /// Registers a document and every classifier extracted from it, and
    /// inserts their declared edges.
    ///
    /// A classifier id already registered by an earlier document is
    /// skipped with a warning; the first declaration wins.
    pub(crate) fn merge_document(&mut self, document: Document, extracted: Vec<ExtractedClassifier>) {
        let iri = document.iri.clone();
        self.documents.insert(iri.clone(), document);
        self.summary.documents += 1;

        for ExtractedClassifier {
            classifier,
            superclasses,
            disjoint_with,
        } in extracted
        {
            let id = classifier.id.clone();
            match self.classifiers.entry(id.clone()) {
                Entry::Occupied(existing) => {
                    warn!(
                        id = %id,
                        first = %existing.get().owner_document,
                        duplicate = %iri,
                        "duplicate classifier id, keeping the first"
                    );
                    continue;
                }
                Entry::Vacant(slot) => {
                    self.by_declared_name
                        .entry(classifier.declared_name.clone())
                        .or_insert_with(|| id.clone());
                    self.by_qualified_name
                        .entry(classifier.qualified_name.clone())
                        .or_insert_with(|| id.clone());
                    slot.insert(classifier);
                }
            }

            self.specialization.add_vertex(&id);
            for sup in &superclasses {
                self.add_specialization(&id, sup, Provenance::Explicit);
            }
            for other in &disjoint_with {
                self.disjointness.add_edge(&id, other);
            }
        }
    }

    /// Synthesizes one implicit edge for every classifier that has no
    /// outgoing specialization edge and whose kind has an entry in
    /// `kind_map`.
    ///
    /// Runs after every document is merged, so a classifier whose declared
    /// superclasses were all rejected as cycles still gets one.
    #[instrument(level = "debug", skip_all)]
    pub(crate) fn infer_implicit(&mut self, kind_map: &KindMap) {
        for classifier in self.classifiers.values() {
            if self.specialization.has_supertype(&classifier.id) {
                continue;
            }
            let Some(target) = kind_map.get(&classifier.kind) else {
                continue;
            };
            if *target == classifier.qualified_name {
                debug!(classifier = %classifier.qualified_name, "skipping self-targeting implicit edge");
                continue;
            }
            self.implicit_edges.push(ImplicitEdge {
                sub: classifier.qualified_name.clone(),
                sup: target.clone(),
            });
        }
        debug!(inferred = self.implicit_edges.len(), "inferred implicit edges");
    }

    /// Resolves implicit edges to classifier ids and inserts them.
    ///
    /// Edges whose target qualified name names no known classifier are
    /// dropped; the target is usually a built-in kind the corpus never
    /// declares.
    #[instrument(level = "debug", skip_all)]
    pub(crate) fn merge_implicit(&mut self) {
        let edges = std::mem::take(&mut self.implicit_edges);
        for edge in &edges {
            let resolved = (
                self.by_qualified_name.get(&edge.sub).cloned(),
                self.by_qualified_name.get(&edge.sup).cloned(),
            );
            let (Some(sub), Some(sup)) = resolved else {
                debug!(sub = %edge.sub, sup = %edge.sup, "dropping unresolved implicit edge");
                self.summary.dropped_implicit_edges += 1;
                continue;
            };
            self.add_specialization(&sub, &sup, Provenance::Implicit);
        }
        self.implicit_edges = edges;
    }

    /// Ends construction. No edge can be added afterwards.
    pub(crate) fn freeze(mut self) -> Taxonomy {
        self.summary.classifiers = self.classifiers.len();
        self.summary.disjointness_edges = self.disjointness.edge_count();

        let summary = &self.summary;
        info!(
            documents = summary.documents,
            failed_documents = summary.failed_documents,
            classifiers = summary.classifiers,
            explicit_edges = summary.explicit_edges,
            implicit_edges = summary.implicit_edges,
            dropped_implicit_edges = summary.dropped_implicit_edges,
            rejected_edges = summary.rejected_edges,
            disjointness_edges = summary.disjointness_edges,
            "taxonomy frozen"
        );

        Taxonomy {
            documents: self.documents,
            classifiers: self.classifiers,
            specialization: self.specialization.freeze(),
            disjointness: self.disjointness,
            implicit_edges: self.implicit_edges,
            summary: self.summary,
            failures: self.failures,
            by_declared_name: self.by_declared_name,
            by_qualified_name: self.by_qualified_name,
        }
    }

    fn add_specialization(&mut self, sub: &ClassifierId, sup: &ClassifierId, provenance: Provenance) {
        match self.specialization.add_edge(sub, sup, provenance) {
            Ok(true) => match provenance {
                Provenance::Explicit => self.summary.explicit_edges += 1,
                Provenance::Implicit => self.summary.implicit_edges += 1,
            },
            Ok(false) => debug!(%sub, %sup, "duplicate specialization edge"),
            Err(err) => {
                warn!(%sub, %sup, %provenance, "rejected specialization edge: {err}");
                self.summary.rejected_edges += 1;
            }
        }
    }
}
