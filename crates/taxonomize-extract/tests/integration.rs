//! Integration tests for taxonomize-extract.
//!
//! These tests run the public API over the checked-in XMI library under
//! `tests/fixtures/library`.

use std::path::{Path, PathBuf};

use taxonomize_extract::{
    ClassifierId, ExtractConfig, KindMap, LoadPolicy, Provenance, QualifiedName, Taxonomy, run,
};
use taxonomize_graph::PairwiseOptions;

fn fixture(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(rel)
}

fn kind_map() -> KindMap {
    KindMap::load(&fixture("implicit-supertypes.csv")).expect("kind map should load")
}

fn library() -> Taxonomy {
    let config = ExtractConfig::with_roots([fixture("library")]);
    run(&config, &kind_map()).expect("run() should succeed")
}

fn id(s: &str) -> ClassifierId {
    ClassifierId::new(s)
}

/// Every taxonomy document is loaded and non-taxonomy files are ignored.
#[test]
fn test_documents() {
    let taxonomy = library();
    let iris: Vec<&str> = taxonomy.documents.keys().map(|iri| iri.as_str()).collect();
    assert_eq!(
        iris,
        vec![
            "http://omg.org/SysML-v2/Kernel-Libraries/Base",
            "http://omg.org/SysML-v2/Kernel-Libraries/Occurrences",
            "http://omg.org/SysML-v2/Systems-Library/Parts",
        ]
    );
    let parts = &taxonomy.documents[2];
    assert_eq!(
        parts.output_path,
        PathBuf::from("omg.org/SysML-v2/Systems-Library/Parts.oml")
    );
    assert!(taxonomy.failures.is_empty());
}

/// Re-running on the same corpus yields the same identities.
#[test]
fn test_idempotent() {
    let first = library();
    let second = library();
    assert_eq!(first.documents, second.documents);
    assert_eq!(first.summary, second.summary);
}

/// Unnamed classifiers and non-classifier members are not extracted.
#[test]
fn test_classifiers() {
    let taxonomy = library();
    assert_eq!(taxonomy.summary.classifiers, 7);
    assert!(taxonomy.classifier(&id("anonymous")).is_none());
    assert!(taxonomy.classifier(&id("things")).is_none());

    let gadget = taxonomy
        .by_qualified_name(&QualifiedName::new("Parts", "Gadget"))
        .expect("Gadget should be extracted");
    assert_eq!(gadget.kind, "Interaction");
}

/// Both reference shapes and cross-document forward references resolve.
#[test]
fn test_explicit_edges() {
    let taxonomy = library();
    assert_eq!(taxonomy.summary.explicit_edges, 5);
    assert_eq!(taxonomy.summary.rejected_edges, 0);

    let explicit: Vec<(String, String)> = taxonomy
        .specialization
        .edges()
        .filter(|e| e.provenance == Provenance::Explicit)
        .map(|e| (e.sub.to_string(), e.sup.to_string()))
        .collect();
    assert!(explicit.contains(&("occurrence".into(), "anything".into())));
    assert!(explicit.contains(&("data-value".into(), "anything".into())));
    // Dangling targets still become vertices.
    assert!(explicit.contains(&("widget".into(), "missing".into())));
    assert!(taxonomy.specialization.contains_vertex(&id("missing")));
}

/// Implicit supertypes are inferred only for classifiers without declared
/// superclasses, and unresolvable targets are dropped.
#[test]
fn test_implicit_edges() {
    let taxonomy = library();
    assert_eq!(taxonomy.summary.implicit_edges, 2);
    assert_eq!(taxonomy.summary.dropped_implicit_edges, 1);

    let mut implicit: Vec<(String, String)> = taxonomy
        .specialization
        .edges()
        .filter(|e| e.provenance == Provenance::Implicit)
        .map(|e| (e.sub.to_string(), e.sup.to_string()))
        .collect();
    implicit.sort();
    assert_eq!(
        implicit,
        vec![
            ("gadget".to_owned(), "performance".to_owned()),
            ("part".to_owned(), "occurrence".to_owned()),
        ]
    );
}

#[test]
fn test_disjointness() {
    let taxonomy = library();
    assert_eq!(taxonomy.summary.disjointness_edges, 1);
    let edges: Vec<_> = taxonomy.disjointness.edges().collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].a, id("data-value"));
    assert_eq!(edges[0].b, id("occurrence"));
}

/// The dangling vertex shares no ancestor with anything but its subtype.
#[test]
fn test_satisfiability() {
    let taxonomy = library();
    let report = taxonomy.closure().analyze(PairwiseOptions::default());
    assert_eq!(report.vertex_count, 8);
    assert_eq!(report.pair_count, 28);
    assert_eq!(report.analyzed_pairs, 28);
    assert_eq!(report.unsatisfiable_pairs, 6);

    let closure = taxonomy.closure();
    assert_eq!(closure.satisfiable(&id("missing"), &id("widget")), Some(true));
    assert_eq!(closure.satisfiable(&id("gadget"), &id("part")), Some(true));
    assert_eq!(closure.satisfiable(&id("missing"), &id("part")), Some(false));
}

/// A document without a library package is skipped or fatal depending on
/// the load policy.
#[test]
fn test_load_policy() {
    let mut config = ExtractConfig::with_roots([fixture("library"), fixture("broken")]);
    let taxonomy = run(&config, &kind_map()).expect("run() should succeed");
    assert_eq!(taxonomy.summary.documents, 3);
    assert_eq!(taxonomy.summary.failed_documents, 1);
    assert!(taxonomy.failures[0].is_missing_package());

    config.load_policy = LoadPolicy::Abort;
    let err = run(&config, &kind_map()).unwrap_err();
    assert!(err.is_missing_package());
    assert!(err.path().is_some_and(|p| p.ends_with("NoPackage.kermlx")));
}

/// Without a kind map no implicit edge is inferred.
#[test]
fn test_empty_kind_map() {
    let config = ExtractConfig::with_roots([fixture("library")]);
    let taxonomy = run(&config, &KindMap::default()).expect("run() should succeed");
    assert_eq!(taxonomy.summary.implicit_edges, 0);
    assert!(taxonomy.implicit_edges.is_empty());
}
