//! Integration tests for taxonomize-emit.
//!
//! Extracts the fixture library shipped with taxonomize-extract and emits
//! it into a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use taxonomize_emit::{EmitConfig, emit};
use taxonomize_extract::{ExtractConfig, KindMap, Taxonomy, run};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../taxonomize-extract/tests/fixtures")
}

fn library() -> Taxonomy {
    let kind_map = KindMap::load(&fixtures().join("implicit-supertypes.csv"))
        .expect("kind map should load");
    run(&ExtractConfig::with_roots([fixtures().join("library")]), &kind_map)
        .expect("run() should succeed")
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

/// One vocabulary per document plus the catalog.
#[test]
fn test_document_vocabularies() {
    let taxonomy = library();
    let out = tempfile::tempdir().unwrap();
    let summary = emit(&taxonomy, None, &EmitConfig::new(out.path())).expect("emit should succeed");

    assert!(summary.failures.is_empty());
    assert_eq!(summary.vocabularies, 3);
    assert_eq!(summary.written.len(), 4);

    let parts = read(&out.path().join("omg.org/SysML-v2/Systems-Library/Parts.oml"));
    assert!(parts.starts_with("vocabulary <http://omg.org/SysML-v2/Systems-Library/Parts#> as Parts {"));
    assert_eq!(
        parts
            .matches("uses <http://omg.org/SysML-v2/Kernel-Libraries/Occurrences#>")
            .count(),
        1
    );
    assert!(parts.contains("\tconcept widget < part\n"));
    assert!(parts.contains("\t@rdfs:comment \"specializes Performance as Occurrences:performance (implicit)\"\n\tconcept gadget < Occurrences:performance\n"));

    let catalog = read(&out.path().join("catalog.xml"));
    assert!(catalog.contains(
        r#"<rewriteURI uriStartString="http://omg.org/SysML-v2/Kernel-Libraries" rewritePrefix="./omg.org/SysML-v2/Kernel-Libraries"/>"#
    ));
    assert!(catalog.contains(r#"<rewriteURI uriStartString="http://" rewritePrefix="./"/>"#));
}

/// Re-emitting the same taxonomy produces identical files.
#[test]
fn test_deterministic() {
    let taxonomy = library();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    emit(&taxonomy, None, &EmitConfig::new(first.path())).unwrap();
    emit(&taxonomy, None, &EmitConfig::new(second.path())).unwrap();

    for rel in [
        "catalog.xml",
        "omg.org/SysML-v2/Kernel-Libraries/Base.oml",
        "omg.org/SysML-v2/Systems-Library/Parts.oml",
    ] {
        assert_eq!(read(&first.path().join(rel)), read(&second.path().join(rel)), "{rel}");
    }
}

/// Bundle, pairwise vocabulary, and edge list.
#[test]
fn test_aggregate_artifacts() {
    let taxonomy = library();
    let out = tempfile::tempdir().unwrap();
    let config = EmitConfig {
        bundle_stem: Some("Library".into()),
        pairwise_stem: Some("Pairs".into()),
        max_pairs: Some(10),
        edge_list: Some(out.path().join("tables/edges.csv")),
        ..EmitConfig::new(out.path())
    };
    let report = taxonomy.closure().analyze(config.pairwise_options());
    assert!(report.truncated);
    assert_eq!(report.pairs.len(), 10);

    let summary = emit(&taxonomy, Some(&report), &config).expect("emit should succeed");
    assert!(summary.failures.is_empty());
    assert_eq!(summary.edge_rows, 6);

    let bundle = read(&out.path().join("omg.org/SysML-v2/Library.oml"));
    assert!(bundle.starts_with("bundle <http://omg.org/SysML-v2/Library#> as Library {"));
    assert_eq!(bundle.matches("\tincludes <").count(), 3);

    let pairs = read(&out.path().join("omg.org/SysML-v2/Pairs.oml"));
    let concepts = pairs.matches("\tconcept pair-").count() as u64;
    assert_eq!(concepts + summary.skipped_pairs, 10);
    assert!(pairs.contains("@rdfs:comment \"satisfiable\""));

    let edges = read(&out.path().join("tables/edges.csv"));
    assert!(edges.starts_with("super,sub\n"));

    let catalog = read(&out.path().join("catalog.xml"));
    assert!(catalog.contains(r#"uriStartString="http://omg.org/SysML-v2" rewritePrefix="./omg.org/SysML-v2""#));
}

/// The pairwise vocabulary is only written alongside a bundle.
#[test]
fn test_pairwise_requires_bundle() {
    let taxonomy = library();
    let out = tempfile::tempdir().unwrap();
    let config = EmitConfig {
        pairwise_stem: Some("Pairs".into()),
        ..EmitConfig::new(out.path())
    };
    let report = taxonomy.closure().analyze(config.pairwise_options());
    emit(&taxonomy, Some(&report), &config).unwrap();
    assert!(!out.path().join("omg.org/SysML-v2/Pairs.oml").exists());
}

/// A failed vocabulary does not stop the others.
#[test]
fn test_artifact_failure_isolated() {
    let taxonomy = library();
    let out = tempfile::tempdir().unwrap();
    // A file where the Systems-Library directory should be.
    fs::create_dir_all(out.path().join("omg.org/SysML-v2")).unwrap();
    fs::write(out.path().join("omg.org/SysML-v2/Systems-Library"), "").unwrap();

    let config = EmitConfig {
        bundle_stem: Some("Library".into()),
        ..EmitConfig::new(out.path())
    };
    let summary = emit(&taxonomy, None, &config).expect("emit should succeed");

    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].is_io());
    assert_eq!(summary.vocabularies, 2);
    assert!(out.path().join("omg.org/SysML-v2/Kernel-Libraries/Base.oml").exists());
    assert!(out.path().join("omg.org/SysML-v2/Library.oml").exists());
}

/// A catalog that cannot be written fails the whole emission.
#[test]
fn test_catalog_failure_is_fatal() {
    let taxonomy = library();
    let out = tempfile::tempdir().unwrap();
    fs::create_dir_all(out.path().join("catalog.xml")).unwrap();

    let err = emit(&taxonomy, None, &EmitConfig::new(out.path())).unwrap_err();
    assert!(err.is_io());
    assert!(!out.path().join("omg.org").exists());
}

/// Without a catalog name no catalog is written.
#[test]
fn test_catalog_optional() {
    let taxonomy = library();
    let out = tempfile::tempdir().unwrap();
    let config = EmitConfig {
        catalog: None,
        ..EmitConfig::new(out.path())
    };
    let summary = emit(&taxonomy, None, &config).unwrap();
    assert_eq!(summary.written.len(), 3);
    assert!(!out.path().join("catalog.xml").exists());
}
