//! Specialization edge-list export.
//!
//! A two-column CSV table `super,sub` of qualified names, one row per
//! specialization edge that was emitted as an axiom (both endpoints are
//! known classifiers), explicit and implicit alike, in graph insertion
//! order.

use std::io::Write;

use taxonomize_extract::Taxonomy;

/// Writes the edge list and returns the number of rows.
pub(crate) fn write_edge_list(taxonomy: &Taxonomy, out: impl Write) -> Result<usize, csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["super", "sub"])?;

    let mut rows = 0;
    for edge in taxonomy.specialization.edges() {
        let (Some(sup), Some(sub)) = (taxonomy.classifier(&edge.sup), taxonomy.classifier(&edge.sub))
        else {
            continue;
        };
        writer.write_record([sup.qualified_name.as_str(), sub.qualified_name.as_str()])?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use taxonomize_extract::{ExtractConfig, KindMap, run};

    use super::*;

    #[test]
    fn test_edge_list() {
        let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../taxonomize-extract/tests/fixtures");
        let kind_map = KindMap::load(&fixtures.join("implicit-supertypes.csv")).unwrap();
        let taxonomy =
            run(&ExtractConfig::with_roots([fixtures.join("library")]), &kind_map).unwrap();

        let mut out = Vec::new();
        let rows = write_edge_list(&taxonomy, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        // Six of the seven edges have two known endpoints.
        assert_eq!(rows, 6);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "super,sub");
        assert_eq!(lines[1], "Base:Anything,Base:DataValue");
        assert!(lines.contains(&"Occurrences:Occurrence,Parts:Part"));
        assert!(!text.contains("missing"));
    }
}
