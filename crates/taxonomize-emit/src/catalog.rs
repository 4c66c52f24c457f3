//! OASIS XML catalog mapping vocabulary IRIs to output locations.
//!
//! One `rewriteURI` rule per artifact directory, sorted by start string,
//! followed by a catch-all `http://` rule.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path};

use quick_xml::escape::escape;
use tracing::warn;

const CATALOG_NAMESPACE: &str = "urn:oasis:names:tc:entity:xmlns:xml:catalog";
const FALLBACK_START: &str = "http://";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// `uriStartString -> rewritePrefix`.
    rules: BTreeMap<String, String>,
    fallback: String,
}

impl Catalog {
    pub fn new(fallback: &str) -> Self {
        Self {
            rules: BTreeMap::new(),
            fallback: fallback.to_owned(),
        }
    }

    /// Adds the rule for the directory holding the artifact `iri`, written
    /// at `output_path` relative to the catalog.
    ///
    /// Artifacts in the same directory share one rule. If a directory was
    /// already mapped elsewhere the first mapping is kept.
    pub fn add_artifact(&mut self, iri: &str, output_path: &Path) {
        let Some((start, _)) = iri.rsplit_once('/') else {
            return;
        };
        let mut prefix = String::from(".");
        for component in output_path.parent().into_iter().flat_map(Path::components) {
            if let Component::Normal(name) = component {
                prefix.push('/');
                prefix.push_str(&name.to_string_lossy());
            }
        }

        match self.rules.get(start) {
            Some(existing) if *existing != prefix => {
                warn!(start, existing = %existing, ignored = %prefix, "conflicting catalog rule");
            }
            Some(_) => {}
            None => {
                self.rules.insert(start.to_owned(), prefix);
            }
        }
    }

    /// Iterates `(uriStartString, rewritePrefix)` in output order, fallback
    /// last.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules
            .iter()
            .map(|(start, prefix)| (start.as_str(), prefix.as_str()))
            .chain([(FALLBACK_START, self.fallback.as_str())])
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#)?;
        writeln!(f, r#"<catalog xmlns="{CATALOG_NAMESPACE}" prefer="public">"#)?;
        for (start, prefix) in self.rules() {
            writeln!(
                f,
                r#"  <rewriteURI uriStartString="{}" rewritePrefix="{}"/>"#,
                escape(start),
                escape(prefix)
            )?;
        }
        writeln!(f, "</catalog>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_per_directory() {
        let mut catalog = Catalog::new("./");
        catalog.add_artifact(
            "http://omg.org/SysML-v2/Systems-Library/Parts",
            Path::new("omg.org/SysML-v2/Systems-Library/Parts.oml"),
        );
        catalog.add_artifact(
            "http://omg.org/SysML-v2/Kernel-Libraries/Base",
            Path::new("omg.org/SysML-v2/Kernel-Libraries/Base.oml"),
        );
        catalog.add_artifact(
            "http://omg.org/SysML-v2/Kernel-Libraries/Occurrences",
            Path::new("omg.org/SysML-v2/Kernel-Libraries/Occurrences.oml"),
        );

        let rules: Vec<_> = catalog.rules().collect();
        assert_eq!(
            rules,
            vec![
                (
                    "http://omg.org/SysML-v2/Kernel-Libraries",
                    "./omg.org/SysML-v2/Kernel-Libraries"
                ),
                (
                    "http://omg.org/SysML-v2/Systems-Library",
                    "./omg.org/SysML-v2/Systems-Library"
                ),
                ("http://", "./"),
            ]
        );
    }

    #[test]
    fn test_conflicting_rule_keeps_first() {
        let mut catalog = Catalog::new("./");
        catalog.add_artifact("http://x/a/One", Path::new("x/a/One.oml"));
        catalog.add_artifact("http://x/a/Two", Path::new("elsewhere/Two.oml"));
        assert_eq!(catalog.rules().next(), Some(("http://x/a", "./x/a")));
    }

    #[test]
    fn test_render() {
        let mut catalog = Catalog::new("src/oml");
        catalog.add_artifact("http://x/a&b/One", Path::new("x/a&b/One.oml"));
        let expected = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<catalog xmlns="urn:oasis:names:tc:entity:xmlns:xml:catalog" prefer="public">
  <rewriteURI uriStartString="http://x/a&amp;b" rewritePrefix="./x/a&amp;b"/>
  <rewriteURI uriStartString="http://" rewritePrefix="src/oml"/>
</catalog>
"#;
        assert_eq!(catalog.to_string(), expected);
    }
}
