//! The pairwise-intersection vocabulary.
//!
//! For every analyzed pair `{a, b}` a concept specializing both is
//! synthesized and annotated with the pair's verdict. Pairs with a member
//! that is not a known classifier (a dangling vertex) have no concept to
//! specialize and are skipped.

use taxonomize_extract::Taxonomy;
use taxonomize_schemas::{DocumentIri, SatisfiabilityReport};
use tracing::debug;

use crate::oml::{Annotation, Concept, Vocabulary};
use crate::vocabularies::reference;

/// Builds the pairwise vocabulary at `iri`.
///
/// Returns the vocabulary and the number of pairs skipped.
pub(crate) fn pairwise_vocabulary(
    taxonomy: &Taxonomy,
    report: &SatisfiabilityReport,
    iri: &str,
) -> (Vocabulary, u64) {
    let here = DocumentIri::new(iri);
    let mut vocabulary = Vocabulary::new(here.as_str(), here.last_segment());
    let mut skipped = 0;

    for (n, verdict) in report.pairs.iter().enumerate() {
        let (Some(a), Some(b)) = (taxonomy.classifier(&verdict.a), taxonomy.classifier(&verdict.b))
        else {
            skipped += 1;
            continue;
        };
        let verdict_text = if verdict.satisfiable { "satisfiable" } else { "unsatisfiable" };
        let supertypes = vec![
            reference(&mut vocabulary, &here, a),
            reference(&mut vocabulary, &here, b),
        ];
        vocabulary.add_concept(Concept {
            name: format!("pair-{}", n + 1),
            annotations: vec![
                Annotation::Label(format!("{} & {}", a.declared_name, b.declared_name)),
                Annotation::Comment(verdict_text.to_owned()),
            ],
            supertypes,
        });
    }

    debug!(
        concepts = vocabulary.concepts().len(),
        skipped, "built pairwise vocabulary"
    );
    (vocabulary, skipped)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use taxonomize_extract::{ExtractConfig, KindMap, run};
    use taxonomize_graph::PairwiseOptions;

    use super::*;

    fn fixture_taxonomy() -> Taxonomy {
        let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../taxonomize-extract/tests/fixtures");
        let kind_map = KindMap::load(&fixtures.join("implicit-supertypes.csv")).unwrap();
        run(&ExtractConfig::with_roots([fixtures.join("library")]), &kind_map).unwrap()
    }

    #[test]
    fn test_pairwise_concepts() {
        let taxonomy = fixture_taxonomy();
        let report = taxonomy.closure().analyze(PairwiseOptions {
            max_pairs: None,
            record_verdicts: true,
        });
        let (vocabulary, skipped) =
            pairwise_vocabulary(&taxonomy, &report, "http://omg.org/SysML-v2/Pairs");

        // Seven pairs involve the dangling vertex.
        assert_eq!(skipped, 7);
        assert_eq!(vocabulary.concepts().len(), 21);
        assert_eq!(vocabulary.prefix(), "Pairs");

        let first = &vocabulary.concepts()[0];
        assert_eq!(first.name, "pair-1");
        assert_eq!(first.supertypes, vec!["Base:anything", "Base:data-value"]);
        assert_eq!(
            first.annotations,
            vec![
                Annotation::Label("Anything & DataValue".into()),
                Annotation::Comment("satisfiable".into()),
            ]
        );
    }

    #[test]
    fn test_pairwise_respects_cap() {
        let taxonomy = fixture_taxonomy();
        let report = taxonomy.closure().analyze(PairwiseOptions {
            max_pairs: Some(3),
            record_verdicts: true,
        });
        let (vocabulary, skipped) =
            pairwise_vocabulary(&taxonomy, &report, "http://omg.org/SysML-v2/Pairs");
        assert_eq!(vocabulary.concepts().len() as u64 + skipped, 3);
    }
}
