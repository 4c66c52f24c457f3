//! In-memory OML ontologies and their textual rendering.
//!
//! Only the subset of OML this tool emits is modeled: vocabularies holding
//! annotated concepts with specialization axioms, and bundles that include
//! vocabularies.

use std::collections::HashMap;
use std::fmt;

/// Namespace of the RDF Schema vocabulary every emitted vocabulary extends.
pub const RDFS_NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const RDFS_PREFIX: &str = "rdfs";

/// Turns a document or artifact IRI into an OML namespace.
pub fn namespace(iri: &str) -> String {
    if iri.ends_with('#') || iri.ends_with('/') {
        iri.to_owned()
    } else {
        format!("{iri}#")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Extends,
    Uses,
    Includes,
}

impl ImportKind {
    fn keyword(self) -> &'static str {
        match self {
            ImportKind::Extends => "extends",
            ImportKind::Uses => "uses",
            ImportKind::Includes => "includes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub kind: ImportKind,
    pub namespace: String,
    pub prefix: Option<String>,
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.kind.keyword(), self.namespace)?;
        if let Some(prefix) = &self.prefix {
            write!(f, " as {prefix}")?;
        }
        Ok(())
    }
}

/// An `rdfs` annotation on a concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Label(String),
    Comment(String),
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (property, value) = match self {
            Annotation::Label(v) => ("label", v),
            Annotation::Comment(v) => ("comment", v),
        };
        write!(f, "@{RDFS_PREFIX}:{property} ")?;
        write_quoted(f, value)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

/// A concept declaration with its annotations and supertypes.
///
/// Supertypes are references as they appear in the vocabulary: a bare name
/// for a local concept, `prefix:name` for an imported one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Concept {
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub supertypes: Vec<String>,
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            writeln!(f, "\t{annotation}")?;
        }
        write!(f, "\tconcept {}", self.name)?;
        if !self.supertypes.is_empty() {
            write!(f, " < {}", self.supertypes.join(", "))?;
        }
        Ok(())
    }
}

/// An OML vocabulary.
///
/// Every vocabulary extends `rdfs`. Cross-vocabulary references go through
/// [`Vocabulary::import`], which adds at most one `uses` per imported
/// namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    namespace: String,
    prefix: String,
    imports: Vec<Import>,
    /// Namespace -> position in `imports`.
    imported: HashMap<String, usize>,
    concepts: Vec<Concept>,
}

impl Vocabulary {
    pub fn new(iri: &str, prefix: &str) -> Self {
        let mut vocabulary = Self {
            namespace: namespace(iri),
            prefix: prefix.to_owned(),
            imports: Vec::new(),
            imported: HashMap::new(),
            concepts: Vec::new(),
        };
        vocabulary.push_import(ImportKind::Extends, RDFS_NAMESPACE.to_owned(), RDFS_PREFIX.to_owned());
        vocabulary
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    /// Imports the vocabulary at `iri` and returns the prefix to reference
    /// it by.
    ///
    /// Importing the same namespace again returns the existing prefix
    /// without adding a second import. A preferred prefix that is already
    /// taken gets a numeric suffix.
    pub fn import(&mut self, iri: &str, preferred_prefix: &str) -> &str {
        let namespace = namespace(iri);
        if let Some(&i) = self.imported.get(&namespace) {
            return self.imports[i].prefix.as_deref().unwrap_or_default();
        }
        let prefix = self.unique_prefix(preferred_prefix);
        let i = self.push_import(ImportKind::Uses, namespace, prefix);
        self.imports[i].prefix.as_deref().unwrap_or_default()
    }

    pub fn add_concept(&mut self, concept: Concept) {
        self.concepts.push(concept);
    }

    fn push_import(&mut self, kind: ImportKind, namespace: String, prefix: String) -> usize {
        let i = self.imports.len();
        self.imported.insert(namespace.clone(), i);
        self.imports.push(Import {
            kind,
            namespace,
            prefix: Some(prefix),
        });
        i
    }

    fn unique_prefix(&self, preferred: &str) -> String {
        let taken = |p: &str| {
            p == self.prefix
                || self
                    .imports
                    .iter()
                    .any(|import| import.prefix.as_deref() == Some(p))
        };
        if !taken(preferred) {
            return preferred.to_owned();
        }
        (2..)
            .map(|n| format!("{preferred}{n}"))
            .find(|p| !taken(p))
            .unwrap_or_else(|| preferred.to_owned())
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "vocabulary <{}> as {} {{", self.namespace, self.prefix)?;
        let mut last_kind = None;
        for import in &self.imports {
            if last_kind != Some(import.kind) {
                writeln!(f)?;
                last_kind = Some(import.kind);
            }
            writeln!(f, "\t{import}")?;
        }
        for concept in &self.concepts {
            writeln!(f)?;
            writeln!(f, "{concept}")?;
        }
        writeln!(f, "}}")
    }
}

/// An OML bundle including a set of vocabularies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    namespace: String,
    prefix: String,
    includes: Vec<Import>,
}

impl Bundle {
    pub fn new(iri: &str, prefix: &str) -> Self {
        Self {
            namespace: namespace(iri),
            prefix: prefix.to_owned(),
            includes: Vec::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn include(&mut self, iri: &str) {
        let namespace = namespace(iri);
        if self.includes.iter().all(|i| i.namespace != namespace) {
            self.includes.push(Import {
                kind: ImportKind::Includes,
                namespace,
                prefix: None,
            });
        }
    }

    pub fn includes(&self) -> &[Import] {
        &self.includes
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "bundle <{}> as {} {{", self.namespace, self.prefix)?;
        if !self.includes.is_empty() {
            writeln!(f)?;
        }
        for include in &self.includes {
            writeln!(f, "\t{include}")?;
        }
        writeln!(f, "}}")
    }
}
