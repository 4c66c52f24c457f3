//! The implicit-supertype table.
//!
//! A CSV file with a header row; the first column is a structural kind and
//! the second the qualified name of the classifier every element of that
//! kind implicitly specializes, e.g.
//!
//! ```text
//! kind,supertype
//! Behavior,Performances::Performance
//! Class,Occurrences::Occurrence
//! ```
//!
//! Further columns are ignored. Kinds are normalized the same way extracted
//! kinds are (namespace prefix removed) and supertypes are parsed as
//! [`QualifiedName`]s.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use taxonomize_schemas::QualifiedName;
use tracing::{debug, instrument};

use crate::error::{ExtractError, ExtractErrorKind};
use crate::xmi::local;

/// Immutable `kind -> implicit supertype` lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindMap {
    entries: BTreeMap<String, QualifiedName>,
}

impl KindMap {
    /// Loads the table from a CSV file.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        let file = std::fs::File::open(path).map_err(|source| {
            ExtractError::new(ExtractErrorKind::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        let map = Self::from_reader(file).map_err(|source| {
            ExtractError::new(ExtractErrorKind::KindMap {
                path: path.to_path_buf(),
                source,
            })
        })?;
        debug!(entries = map.len(), "loaded kind map");
        Ok(map)
    }

    /// Reads the table from any CSV source. Rows with an empty key or value
    /// are skipped.
    pub fn from_reader(reader: impl Read) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = BTreeMap::new();
        for record in reader.records() {
            let record = record?;
            let (Some(kind), Some(supertype)) = (record.get(0), record.get(1)) else {
                continue;
            };
            if kind.is_empty() {
                continue;
            }
            if let Some(supertype) = QualifiedName::parse(supertype) {
                entries.insert(local(kind).to_owned(), supertype);
            }
        }
        Ok(Self { entries })
    }

    /// Looks up the implicit supertype for `kind`.
    pub fn get(&self, kind: &str) -> Option<&QualifiedName> {
        self.entries.get(kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for KindMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .filter_map(|(k, v)| {
                QualifiedName::parse(v.as_ref()).map(|qn| (local(k.as_ref()).to_owned(), qn))
            })
            .collect();
        Self { entries }
    }
}
