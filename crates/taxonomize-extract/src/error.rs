//! Error types for the taxonomize-extract crate.

use std::backtrace::Backtrace;
use std::fmt;
use std::path::{Path, PathBuf};

/// Error type for corpus loading and kind-map loading.
///
/// Document-level failures (unreadable file, malformed XMI, missing library
/// package, colliding IRI or output path) are isolated per document and only abort the run under
/// [`LoadPolicy::Abort`](crate::LoadPolicy::Abort). Kind-map failures are
/// always fatal.
#[derive(Debug)]
pub struct ExtractError {
    kind: ExtractErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods instead.
#[derive(Debug)]
pub(crate) enum ExtractErrorKind {
    /// Failed to read a file.
    Io { path: PathBuf, source: std::io::Error },
    /// Failed to walk an input root.
    Walk(walkdir::Error),
    /// The document is not well-formed XML.
    Xml { path: PathBuf, source: quick_xml::Error },
    /// The document has unbalanced or missing elements.
    Malformed { path: PathBuf, reason: &'static str },
    /// No `LibraryPackage` owned by the top-level namespace.
    MissingLibraryPackage { path: PathBuf },
    /// The library package has no `declaredName`.
    UnnamedLibraryPackage { path: PathBuf },
    /// Two documents derived the same IRI.
    DuplicateDocument { path: PathBuf, iri: String },
    /// Two documents derived the same output path.
    DuplicateOutput { path: PathBuf, output: PathBuf },
    /// The kind-map table could not be read.
    KindMap { path: PathBuf, source: csv::Error },
}

impl ExtractError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: ExtractErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    /// Returns true if this error is due to I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(
            self.kind,
            ExtractErrorKind::Io { .. } | ExtractErrorKind::Walk(_)
        )
    }

    /// Returns true if the document could not be parsed as XMI.
    pub fn is_parse(&self) -> bool {
        matches!(
            self.kind,
            ExtractErrorKind::Xml { .. } | ExtractErrorKind::Malformed { .. }
        )
    }

    /// Returns true if the document has no usable top-level library package.
    pub fn is_missing_package(&self) -> bool {
        matches!(
            self.kind,
            ExtractErrorKind::MissingLibraryPackage { .. }
                | ExtractErrorKind::UnnamedLibraryPackage { .. }
        )
    }

    /// Returns true if the document's IRI collided with an earlier one.
    pub fn is_duplicate_document(&self) -> bool {
        matches!(self.kind, ExtractErrorKind::DuplicateDocument { .. })
    }

    /// Returns true if the document's output path collided with an earlier one.
    pub fn is_duplicate_output(&self) -> bool {
        matches!(self.kind, ExtractErrorKind::DuplicateOutput { .. })
    }

    /// Returns true if the kind-map table could not be loaded.
    pub fn is_kind_map(&self) -> bool {
        matches!(self.kind, ExtractErrorKind::KindMap { .. })
    }

    /// Returns the file this error concerns, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.kind {
            ExtractErrorKind::Io { path, .. }
            | ExtractErrorKind::Xml { path, .. }
            | ExtractErrorKind::Malformed { path, .. }
            | ExtractErrorKind::MissingLibraryPackage { path }
            | ExtractErrorKind::UnnamedLibraryPackage { path }
            | ExtractErrorKind::DuplicateDocument { path, .. }
            | ExtractErrorKind::DuplicateOutput { path, .. }
            | ExtractErrorKind::KindMap { path, .. } => Some(path),
            ExtractErrorKind::Walk(err) => err.path(),
        }
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for ExtractErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractErrorKind::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ExtractErrorKind::Walk(err) => {
                write!(f, "failed to walk input: {err}")
            }
            ExtractErrorKind::Xml { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
            ExtractErrorKind::Malformed { path, reason } => {
                write!(f, "malformed document {}: {reason}", path.display())
            }
            ExtractErrorKind::MissingLibraryPackage { path } => {
                write!(f, "no library package found in {}", path.display())
            }
            ExtractErrorKind::UnnamedLibraryPackage { path } => {
                write!(f, "library package in {} has no declared name", path.display())
            }
            ExtractErrorKind::DuplicateDocument { path, iri } => {
                write!(f, "{} duplicates document IRI {iri}", path.display())
            }
            ExtractErrorKind::DuplicateOutput { path, output } => {
                write!(f, "{} duplicates output path {}", path.display(), output.display())
            }
            ExtractErrorKind::KindMap { path, source } => {
                write!(f, "failed to load kind map {}: {source}", path.display())
            }
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Summary of what happened.
        writeln!(f, "{}", self.kind)?;

        // Backtrace (will be empty unless RUST_BACKTRACE is set).
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ExtractErrorKind::Io { source, .. } => Some(source),
            ExtractErrorKind::Walk(err) => Some(err),
            ExtractErrorKind::Xml { source, .. } => Some(source),
            ExtractErrorKind::KindMap { source, .. } => Some(source),
            ExtractErrorKind::Malformed { .. }
            | ExtractErrorKind::MissingLibraryPackage { .. }
            | ExtractErrorKind::UnnamedLibraryPackage { .. }
            | ExtractErrorKind::DuplicateDocument { .. }
            | ExtractErrorKind::DuplicateOutput { .. } => None,
        }
    }
}

impl From<walkdir::Error> for ExtractError {
    fn from(err: walkdir::Error) -> Self {
        Self::new(ExtractErrorKind::Walk(err))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_io() {
        let err = ExtractError::new(ExtractErrorKind::Io {
            path: PathBuf::from("a.kermlx"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        });

        assert!(err.is_io());
        assert!(!err.is_parse());
        assert!(!err.is_missing_package());
        assert_eq!(err.path(), Some(Path::new("a.kermlx")));
        assert!(err.to_string().contains("failed to read a.kermlx"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_missing_package() {
        let err = ExtractError::new(ExtractErrorKind::MissingLibraryPackage {
            path: PathBuf::from("b.sysmlx"),
        });

        assert!(err.is_missing_package());
        assert!(!err.is_io());
        assert!(err.to_string().contains("no library package found in b.sysmlx"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_malformed() {
        let err = ExtractError::new(ExtractErrorKind::Malformed {
            path: PathBuf::from("c.kermlx"),
            reason: "unclosed element",
        });

        assert!(err.is_parse());
        assert!(err.to_string().contains("unclosed element"));
    }

    #[test]
    fn test_duplicate_document() {
        let err = ExtractError::new(ExtractErrorKind::DuplicateDocument {
            path: PathBuf::from("d.kermlx"),
            iri: "http://x/D".into(),
        });

        assert!(err.is_duplicate_document());
        assert!(err.to_string().contains("http://x/D"));
    }

    #[test]
    fn test_duplicate_output() {
        let err = ExtractError::new(ExtractErrorKind::DuplicateOutput {
            path: PathBuf::from("Base.sysmlx"),
            output: PathBuf::from("omg.org/Base.oml"),
        });

        assert!(err.is_duplicate_output());
        assert!(!err.is_duplicate_document());
        assert_eq!(err.path(), Some(Path::new("Base.sysmlx")));
        assert!(err.to_string().contains("duplicates output path omg.org/Base.oml"));
    }

    #[test]
    fn test_debug_impl() {
        let err = ExtractError::new(ExtractErrorKind::MissingLibraryPackage {
            path: PathBuf::from("e.kermlx"),
        });
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("ExtractError"));
        let _ = err.backtrace();
    }
}
