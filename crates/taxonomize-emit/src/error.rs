//! Error types for the taxonomize-emit crate.

use std::backtrace::Backtrace;
use std::fmt;
use std::path::{Path, PathBuf};

/// Error type for artifact emission.
///
/// Each error names the artifact that failed. A failed catalog is fatal to
/// the whole emission; every other artifact fails on its own.
#[derive(Debug)]
pub struct EmitError {
    kind: EmitErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods instead.
#[derive(Debug)]
pub(crate) enum EmitErrorKind {
    /// Failed to create a directory or write a file.
    Io { path: PathBuf, source: std::io::Error },
    /// Failed to write the edge-list table.
    Csv { path: PathBuf, source: csv::Error },
}

impl EmitError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: EmitErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::new(EmitErrorKind::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        Self::new(EmitErrorKind::Csv {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns true if this error is due to I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, EmitErrorKind::Io { .. })
    }

    /// Returns true if the edge-list table could not be written.
    pub fn is_csv(&self) -> bool {
        matches!(self.kind, EmitErrorKind::Csv { .. })
    }

    /// Returns the artifact path that failed.
    pub fn path(&self) -> &Path {
        match &self.kind {
            EmitErrorKind::Io { path, .. } | EmitErrorKind::Csv { path, .. } => path,
        }
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for EmitErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitErrorKind::Io { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
            EmitErrorKind::Csv { path, source } => {
                write!(f, "failed to write edge list {}: {source}", path.display())
            }
        }
    }
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for EmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            EmitErrorKind::Io { source, .. } => Some(source),
            EmitErrorKind::Csv { source, .. } => Some(source),
        }
    }
}
