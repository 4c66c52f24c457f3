//! Error types for the taxonomize-graph crate.

use std::backtrace::Backtrace;
use std::fmt;

use taxonomize_schemas::ClassifierId;

/// Error type for graph mutation.
///
/// The only failure a taxonomy graph can report is an edge that would make
/// the specialization graph cyclic. Callers are expected to log the error
/// and continue; the graph is left exactly as it was before the attempt.
#[derive(Debug)]
pub struct GraphError {
    kind: GraphErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum GraphErrorKind {
    /// Adding `sub -> sup` would close a cycle through `sup`.
    Cycle { sub: ClassifierId, sup: ClassifierId },
}

impl GraphError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: GraphErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    pub(crate) fn cycle(sub: &ClassifierId, sup: &ClassifierId) -> Self {
        Self::new(GraphErrorKind::Cycle {
            sub: sub.clone(),
            sup: sup.clone(),
        })
    }

    /// Returns true if the rejected edge would have closed a cycle.
    pub fn is_cycle(&self) -> bool {
        matches!(self.kind, GraphErrorKind::Cycle { .. })
    }

    /// Returns the `(sub, sup)` endpoints of the rejected edge.
    pub fn edge(&self) -> (&ClassifierId, &ClassifierId) {
        match &self.kind {
            GraphErrorKind::Cycle { sub, sup } => (sub, sup),
        }
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for GraphErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphErrorKind::Cycle { sub, sup } => write!(
                f,
                "specialization {sub} -> {sup} would close a cycle"
            ),
        }
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Summary of what happened.
        writeln!(f, "{}", self.kind)?;

        // Backtrace (will be empty unless RUST_BACKTRACE is set).
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for GraphError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle() {
        let err =
            GraphError::cycle(&ClassifierId::new("a"), &ClassifierId::new("b"));

        assert!(err.is_cycle());
        assert_eq!(err.edge().0.as_str(), "a");
        assert_eq!(err.edge().1.as_str(), "b");
        assert!(err.to_string().contains("a -> b would close a cycle"));
    }

    #[test]
    fn test_debug_impl() {
        let err =
            GraphError::cycle(&ClassifierId::new("a"), &ClassifierId::new("a"));
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("GraphError"));
        let _ = err.backtrace();
    }
}
