// error.rs
use camino::Utf8PathBuf;
use std::{fmt, io};
use thiserror::Error;

/// Error types for search operations
///
/// Input errors (`InvalidPath`, `MalformedPattern`) are fatal for the whole
/// call. Filesystem errors met during traversal never abort a search; they
/// are collected per root into `WalkFailures` next to the partial results.
#[derive(Error, Debug)]
pub enum SearchError {
    /// A directory was not entered because it sits at the depth limit.
    /// Informational only: the walker logs it and keeps going.
    #[error("maximum depth ({depth}) exceeded at {path}")]
    MaxDepthExceeded { depth: usize, path: Utf8PathBuf },

    /// The pattern can never match anything because it does not compile
    #[error("malformed pattern {pattern:?}: {reason}")]
    MalformedPattern { pattern: String, reason: String },

    /// One or more roots could not be fully traversed
    #[error("{0}")]
    WalkFailures(WalkFailures),

    /// A root argument cannot form a filesystem path
    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    /// The async wrapper gave up waiting for the search
    #[error("search timed out")]
    Timeout,

    /// The blocking search task panicked or was cancelled
    #[error("search task failed: {0}")]
    Join(String),
}

impl SearchError {
    pub(crate) fn malformed(pattern: &str, reason: impl fmt::Display) -> Self {
        SearchError::MalformedPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` for errors that make the request itself unsatisfiable
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SearchError::MalformedPattern { .. } | SearchError::InvalidPath(_)
        )
    }
}

/// Filesystem errors recorded while walking a single root
#[derive(Debug)]
pub struct WalkFailure {
    /// The root as it was walked (lexically cleaned)
    pub root: Utf8PathBuf,
    /// Every error met under this root, in traversal order
    pub causes: Vec<io::Error>,
}

impl fmt::Display for WalkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: ", self.root.as_str())?;
        for (i, cause) in self.causes.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{cause}")?;
        }
        Ok(())
    }
}

/// Aggregate of per-root walk failures, one entry per affected root
#[derive(Debug, Default)]
pub struct WalkFailures(pub Vec<WalkFailure>);

impl WalkFailures {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WalkFailure> {
        self.0.iter()
    }

    /// Returns the failure recorded for `root`, if any
    pub fn for_root(&self, root: &str) -> Option<&WalkFailure> {
        self.0.iter().find(|f| f.root.as_str() == root)
    }
}

impl fmt::Display for WalkFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{failure}")?;
        }
        f.write_str("}")
    }
}
