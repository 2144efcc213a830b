use thiserror::Error;

/// Errors produced by the diff/patch engine (§4.5, §7).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A diff document failed to parse in any recognized dialect.
    #[error("invalid diff at line {line}: {reason}")]
    InvalidDiff {
        /// The 1-based input line where parsing failed.
        line: usize,
        /// A human-readable description of the mismatch.
        reason: String,
    },

    /// A context-diff header's line count did not match the body that followed it.
    #[error("context diff hunk header declares {declared} lines but body has {actual}")]
    HunkCountMismatch {
        /// The count recorded in the hunk header.
        declared: usize,
        /// The count actually present in the hunk body.
        actual: usize,
    },

    /// A malformed equivalence or line-ignore regex.
    #[error(transparent)]
    Path(#[from] path::Error),

    /// Failure walking a tree being diffed.
    #[error(transparent)]
    Walk(#[from] walk::Error),

    /// Failure reading a node's content while diffing it.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
