use thiserror::Error;

/// Errors produced by the contents transformer pipeline (§4.4, §7).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A patch's hunk context did not match the file being patched.
    #[error("patch rejected for {path}: hunk context mismatch at line(s) {lines:?}")]
    PatchRejected {
        /// The path being patched.
        path: String,
        /// The 1-based input line numbers where the mismatch was detected.
        lines: Vec<usize>,
    },

    /// Two archive entries resolved to the same name after rename rules were applied.
    #[error("duplicate entry {name:?} while rewriting archive at {path}")]
    DuplicateEntry {
        /// The archive being rewritten.
        path: String,
        /// The colliding entry name.
        name: String,
    },

    /// A substitute or rename transformer's regex failed to compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The offending raw regex.
        pattern: String,
        /// The underlying regex compile error.
        #[source]
        source: regex::Error,
    },

    /// Failure inside the format registry or one of its adapters.
    #[error(transparent)]
    Format(#[from] format::Error),

    /// Failure parsing a patch into a Differential.
    #[error(transparent)]
    Diff(#[from] diff::Error),

    /// A malformed path predicate or rename regex.
    #[error(transparent)]
    Path(#[from] path::Error),

    /// Generic I/O failure while reading or writing a stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
