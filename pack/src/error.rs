use thiserror::Error;

/// Errors produced by the pack assembler (§4.7, §7).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An input path is neither a file nor a directory.
    #[error("{path:?} is not packable; it must be a file or a directory")]
    NotPackable { path: std::path::PathBuf },

    /// Two inputs (or one input and a rename rule) resolved to the same entry name.
    #[error("duplicate entry {name:?}")]
    DuplicateEntry { name: String },

    /// A `--rename` rule's regex failed to compile.
    #[error("invalid rename pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A `--rename PATTERN=REPLACEMENT` argument had no `=` separator.
    #[error("invalid rename rule {raw:?}: expected PATTERN=REPLACEMENT")]
    InvalidRenameRule { raw: String },

    #[error(transparent)]
    Format(#[from] format::Error),
    #[error(transparent)]
    Walk(#[from] walk::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
