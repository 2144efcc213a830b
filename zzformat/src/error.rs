use thiserror::Error;

/// Errors produced by the format registry and its format adapters (§4.2, §7).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No format is registered under the requested name.
    #[error("unknown format {name:?}")]
    UnknownFormat {
        /// The requested format name.
        name: String,
    },

    /// A probe was inconclusive; callers should treat the candidate as "not a container".
    #[error("not applicable")]
    NotApplicable,

    /// The archive reader detected truncated or malformed input partway through reading.
    #[error("corrupt archive at {path}")]
    CorruptArchive {
        /// The path (including nested `!`/`%` markers) at which corruption was detected.
        path: String,
        /// The underlying error, if any.
        #[source]
        source: Option<std::io::Error>,
    },

    /// The requested format does not support writing.
    #[error("format {name} does not support writing")]
    UnsupportedWrite {
        /// The format that was asked to open a writer.
        name: String,
    },

    /// Generic I/O failure while reading or writing a stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure inside the libarchive-backed catch-all adapter.
    #[error(transparent)]
    Libarchive(#[from] compress_tools::Error),

    /// Failure inside the native zip adapter.
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
