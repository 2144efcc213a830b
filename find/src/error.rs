use thiserror::Error;

/// Errors produced by the find predicate (§4.6, §7).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The expression grammar could not be parsed.
    #[error("usage: {0}")]
    Usage(String),

    /// A numeric test argument (`-size`, `-mtime`, `-mmin`) was malformed.
    #[error("invalid numeric argument {arg:?}: {reason}")]
    InvalidNumericArgument { arg: String, reason: String },

    /// A glob pattern given to `-name`/`-path` failed to compile.
    #[error(transparent)]
    Path(#[from] path::Error),

    /// A spawned `-exec`/`-pipe` child process failed to run at all.
    #[error("failed to run {command:?}: {source}")]
    Spawn { command: String, #[source] source: std::io::Error },

    #[error(transparent)]
    Walk(#[from] walk::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
