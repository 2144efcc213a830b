use thiserror::Error;

/// Errors produced while parsing or composing nested paths and globs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A nested path string violated the path grammar (§4.3).
    #[error("invalid nested path {path:?}: {reason}")]
    InvalidPath {
        /// The offending raw path string.
        path: String,
        /// A human-readable description of why the path was rejected.
        reason: String,
    },

    /// A glob pattern could not be compiled.
    #[error("invalid glob {pattern:?}: {source}")]
    InvalidGlob {
        /// The offending raw glob pattern.
        pattern: String,
        /// The underlying regex compile error.
        #[source]
        source: regex::Error,
    },

    /// A `lookInto` glob (`<fmt-glob>:<path-glob>`) was missing its `:` discriminator.
    #[error("invalid lookInto glob {pattern:?}: missing ':' between format glob and path glob")]
    MissingDiscriminator {
        /// The offending raw lookInto glob.
        pattern: String,
    },

    /// A path-equivalence or line-equivalence regex failed to compile.
    #[error("invalid equivalence regex {pattern:?}: {source}")]
    InvalidEquivalence {
        /// The offending raw regex.
        pattern: String,
        /// The underlying regex compile error.
        #[source]
        source: regex::Error,
    },
}
