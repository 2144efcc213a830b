use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience macro to produce an invariant error, mirroring the archive
/// crate's own `invariant!` macro.
#[macro_export]
macro_rules! invariant {
    ($kind:ident) => {
        Err($crate::Error::Invariant($crate::Invariant::$kind))
    };
    ($kind:ident, $arg:ident) => {
        Err($crate::Error::Invariant($crate::Invariant::$kind { $arg }))
    };
    ($kind:ident, $( $arg:expr ),*) => {
        Err($crate::Error::Invariant($crate::Invariant::$kind { $($arg),* }))
    }
}

/// Errors encountered while enumerating nodes (§4.1, §7).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An invariant was violated.
    #[error(transparent)]
    Invariant(#[from] Invariant),

    /// Unable to walk filesystem entries.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// A nested path could not be parsed or rendered.
    #[error(transparent)]
    Path(#[from] path::Error),

    /// The format registry or one of its adapters failed.
    #[error(transparent)]
    Format(#[from] format::Error),

    /// Generic I/O failure while probing or reading a stream.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A decode error occurred at the given nested path (§7: "every error line
    /// is prefixed with the offending nested path").
    #[error("{path}: {source}")]
    AtPath {
        /// The nested path being visited when the error occurred.
        path: String,
        /// The underlying error.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the nested path being visited to an error, per §7's requirement
    /// that every error is reported prefixed with the offending path.
    pub fn at_path(self, path: impl Into<String>) -> Self {
        Error::AtPath {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// Invariants expected by the node enumerator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Invariant {
    /// The root is neither a file nor a directory.
    #[error("{root:?} is not walkable; it must be a file or a directory")]
    NotWalkable {
        /// The root path passed to the walker.
        root: PathBuf,
    },

    /// The root is a symlink, and symlink following is disabled (§4.1 mirrors
    /// the expand crate's refusal to follow links).
    #[error("{root:?} is a symbolic link, and symbolic link following is disabled")]
    RootSymlink {
        /// The root path passed to the walker.
        root: PathBuf,
    },
}
