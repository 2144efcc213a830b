use thiserror::Error;

/// The top-level error every binary's `main` matches on to pick an exit
/// code (§6, §7, §10.2): one `#[from]` arm per core crate, plus the usage
/// errors that only make sense at the command-line boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Argument parsing or validation failed before any work began.
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Path(#[from] path::Error),
    #[error(transparent)]
    Format(#[from] format::Error),
    #[error(transparent)]
    Walk(#[from] walk::Error),
    #[error(transparent)]
    Transform(#[from] transform::Error),
    #[error(transparent)]
    Diff(#[from] diff::Error),
    #[error(transparent)]
    Find(#[from] find::Error),
    #[error(transparent)]
    Pack(#[from] pack::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The process exit code this error maps to (§6's per-tool exit tables,
    /// §7's "`ConfigurationError`/`InvalidGlob` are always fatal and exit
    /// with code 2").
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) => 2,
            Error::Path(_) => 2,
            Error::Find(find::Error::Usage(_) | find::Error::InvalidNumericArgument { .. }) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_exit_with_code_2() {
        assert_eq!(Error::Usage("bad flag".to_owned()).exit_code(), 2);
    }

    #[test]
    fn path_errors_exit_with_code_2() {
        let err = path::LookIntoGlob::compile("missing-a-colon").unwrap_err();
        assert_eq!(Error::from(err).exit_code(), 2);
    }

    #[test]
    fn find_usage_errors_exit_with_code_2() {
        let err = find::Error::Usage("bad expression".to_owned());
        assert_eq!(Error::from(err).exit_code(), 2);
    }

    #[test]
    fn other_errors_exit_with_code_1() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(Error::from(err).exit_code(), 1);
    }
}
