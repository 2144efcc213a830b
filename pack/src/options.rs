//! Pack assembler configuration (§4.7).

use std::sync::Arc;

use format::Registry;
use path::LookIntoGlob;
use typed_builder::TypedBuilder;

use crate::error::Error;

/// A `--rename` rule (§6): `pattern` is matched and replaced with
/// `replacement` (regex capture back-references allowed) against each
/// entry's full computed name. Unlike `transform::RenameTransformer`, there
/// is no containing-archive path to protect here, since `pack` assigns entry
/// names itself rather than inheriting them from a source archive.
pub struct RenameRule {
    pattern: regex::Regex,
    replacement: String,
}

impl RenameRule {
    /// Parse a `PATTERN=REPLACEMENT` rule, the same convention `zzpatch`'s
    /// own `-rename OLD=NEW` flag uses.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let (pattern, replacement) = raw.split_once('=').ok_or_else(|| Error::InvalidRenameRule { raw: raw.to_owned() })?;
        Self::new(pattern, replacement)
    }

    /// Build a rename rule directly from an already-split pattern/replacement pair.
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, Error> {
        let pattern = regex::Regex::new(pattern).map_err(|source| Error::InvalidPattern { pattern: pattern.to_owned(), source })?;
        Ok(Self { pattern, replacement: replacement.into() })
    }

    pub(crate) fn apply(&self, name: &str) -> String {
        self.pattern.replace(name, self.replacement.as_str()).into_owned()
    }
}

/// Options for one `pack` invocation (§4.7).
#[derive(TypedBuilder)]
pub struct PackOptions {
    /// The format registry used to open the archive (and, optionally, compression) writer.
    #[builder(default = Arc::new(Registry::standard()))]
    pub registry: Arc<Registry>,

    /// The archive format to write, looked up by name (`--archive-format`).
    #[builder(setter(into))]
    pub archive_format: String,

    /// The compression format to wrap the archive writer in, if any (`--compression-format`).
    #[builder(default, setter(strip_option))]
    pub compression_format: Option<String>,

    /// Whether a directory input's members are descended into an existing
    /// archive/compressed stream rather than packed as an opaque file (`--look-into`).
    #[builder(default, setter(strip_option))]
    pub look_into: Option<LookIntoGlob>,

    /// Whether a directory input's members are sorted lexicographically.
    #[builder(default = true)]
    pub sort: bool,

    /// An optional rename rule applied to every computed entry name (`--rename`).
    #[builder(default, setter(strip_option))]
    pub rename: Option<RenameRule>,
}
