//! Transform configuration (§4.4).

use std::path::PathBuf;
use std::sync::Arc;

use format::Registry;
use path::Glob;
use typed_builder::TypedBuilder;

use crate::leaf::LeafTransformer;

/// A post-pass insertion into an archive being rewritten (§4.4's add rules).
///
/// `source` is itself run back through [`crate::transform`] at `target_archive + '!' + entry_name`,
/// so additions can carry their own substitutions or patches.
pub struct AddRule {
    /// Matched against the archive's own path; the rule fires once per matching archive.
    pub target_archive: Glob,
    /// The name the new entry is written under.
    pub entry_name: String,
    /// The file supplying the entry's initial content.
    pub source: PathBuf,
}

/// Options for one `transform` invocation (§4.4).
#[derive(TypedBuilder)]
pub struct TransformOptions {
    /// The format registry used to identify and open containers.
    #[builder(default = Arc::new(Registry::standard()))]
    pub registry: Arc<Registry>,

    /// Leaf transformers, run in declaration order against every matching
    /// path. Also the source of rename decisions for archive entries: a
    /// transformer's `rename` hook is consulted by path, not only when it is
    /// itself applying byte content (§4.4 point 3's "rename rule").
    #[builder(default)]
    pub leaf_transformers: Vec<Box<dyn LeafTransformer>>,

    /// Archive entries whose path matches this are dropped during rewriting.
    #[builder(default, setter(strip_option))]
    pub remove: Option<Glob>,

    /// Entries appended to any archive whose path matches their `target_archive`.
    #[builder(default)]
    pub add_rules: Vec<AddRule>,

    /// Overrides the output compression format name when rewriting a
    /// compressed stream; `None` keeps the input's format.
    #[builder(default, setter(strip_option))]
    pub compression_override: Option<String>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions::builder().build()
    }
}
