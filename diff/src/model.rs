//! The canonical diff model (§4.5, §9's "diff as data"): hunks are tagged
//! records, independent of any textual dialect. Renderers and parsers are
//! pure functions over these types.

/// One line's fate within a hunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineChange {
    /// A line present, unchanged, on both sides.
    Context(String),
    /// A line present only on the new side.
    Added(String),
    /// A line present only on the old side.
    Deleted(String),
    /// A block replaced in place: zero or more old lines become zero or more
    /// new lines, at the same hunk position. Context-diff `!` blocks parse
    /// directly into this variant rather than an artificial pairing of
    /// individual lines (see DESIGN.md) — `from`/`to` may have different
    /// lengths.
    Changed {
        /// The old side's lines.
        from: Vec<String>,
        /// The new side's lines.
        to: Vec<String>,
    },
}

/// A contiguous block of changes, anchored at 1-based line numbers in both
/// the old and new documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hunk {
    /// The first affected line in the old document (1-based).
    pub old_start: usize,
    /// The number of old-document lines this hunk spans.
    pub old_count: usize,
    /// The first affected line in the new document (1-based).
    pub new_start: usize,
    /// The number of new-document lines this hunk spans.
    pub new_count: usize,
    /// The line-level changes making up this hunk, in document order.
    pub changes: Vec<LineChange>,
}

impl Hunk {
    /// The old-side lines this hunk touches, in order (context and deleted/changed).
    pub fn old_lines(&self) -> Vec<&str> {
        self.changes
            .iter()
            .flat_map(|c| match c {
                LineChange::Context(s) | LineChange::Deleted(s) => vec![s.as_str()],
                LineChange::Changed { from, .. } => from.iter().map(String::as_str).collect(),
                LineChange::Added(_) => Vec::new(),
            })
            .collect()
    }

    /// The new-side lines this hunk touches, in order (context and added/changed).
    pub fn new_lines(&self) -> Vec<&str> {
        self.changes
            .iter()
            .flat_map(|c| match c {
                LineChange::Context(s) | LineChange::Added(s) => vec![s.as_str()],
                LineChange::Changed { to, .. } => to.iter().map(String::as_str).collect(),
                LineChange::Deleted(_) => Vec::new(),
            })
            .collect()
    }
}

/// A complete diff between two documents: an ordered list of hunks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Differential {
    /// The hunks making up this diff, in ascending document order.
    pub hunks: Vec<Hunk>,
}

impl Differential {
    /// Whether the two documents this diff describes are identical (no hunks).
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }
}

/// The three textual dialects this engine renders and parses (§4.5, §6).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Dialect {
    /// Traditional `diff` output: `1,3c4,5` ranges with `a`/`d`/`c` verbs.
    Normal,
    /// `diff -c` output: `***`/`---`/`***************` hunk separators.
    Context {
        /// Lines of context surrounding each change (default 3).
        context: usize,
    },
    /// `diff -u` output: `@@ -l,n +l,n @@` hunk headers.
    Unified {
        /// Lines of context surrounding each change (default 3).
        context: usize,
    },
}

impl Dialect {
    /// The number of context lines this dialect carries, if any.
    pub fn context_size(&self) -> usize {
        match self {
            Dialect::Normal => 0,
            Dialect::Context { context } | Dialect::Unified { context } => *context,
        }
    }
}
