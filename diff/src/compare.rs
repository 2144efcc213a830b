//! Comparison configuration shared by the line comparator and the tree
//! differ (§4.3's equivalence classes, §4.5's ignore-whitespace and
//! tokenization options).

use path::{Equivalence, Glob};
use typed_builder::TypedBuilder;

use crate::tokenize::{CStyleTokenizer, Tokenizer};

/// A line-equivalence rule scoped to paths matching a glob (`--line-equivalence
/// '<path-glob>':'<regex>'`).
#[derive(Clone, Debug)]
pub struct ScopedEquivalence {
    path: Glob,
    equivalence: Equivalence,
}

impl ScopedEquivalence {
    /// Pair a path glob with the equivalence regex applied to matching files.
    pub fn new(path: Glob, equivalence: Equivalence) -> Self {
        Self { path, equivalence }
    }
}

/// An ignore-matching-lines rule (`-I <path-glob>:<regex>`): lines matching
/// `regex` in files matching `path` are dropped from comparison on both
/// sides before diffing, a simplification of GNU `diff -I`'s "a change is
/// ignored only if every changed line matches" rule.
#[derive(Clone, Debug)]
pub struct IgnoreLines {
    path: Glob,
    pattern: regex::Regex,
}

impl IgnoreLines {
    /// Pair a path glob with the regex whose matching lines are dropped.
    pub fn new(path: Glob, pattern: regex::Regex) -> Self {
        Self { path, pattern }
    }
}

/// Options shaping how two documents' lines are compared (§4.5).
#[derive(Clone, TypedBuilder)]
pub struct CompareOptions {
    /// Collapse runs of whitespace to a single space before comparing.
    #[builder(default)]
    pub ignore_whitespace: bool,

    /// Line-equivalence rules, consulted in declaration order; the first
    /// whose path glob matches is applied.
    #[builder(default)]
    pub line_equivalences: Vec<ScopedEquivalence>,

    /// Ignore-matching-lines rules.
    #[builder(default)]
    pub ignore_lines: Vec<IgnoreLines>,

    /// A comment-stripping tokenizer, if comment-insensitive comparison was requested.
    #[builder(default, setter(strip_option))]
    pub tokenizer: Option<CStyleTokenizer>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions::builder().build()
    }
}

impl CompareOptions {
    /// Split `text` into display lines for the document at `path`, applying
    /// comment-stripping and ignore-lines filtering. This is the text that
    /// appears in rendered diffs.
    pub fn prepare_lines(&self, path: &str, text: &str) -> Vec<String> {
        let normalized = match &self.tokenizer {
            Some(t) => t.normalize(text),
            None => text.to_owned(),
        };
        normalized
            .lines()
            .map(str::to_owned)
            .filter(|line| !self.ignore_lines.iter().any(|rule| rule.path.is_match(path) && rule.pattern.is_match(line)))
            .collect()
    }

    /// The comparison key for one line at `path`: whitespace-collapsed and/or
    /// equivalence-reduced, used only to decide equality, never displayed.
    pub fn compare_key<'a>(&self, path: &str, line: &'a str) -> std::borrow::Cow<'a, str> {
        let mut key = std::borrow::Cow::Borrowed(line);
        if let Some(rule) = self.line_equivalences.iter().find(|rule| rule.path.is_match(path)) {
            key = std::borrow::Cow::Owned(rule.equivalence.reduce(&key).into_owned());
        }
        if self.ignore_whitespace {
            key = std::borrow::Cow::Owned(collapse_whitespace(&key));
        }
        key
    }

    /// Whether two lines at `path` should be treated as equal.
    pub fn lines_equal(&self, path: &str, a: &str, b: &str) -> bool {
        self.compare_key(path, a) == self.compare_key(path, b)
    }
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = false;
    for c in s.trim().chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn whitespace_runs_collapse_to_one_space() {
        assert_eq!(collapse_whitespace("a   b\tc"), "a b c");
    }

    #[test]
    fn equivalence_scoped_to_matching_paths_only() {
        let opts = CompareOptions::builder()
            .line_equivalences(vec![ScopedEquivalence::new(
                Glob::compile("***").unwrap(),
                Equivalence::compile(r"version=(\d+)(?:\.\d+)*").unwrap(),
            )])
            .build();
        assert!(opts.lines_equal("build.gradle", "version=1.2", "version=1.3"));
        assert!(!opts.lines_equal("build.gradle", "version=1.2", "version=2.0"));
    }
}
