//! Leaf transformer kinds (§4.4 point 1): substitute, patch, update, rename, no-op.
//!
//! Each kind is a capability-set trait object, following the same
//! registration pattern the format registry uses for archive/compression
//! formats: a `Vec<Box<dyn LeafTransformer>>` run in declaration order,
//! rather than a type hierarchy.

use std::fmt::{self, Display};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use path::Glob;
use regex::{Regex, RegexBuilder};

use crate::error::Error;
use crate::lines::{join_lines, split_lines};
use crate::patch::apply_differential;

/// One registered content transformation, gated by a path predicate.
///
/// `apply` defaults to a pass-through copy, so kinds that only affect the
/// output name (`rename`) need not implement it. `rename` defaults to
/// leaving the name untouched.
pub trait LeafTransformer: Display + Send + Sync {
    /// Whether this transformer applies to the given (nested) path.
    fn matches(&self, path: &str) -> bool;

    /// Transform `input`'s bytes, writing the result to `output`.
    fn apply(&self, _path: &str, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), Error> {
        io::copy(input, output)?;
        Ok(())
    }

    /// The name this entry should be written back under, if this
    /// transformer renames it.
    fn rename(&self, _path: &str) -> Option<String> {
        None
    }
}

/// Gates a single regex match during [`SubstituteTransformer::apply`].
pub enum SubstituteCondition {
    /// Every match is substituted.
    Always,
    /// A predicate over `(path, matched text, 1-based match count)` decides.
    Predicate(Arc<dyn Fn(&str, &str, usize) -> bool + Send + Sync>),
}

impl fmt::Debug for SubstituteCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstituteCondition::Always => write!(f, "Always"),
            SubstituteCondition::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

/// Regex/replacement substitution with an optional gating condition (§4.4's substitute semantics).
pub struct SubstituteTransformer {
    predicate: Glob,
    pattern: Regex,
    replacement: String,
    condition: SubstituteCondition,
    check_before: bool,
}

impl SubstituteTransformer {
    /// Compile a substitute transformer. `pattern` is applied in multiline
    /// mode (`^`/`$` match line boundaries) against the full decoded text.
    pub fn new(predicate: Glob, pattern: &str, replacement: impl Into<String>, condition: SubstituteCondition, check_before: bool) -> Result<Self, Error> {
        let pattern = RegexBuilder::new(pattern)
            .multi_line(true)
            .build()
            .map_err(|source| Error::InvalidPattern { pattern: pattern.to_owned(), source })?;
        Ok(Self { predicate, pattern, replacement: replacement.into(), condition, check_before })
    }
}

impl Display for SubstituteTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "substitute({})", self.predicate.pattern())
    }
}

impl LeafTransformer for SubstituteTransformer {
    fn matches(&self, path: &str) -> bool {
        self.predicate.is_match(path)
    }

    fn apply(&self, path: &str, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), Error> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let text = String::from_utf8_lossy(&bytes);

        if self.check_before && !self.pattern.is_match(&text) {
            output.write_all(&bytes)?;
            return Ok(());
        }

        let mut count = 0usize;
        let mut expanded = String::new();
        let rewritten = self.pattern.replace_all(&text, |caps: &regex::Captures<'_>| {
            count += 1;
            let apply = match &self.condition {
                SubstituteCondition::Always => true,
                SubstituteCondition::Predicate(pred) => pred(path, &caps[0], count),
            };
            if apply {
                expanded.clear();
                caps.expand(&self.replacement, &mut expanded);
                expanded.clone()
            } else {
                caps[0].to_owned()
            }
        });
        output.write_all(rewritten.as_bytes())?;
        Ok(())
    }
}

/// Applies a parsed diff to the matched file (§4.4's patch semantics).
pub struct PatchTransformer {
    predicate: Glob,
    differentials: Vec<diff::Differential>,
}

impl PatchTransformer {
    /// Build a patch transformer from one or more already-parsed Differentials
    /// (a multi-file patch source is split into one Differential per target upstream).
    pub fn new(predicate: Glob, differentials: Vec<diff::Differential>) -> Self {
        Self { predicate, differentials }
    }
}

impl Display for PatchTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "patch({})", self.predicate.pattern())
    }
}

impl LeafTransformer for PatchTransformer {
    fn matches(&self, path: &str) -> bool {
        self.predicate.is_match(path)
    }

    fn apply(&self, path: &str, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), Error> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let mut lines = split_lines(&text);
        for differential in &self.differentials {
            lines = apply_differential(path, &lines, differential)?;
        }
        output.write_all(join_lines(&lines).as_bytes())?;
        Ok(())
    }
}

/// Replaces matched content outright with the bytes of an external file (§4.4's update semantics).
pub struct UpdateTransformer {
    predicate: Glob,
    source: PathBuf,
}

impl UpdateTransformer {
    /// Build an update transformer reading replacement content from `source` on apply.
    pub fn new(predicate: Glob, source: PathBuf) -> Self {
        Self { predicate, source }
    }
}

impl Display for UpdateTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "update({} <- {})", self.predicate.pattern(), self.source.display())
    }
}

impl LeafTransformer for UpdateTransformer {
    fn matches(&self, path: &str) -> bool {
        self.predicate.is_match(path)
    }

    fn apply(&self, _path: &str, _input: &mut dyn Read, output: &mut dyn Write) -> Result<(), Error> {
        let mut file = File::open(&self.source)?;
        io::copy(&mut file, output)?;
        Ok(())
    }
}

/// Computes a new entry/output name from a regex match against the path (§4.4's rename kind).
pub struct RenameTransformer {
    predicate: Glob,
    pattern: Regex,
    replacement: String,
}

impl RenameTransformer {
    /// Compile a rename transformer: `pattern` is matched against the full
    /// path, and `replacement` (with back-references) computes the new name.
    pub fn new(predicate: Glob, pattern: &str, replacement: impl Into<String>) -> Result<Self, Error> {
        let pattern = Regex::new(pattern).map_err(|source| Error::InvalidPattern { pattern: pattern.to_owned(), source })?;
        Ok(Self { predicate, pattern, replacement: replacement.into() })
    }
}

impl Display for RenameTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rename({})", self.predicate.pattern())
    }
}

impl LeafTransformer for RenameTransformer {
    fn matches(&self, path: &str) -> bool {
        self.predicate.is_match(path)
    }

    fn rename(&self, path: &str) -> Option<String> {
        // The predicate matches the full nested path, but the replacement
        // only ever rewrites the local name: the containing archive's own
        // path must never leak into the entry name written back.
        let local = path.rsplit('!').next().unwrap_or(path);
        self.pattern.captures(local).map(|caps| {
            let mut expanded = String::new();
            caps.expand(&self.replacement, &mut expanded);
            expanded
        })
    }
}

/// Matches but does nothing; useful as an explicit placeholder in a declared pipeline.
pub struct NoOpTransformer {
    predicate: Glob,
}

impl NoOpTransformer {
    /// Build a no-op transformer that matches `predicate` but leaves content and name untouched.
    pub fn new(predicate: Glob) -> Self {
        Self { predicate }
    }
}

impl Display for NoOpTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no-op({})", self.predicate.pattern())
    }
}

impl LeafTransformer for NoOpTransformer {
    fn matches(&self, path: &str) -> bool {
        self.predicate.is_match(path)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn glob(pattern: &str) -> Glob {
        Glob::compile(pattern).unwrap()
    }

    #[test]
    fn substitute_rewrites_matching_text() {
        let t = SubstituteTransformer::new(glob("*.txt"), r"foo(\d+)", "bar$1", SubstituteCondition::Always, false).unwrap();
        let mut out = Vec::new();
        t.apply("a.txt", &mut "foo1 foo2".as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "bar1 bar2");
    }

    #[test]
    fn check_before_skips_rewrite_when_no_match() {
        let t = SubstituteTransformer::new(glob("*.txt"), "absent", "x", SubstituteCondition::Always, true).unwrap();
        let mut out = Vec::new();
        t.apply("a.txt", &mut "nothing here".as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "nothing here");
    }

    #[test]
    fn predicate_condition_gates_individual_matches() {
        let t = SubstituteTransformer::new(glob("*.txt"), r"\d+", "N", SubstituteCondition::Predicate(Arc::new(|_path, _m, count| count == 2)), false).unwrap();
        let mut out = Vec::new();
        t.apply("a.txt", &mut "1 2 3".as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 N 3");
    }

    #[test]
    fn rename_computes_new_name_from_capture() {
        let t = RenameTransformer::new(glob("**"), r"(.*)\.bak$", "$1").unwrap();
        assert_eq!(t.rename("dir/file.txt.bak"), Some("dir/file.txt".to_owned()));
        assert_eq!(t.rename("dir/file.txt"), None);
    }
}
