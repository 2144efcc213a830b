//! Path- and line-equivalence regexes (§4.3, §4.5): two strings are equivalent
//! iff a shared regex matches both and every capturing group matches identically.

use regex::Regex;

use crate::Error;

/// A compiled equivalence rule. Used both as a [`crate::NestedPath`] equivalence
/// (to pair files across two trees in `zzdiff`) and as a line-equivalence
/// (to normalize lines before comparing them in the diff engine).
#[derive(Debug, Clone)]
pub struct Equivalence {
    pattern: String,
    regex: Regex,
}

impl Equivalence {
    /// Compile an equivalence regex.
    pub fn compile(pattern: impl Into<String>) -> Result<Self, Error> {
        let pattern = pattern.into();
        let regex = Regex::new(&pattern).map_err(|source| Error::InvalidEquivalence {
            pattern: pattern.clone(),
            source,
        })?;
        Ok(Self { pattern, regex })
    }

    /// The raw pattern this rule was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether `a` and `b` are equivalent: both must match the regex, and every
    /// capturing group must be identical between the two matches.
    pub fn equivalent(&self, a: &str, b: &str) -> bool {
        match (self.regex.captures(a), self.regex.captures(b)) {
            (Some(ca), Some(cb)) => groups(&ca) == groups(&cb),
            _ => false,
        }
    }

    /// Reduce a string to the concatenation of its capturing groups under this rule,
    /// or the original string unchanged if the rule does not match (§4.5's
    /// line-equivalence reduction).
    pub fn reduce<'a>(&self, s: &'a str) -> std::borrow::Cow<'a, str> {
        match self.regex.captures(s) {
            Some(caps) => std::borrow::Cow::Owned(groups(&caps).join("")),
            None => std::borrow::Cow::Borrowed(s),
        }
    }
}

fn groups(captures: &regex::Captures<'_>) -> Vec<String> {
    captures
        .iter()
        .skip(1)
        .map(|m| m.map(|m| m.as_str().to_owned()).unwrap_or_default())
        .collect()
}
