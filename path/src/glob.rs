//! Glob syntax (§4.3): a superset of shell globs with comma-separated alternatives
//! and `~`-prefixed excludes, evaluated left to right with "last match wins".

use regex::Regex;

use crate::Error;

/// A single compiled glob term: a regex plus whether a match excludes rather than includes.
#[derive(Debug, Clone)]
struct Term {
    negate: bool,
    regex: Regex,
}

/// A compiled glob, as described in §4.3.
///
/// `?` matches any one character except a separator (`/`, `!`, `%`).
/// `*` matches any run of characters except `/`.
/// `**` matches any run of characters except `!` and `%`.
/// `***` matches any run of characters, including separators.
/// Alternatives are comma-separated; a leading `~` marks a term as an exclude.
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    terms: Vec<Term>,
}

impl Glob {
    /// Compile a glob pattern.
    pub fn compile(pattern: impl Into<String>) -> Result<Self, Error> {
        let pattern = pattern.into();
        let mut terms = Vec::new();
        for term in split_terms(&pattern) {
            terms.push(compile_term(&pattern, term)?);
        }
        Ok(Self { pattern, terms })
    }

    /// The raw pattern this glob was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Evaluate the glob against a candidate string (a rendered [`crate::NestedPath`] or similar).
    ///
    /// Terms are evaluated in declaration order; the last term that matches decides the
    /// outcome. A glob with no matching term at all does not match.
    pub fn is_match(&self, candidate: &str) -> bool {
        let mut result = false;
        let mut matched_any = false;
        for term in &self.terms {
            if term.regex.is_match(candidate) {
                matched_any = true;
                result = !term.negate;
            }
        }
        matched_any && result
    }
}

/// A `lookInto` glob: `<format-glob>:<path-glob>`, deciding whether a recognized
/// container is descended into (§4.1, §4.2).
#[derive(Debug, Clone)]
pub struct LookIntoGlob {
    format: Glob,
    path: Glob,
}

impl LookIntoGlob {
    /// Compile a `<format-glob>:<path-glob>` string.
    pub fn compile(pattern: impl AsRef<str>) -> Result<Self, Error> {
        let pattern = pattern.as_ref();
        let idx = pattern.find(':').ok_or_else(|| Error::MissingDiscriminator {
            pattern: pattern.to_owned(),
        })?;
        let (fmt, rest) = pattern.split_at(idx);
        let path = &rest[1..];
        Ok(Self {
            format: Glob::compile(fmt)?,
            path: Glob::compile(path)?,
        })
    }

    /// Whether the given format name and path should be descended into.
    pub fn matches(&self, format: &str, path: &str) -> bool {
        self.format.is_match(format) && self.path.is_match(path)
    }
}

fn split_terms(pattern: &str) -> Vec<&str> {
    // Commas are not otherwise meaningful in this glob dialect, so a naive split suffices.
    pattern.split(',').collect()
}

fn compile_term(full_pattern: &str, term: &str) -> Result<Term, Error> {
    let (negate, body) = match term.strip_prefix('~') {
        Some(rest) => (true, rest),
        None => (false, term),
    };

    let mut regex_src = String::from("^");
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                let mut stars = 1;
                while chars.peek() == Some(&'*') {
                    chars.next();
                    stars += 1;
                }
                match stars {
                    1 => regex_src.push_str("[^/]*"),
                    2 => regex_src.push_str("[^!%]*"),
                    _ => regex_src.push_str(".*"),
                }
            }
            '?' => regex_src.push_str("[^/!%]"),
            other => regex_src.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex_src.push('$');

    let regex = Regex::new(&regex_src).map_err(|source| Error::InvalidGlob {
        pattern: full_pattern.to_owned(),
        source,
    })?;
    Ok(Term { negate, regex })
}
