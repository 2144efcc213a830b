//! Dialect parsers: inverse of [`crate::render::render`], reconstructing a
//! [`Differential`] from GNU `diff` normal/context/unified text. The dialect
//! is detected from the input's first line (§4.5); a [`Differential`] is
//! dialect-agnostic, so the caller never needs to know in advance which
//! dialect produced the patch it is reading.

mod context;
mod normal;
mod unified;

use crate::error::Error;
use crate::model::Differential;

/// Parse diff text in any of the three dialects.
///
/// Detection looks only at the first line: context diffs start with
/// `*** `, unified diffs with `--- `, and normal diffs with a hunk header
/// (digits). An empty input parses as an empty [`Differential`].
pub fn parse(text: &str) -> Result<Differential, Error> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return Ok(Differential::default());
    }

    let hunks = if lines[0].starts_with("*** ") {
        context::parse(&lines[2..])?
    } else if lines[0].starts_with("--- ") {
        unified::parse(&lines[2..])?
    } else {
        normal::parse(&lines)?
    };

    Ok(Differential { hunks })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{Dialect, LineChange};
    use crate::{build_differential, lcs::diff_lines, render::render};

    fn lines(s: &str) -> Vec<String> {
        s.lines().map(str::to_owned).collect()
    }

    #[test]
    fn round_trips_through_all_three_dialects() {
        let old = lines("a\nb\nc\nd\ne");
        let new = lines("a\nX\nc\nd\ne");
        let diffs = diff_lines(&old, &new, |a, b| a == b);

        for dialect in [Dialect::Normal, Dialect::Context { context: 2 }, Dialect::Unified { context: 2 }] {
            let differential = build_differential(&old, &new, &diffs, dialect);
            let text = render(&differential, dialect, "old", "new");
            let parsed = parse(&text).unwrap();
            assert_eq!(parsed, differential, "round-trip mismatch for {dialect:?}");
        }
    }

    #[test]
    fn detects_normal_dialect_by_default() {
        let parsed = parse("1c1\n< a\n---\n> b").unwrap();
        assert_eq!(parsed.hunks.len(), 1);
        assert_eq!(parsed.hunks[0].changes, vec![LineChange::Changed { from: vec!["a".to_owned()], to: vec!["b".to_owned()] }]);
    }

    #[test]
    fn empty_input_is_an_empty_differential() {
        assert!(parse("").unwrap().is_empty());
    }
}
