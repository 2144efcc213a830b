use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;
use crate::model::{Hunk, LineChange};

lazy_static! {
    static ref HEADER: Regex = Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@$").unwrap();
}

/// `lines` is the text following the `---`/`+++` file-label pair.
pub(super) fn parse(lines: &[&str]) -> Result<Vec<Hunk>, Error> {
    let mut hunks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        hunks.push(parse_hunk(lines, &mut i)?);
    }
    Ok(hunks)
}

fn parse_hunk(lines: &[&str], i: &mut usize) -> Result<Hunk, Error> {
    let header = lines[*i];
    let caps = HEADER.captures(header).ok_or_else(|| Error::InvalidDiff {
        line: *i + 1,
        reason: format!("expected a '@@ -l,n +l,n @@' hunk header, found {header:?}"),
    })?;
    // GNU `diff -u` omits the `,count` suffix when a range covers exactly one line.
    let old_at: usize = caps[1].parse().unwrap();
    let old_count: usize = caps.get(2).map_or(1, |m| m.as_str().parse().unwrap());
    let new_at: usize = caps[3].parse().unwrap();
    let new_count: usize = caps.get(4).map_or(1, |m| m.as_str().parse().unwrap());
    *i += 1;

    let mut changes = Vec::new();
    let (mut old_seen, mut new_seen) = (0, 0);
    while old_seen < old_count || new_seen < new_count {
        let line = lines.get(*i).ok_or_else(|| Error::InvalidDiff {
            line: *i + 1,
            reason: "unexpected end of input inside a unified-diff hunk".to_owned(),
        })?;
        if let Some(rest) = line.strip_prefix(' ') {
            changes.push(LineChange::Context(rest.to_owned()));
            old_seen += 1;
            new_seen += 1;
        } else if let Some(rest) = line.strip_prefix('-') {
            changes.push(LineChange::Deleted(rest.to_owned()));
            old_seen += 1;
        } else if let Some(rest) = line.strip_prefix('+') {
            changes.push(LineChange::Added(rest.to_owned()));
            new_seen += 1;
        } else {
            return Err(Error::InvalidDiff {
                line: *i + 1,
                reason: format!("expected a ' '/'-'/'+' prefixed line, found {line:?}"),
            });
        }
        *i += 1;
    }

    if old_seen != old_count || new_seen != new_count {
        return Err(Error::HunkCountMismatch {
            declared: old_count + new_count,
            actual: old_seen + new_seen,
        });
    }

    Ok(Hunk {
        old_start: if old_count == 0 { old_at + 1 } else { old_at },
        old_count,
        new_start: if new_count == 0 { new_at + 1 } else { new_at },
        new_count,
        changes: merge_changed_runs(changes),
    })
}

/// Collapse adjacent `Deleted`+`Added` runs back into a single [`LineChange::Changed`],
/// mirroring the normal/context dialects so a unified round-trip produces the
/// same model this crate's own hunk builder would have produced.
fn merge_changed_runs(changes: Vec<LineChange>) -> Vec<LineChange> {
    let mut out = Vec::with_capacity(changes.len());
    let mut i = 0;
    while i < changes.len() {
        if !matches!(changes[i], LineChange::Deleted(_)) {
            out.push(changes[i].clone());
            i += 1;
            continue;
        }
        let del_start = i;
        while i < changes.len() && matches!(changes[i], LineChange::Deleted(_)) {
            i += 1;
        }
        let add_start = i;
        while i < changes.len() && matches!(changes[i], LineChange::Added(_)) {
            i += 1;
        }
        if add_start == i {
            out.extend_from_slice(&changes[del_start..add_start]);
        } else {
            let from = changes[del_start..add_start]
                .iter()
                .map(|c| match c {
                    LineChange::Deleted(s) => s.clone(),
                    _ => unreachable!(),
                })
                .collect();
            let to = changes[add_start..i]
                .iter()
                .map(|c| match c {
                    LineChange::Added(s) => s.clone(),
                    _ => unreachable!(),
                })
                .collect();
            out.push(LineChange::Changed { from, to });
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_context_and_change_lines() {
        let text = "@@ -1,3 +1,4 @@\n a\n-b\n+x\n+y\n c";
        let lines: Vec<&str> = text.lines().collect();
        let hunks = parse(&lines).unwrap();
        assert_eq!(hunks[0].old_start, 1);
        assert_eq!(hunks[0].old_count, 3);
        assert_eq!(hunks[0].new_count, 4);
        assert_eq!(
            hunks[0].changes,
            vec![
                LineChange::Context("a".to_owned()),
                LineChange::Changed { from: vec!["b".to_owned()], to: vec!["x".to_owned(), "y".to_owned()] },
                LineChange::Context("c".to_owned()),
            ]
        );
    }

    #[test]
    fn rejects_a_hunk_with_a_short_body() {
        let text = "@@ -1,2 +1,2 @@\n a";
        let lines: Vec<&str> = text.lines().collect();
        assert!(parse(&lines).is_err());
    }

    #[test]
    fn parses_a_single_line_range_without_a_count() {
        let text = "@@ -1 +1 @@\n-a\n+b";
        let lines: Vec<&str> = text.lines().collect();
        let hunks = parse(&lines).unwrap();
        assert_eq!(hunks[0].old_start, 1);
        assert_eq!(hunks[0].old_count, 1);
        assert_eq!(hunks[0].new_start, 1);
        assert_eq!(hunks[0].new_count, 1);
    }
}
