//! Applying a parsed [`diff::Differential`] to a document (§4.4's patch semantics).

use diff::{Differential, LineChange};

use crate::error::Error;
use crate::lines::{Line, LineEnding};

/// Apply one `Differential`'s hunks to `lines` in order, checking every
/// context and deleted line against what is actually there.
///
/// Added lines borrow the ending style of the line that currently follows
/// the insertion point, falling back to `default_ending` at end of file.
pub fn apply_differential(path: &str, lines: &[Line], differential: &Differential) -> Result<Vec<Line>, Error> {
    let default_ending = match lines.iter().rev().find(|l| l.ending != LineEnding::None) {
        Some(line) => line.ending,
        None => LineEnding::Lf,
    };

    let mut out = Vec::new();
    let mut cursor = 0usize;

    for hunk in &differential.hunks {
        let hunk_start = hunk.old_start.saturating_sub(1);
        if hunk_start < cursor {
            return Err(Error::PatchRejected { path: path.to_owned(), lines: vec![hunk.old_start] });
        }
        out.extend_from_slice(&lines[cursor..hunk_start]);
        cursor = hunk_start;

        for change in &hunk.changes {
            match change {
                LineChange::Context(text) => {
                    expect_line(path, lines, cursor, text)?;
                    out.push(lines[cursor].clone());
                    cursor += 1;
                }
                LineChange::Deleted(text) => {
                    expect_line(path, lines, cursor, text)?;
                    cursor += 1;
                }
                LineChange::Added(text) => {
                    let ending = lines.get(cursor).map(|l| l.ending).unwrap_or(default_ending);
                    out.push(Line { content: text.clone(), ending });
                }
                LineChange::Changed { from, to } => {
                    for expected in from {
                        expect_line(path, lines, cursor, expected)?;
                        cursor += 1;
                    }
                    let ending = lines.get(cursor).map(|l| l.ending).unwrap_or(default_ending);
                    out.extend(to.iter().map(|content| Line { content: content.clone(), ending }));
                }
            }
        }
    }

    out.extend_from_slice(&lines[cursor..]);
    Ok(out)
}

fn expect_line(path: &str, lines: &[Line], at: usize, expected: &str) -> Result<(), Error> {
    match lines.get(at) {
        Some(line) if line.content == expected => Ok(()),
        _ => Err(Error::PatchRejected { path: path.to_owned(), lines: vec![at + 1] }),
    }
}

#[cfg(test)]
mod test {
    use diff::DiffHunk;

    use super::*;
    use crate::lines::split_lines;

    fn differential_with(hunk: DiffHunk) -> Differential {
        Differential { hunks: vec![hunk] }
    }

    #[test]
    fn replaces_a_line_and_preserves_crlf_endings() {
        let lines = split_lines("one\r\ntwo\r\nthree\r\n");
        let hunk = DiffHunk {
            old_start: 2,
            old_count: 1,
            new_start: 2,
            new_count: 1,
            changes: vec![LineChange::Deleted("two".into()), LineChange::Added("TWO".into())],
        };
        let patched = apply_differential("f", &lines, &differential_with(hunk)).unwrap();
        assert_eq!(crate::lines::join_lines(&patched), "one\r\nTWO\r\nthree\r\n");
    }

    #[test]
    fn mismatched_context_is_rejected() {
        let lines = split_lines("one\ntwo\nthree\n");
        let hunk = DiffHunk {
            old_start: 2,
            old_count: 1,
            new_start: 2,
            new_count: 1,
            changes: vec![LineChange::Deleted("WRONG".into()), LineChange::Added("TWO".into())],
        };
        let err = apply_differential("f", &lines, &differential_with(hunk)).unwrap_err();
        assert!(matches!(err, Error::PatchRejected { lines, .. } if lines == vec![2]));
    }
}
