use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;
use crate::model::{Hunk, LineChange};

lazy_static! {
    static ref OLD_HEADER: Regex = Regex::new(r"^\*\*\* (\d+)(?:,(\d+))? \*\*\*\*$").unwrap();
    static ref NEW_HEADER: Regex = Regex::new(r"^--- (\d+)(?:,(\d+))? ----$").unwrap();
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Context,
    Change,
    EditOld,
    EditNew,
}

/// `lines` is the text following the `***`/`---` file-label pair.
pub(super) fn parse(lines: &[&str]) -> Result<Vec<Hunk>, Error> {
    let mut hunks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i] != "***************" {
            return Err(Error::InvalidDiff {
                line: i + 1,
                reason: format!("expected a '***************' hunk separator, found {:?}", lines[i]),
            });
        }
        i += 1;
        hunks.push(parse_hunk(lines, &mut i)?);
    }
    Ok(hunks)
}

fn parse_hunk(lines: &[&str], i: &mut usize) -> Result<Hunk, Error> {
    let old_header = lines.get(*i).ok_or_else(|| eof(*i))?;
    let old_caps = OLD_HEADER.captures(old_header).ok_or_else(|| Error::InvalidDiff {
        line: *i + 1,
        reason: format!("expected an old-file range header, found {old_header:?}"),
    })?;
    let old_start: usize = old_caps[1].parse().unwrap();
    let old_has_range = old_caps.get(2).is_some();
    let old_end: usize = old_caps.get(2).map(|m| m.as_str().parse().unwrap()).unwrap_or(old_start);
    *i += 1;

    let (old_entries, _) = take_block(lines, i, &['-', '!'])?;

    let new_header = lines.get(*i).ok_or_else(|| eof(*i))?;
    let new_caps = NEW_HEADER.captures(new_header).ok_or_else(|| Error::InvalidDiff {
        line: *i + 1,
        reason: format!("expected a new-file range header, found {new_header:?}"),
    })?;
    let new_start: usize = new_caps[1].parse().unwrap();
    let new_has_range = new_caps.get(2).is_some();
    let new_end: usize = new_caps.get(2).map(|m| m.as_str().parse().unwrap()).unwrap_or(new_start);
    *i += 1;

    let (new_entries, _) = take_block(lines, i, &['+', '!'])?;

    // A comma-separated range with equal endpoints is how `display_start`
    // represents a zero-length side (see the unified/context renderers);
    // any other range, or a bare number, means exactly that many lines.
    let old_count = if old_has_range && old_end == old_start { 0 } else { old_end - old_start + 1 };
    let new_count = if new_has_range && new_end == new_start { 0 } else { new_end - new_start + 1 };

    let changes = merge(&old_entries, &new_entries)?;

    Ok(Hunk {
        old_start: if old_count == 0 { old_start + 1 } else { old_start },
        old_count,
        new_start: if new_count == 0 { new_start + 1 } else { new_start },
        new_count,
        changes,
    })
}

fn eof(line: usize) -> Error {
    Error::InvalidDiff {
        line: line + 1,
        reason: "unexpected end of input inside a context-diff hunk".to_owned(),
    }
}

/// Collect the lines of one context-diff block (the old or new half of a
/// hunk): each is `"  "` (context), or prefixed by one of `edit_markers`.
/// Stops before the next header/separator line.
fn take_block(lines: &[&str], i: &mut usize, edit_markers: &[char]) -> Result<(Vec<(Kind, String)>, usize), Error> {
    let mut entries = Vec::new();
    while let Some(line) = lines.get(*i) {
        if *line == "***************" || line.starts_with("*** ") || line.starts_with("--- ") {
            break;
        }
        let (kind, rest) = if let Some(rest) = line.strip_prefix("  ") {
            (Kind::Context, rest)
        } else if edit_markers.contains(&'-') && line.strip_prefix("- ").is_some() {
            (Kind::EditOld, line.strip_prefix("- ").unwrap())
        } else if edit_markers.contains(&'+') && line.strip_prefix("+ ").is_some() {
            (Kind::EditNew, line.strip_prefix("+ ").unwrap())
        } else if line.strip_prefix("! ").is_some() {
            (Kind::Change, line.strip_prefix("! ").unwrap())
        } else {
            return Err(Error::InvalidDiff {
                line: *i + 1,
                reason: format!("unrecognized context-diff body line: {line:?}"),
            });
        };
        entries.push((kind, rest.to_owned()));
        *i += 1;
    }
    let len = entries.len();
    Ok((entries, len))
}

/// Re-interleave an old-side block and a new-side block of the same hunk
/// into a single ordered [`LineChange`] list, relying on context runs
/// occurring at identical logical positions on both sides (true for any
/// diff produced by this crate's own renderer).
fn merge(old: &[(Kind, String)], new: &[(Kind, String)]) -> Result<Vec<LineChange>, Error> {
    let mut changes = Vec::new();
    let (mut oi, mut ni) = (0, 0);
    while oi < old.len() || ni < new.len() {
        let old_is_ctx = old.get(oi).map(|(k, _)| *k == Kind::Context).unwrap_or(false);
        let new_is_ctx = new.get(ni).map(|(k, _)| *k == Kind::Context).unwrap_or(false);

        if old_is_ctx && new_is_ctx {
            let run = run_len(old, oi, Kind::Context).min(run_len(new, ni, Kind::Context));
            for k in 0..run {
                if old[oi + k].1 != new[ni + k].1 {
                    return Err(Error::InvalidDiff {
                        line: 0,
                        reason: format!("context mismatch between old and new blocks: {:?} vs {:?}", old[oi + k].1, new[ni + k].1),
                    });
                }
                changes.push(LineChange::Context(old[oi + k].1.clone()));
            }
            oi += run;
            ni += run;
        } else if old_is_ctx {
            let run = run_len(new, ni, Kind::EditNew);
            if run == 0 {
                return Err(malformed());
            }
            for k in 0..run {
                changes.push(LineChange::Added(new[ni + k].1.clone()));
            }
            ni += run;
        } else if new_is_ctx {
            let run = run_len(old, oi, Kind::EditOld);
            if run == 0 {
                return Err(malformed());
            }
            for k in 0..run {
                changes.push(LineChange::Deleted(old[oi + k].1.clone()));
            }
            oi += run;
        } else {
            let old_run = run_len(old, oi, Kind::Change);
            let new_run = run_len(new, ni, Kind::Change);
            if old_run == 0 || new_run == 0 {
                return Err(malformed());
            }
            let from: Vec<String> = old[oi..oi + old_run].iter().map(|(_, s)| s.clone()).collect();
            let to: Vec<String> = new[ni..ni + new_run].iter().map(|(_, s)| s.clone()).collect();
            changes.push(LineChange::Changed { from, to });
            oi += old_run;
            ni += new_run;
        }
    }
    Ok(changes)
}

fn run_len(entries: &[(Kind, String)], start: usize, kind: Kind) -> usize {
    entries[start..].iter().take_while(|(k, _)| *k == kind).count()
}

fn malformed() -> Error {
    Error::InvalidDiff {
        line: 0,
        reason: "context-diff old/new blocks do not line up into a coherent hunk".to_owned(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_a_changed_line() {
        let text = "***************\n*** 2,2 ****\n! b\n--- 2,2 ----\n! x";
        let lines: Vec<&str> = text.lines().collect();
        let hunks = parse(&lines).unwrap();
        assert_eq!(hunks.len(), 1);
        assert_eq!(
            hunks[0].changes,
            vec![LineChange::Changed {
                from: vec!["b".to_owned()],
                to: vec!["x".to_owned()],
            }]
        );
    }

    #[test]
    fn parses_context_around_a_change() {
        let text = "***************\n*** 1,3 ****\n  a\n! b\n  c\n--- 1,3 ----\n  a\n! x\n  c";
        let lines: Vec<&str> = text.lines().collect();
        let hunks = parse(&lines).unwrap();
        assert_eq!(hunks[0].old_start, 1);
        assert_eq!(hunks[0].old_count, 3);
        assert_eq!(hunks[0].changes.len(), 3);
    }
}
