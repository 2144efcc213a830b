use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;
use crate::model::{Hunk, LineChange};

lazy_static! {
    static ref HEADER: Regex = Regex::new(r"^(\d+)(?:,(\d+))?([adc])(\d+)(?:,(\d+))?$").unwrap();
}

pub(super) fn parse(lines: &[&str]) -> Result<Vec<Hunk>, Error> {
    let mut hunks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let header_line = i + 1;
        let caps = HEADER.captures(lines[i]).ok_or_else(|| Error::InvalidDiff {
            line: header_line,
            reason: format!("not a normal-diff hunk header: {:?}", lines[i]),
        })?;
        let old_first: usize = caps[1].parse().unwrap();
        let old_second: Option<usize> = caps.get(2).map(|m| m.as_str().parse().unwrap());
        let verb = caps[3].chars().next().unwrap();
        let new_first: usize = caps[4].parse().unwrap();
        let new_second: Option<usize> = caps.get(5).map(|m| m.as_str().parse().unwrap());
        i += 1;

        let (old_start, old_count, new_start, new_count) = match verb {
            'a' => (old_first + 1, 0, new_first, old_second.or(new_second).map(|e| e - new_first + 1).unwrap_or(1)),
            'd' => (old_first, old_second.map(|e| e - old_first + 1).unwrap_or(1), new_first + 1, 0),
            'c' => (
                old_first,
                old_second.map(|e| e - old_first + 1).unwrap_or(1),
                new_first,
                new_second.map(|e| e - new_first + 1).unwrap_or(1),
            ),
            _ => unreachable!("regex only matches a/d/c"),
        };

        let changes = match verb {
            'a' => {
                let added = take_prefixed(lines, &mut i, "> ", new_count)?;
                added.into_iter().map(LineChange::Added).collect()
            }
            'd' => {
                let deleted = take_prefixed(lines, &mut i, "< ", old_count)?;
                deleted.into_iter().map(LineChange::Deleted).collect()
            }
            'c' => {
                let from = take_prefixed(lines, &mut i, "< ", old_count)?;
                expect_separator(lines, &mut i)?;
                let to = take_prefixed(lines, &mut i, "> ", new_count)?;
                vec![LineChange::Changed { from, to }]
            }
            _ => unreachable!(),
        };

        hunks.push(Hunk {
            old_start,
            old_count,
            new_start,
            new_count,
            changes,
        });
    }
    Ok(hunks)
}

fn take_prefixed(lines: &[&str], i: &mut usize, prefix: &str, count: usize) -> Result<Vec<String>, Error> {
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let line = lines.get(*i).ok_or_else(|| Error::InvalidDiff {
            line: *i + 1,
            reason: format!("expected a line prefixed {prefix:?}, found end of input"),
        })?;
        let stripped = line.strip_prefix(prefix).ok_or_else(|| Error::InvalidDiff {
            line: *i + 1,
            reason: format!("expected a line prefixed {prefix:?}, found {line:?}"),
        })?;
        out.push(stripped.to_owned());
        *i += 1;
    }
    Ok(out)
}

fn expect_separator(lines: &[&str], i: &mut usize) -> Result<(), Error> {
    match lines.get(*i) {
        Some(&"---") => {
            *i += 1;
            Ok(())
        }
        other => Err(Error::InvalidDiff {
            line: *i + 1,
            reason: format!("expected a '---' separator, found {other:?}"),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_a_change_hunk() {
        let text = "1c1\n< minVersion=1.2\n---\n> minVersion=1.3";
        let lines: Vec<&str> = text.lines().collect();
        let hunks = parse(&lines).unwrap();
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].old_start, 1);
        assert_eq!(hunks[0].new_start, 1);
        assert_eq!(
            hunks[0].changes,
            vec![LineChange::Changed {
                from: vec!["minVersion=1.2".to_owned()],
                to: vec!["minVersion=1.3".to_owned()],
            }]
        );
    }

    #[test]
    fn parses_a_pure_insertion() {
        let text = "3a4,5\n> four\n> five";
        let lines: Vec<&str> = text.lines().collect();
        let hunks = parse(&lines).unwrap();
        assert_eq!(hunks[0].old_start, 4);
        assert_eq!(hunks[0].old_count, 0);
        assert_eq!(hunks[0].new_start, 4);
        assert_eq!(hunks[0].new_count, 2);
    }

    #[test]
    fn parses_a_pure_deletion() {
        let text = "3,4d2\n< three\n< four";
        let lines: Vec<&str> = text.lines().collect();
        let hunks = parse(&lines).unwrap();
        assert_eq!(hunks[0].old_start, 3);
        assert_eq!(hunks[0].old_count, 2);
        assert_eq!(hunks[0].new_start, 3);
        assert_eq!(hunks[0].new_count, 0);
    }
}
