//! Traditional `diff` output: `1,3c4,5` ranges, `<`/`---`/`>` line prefixes.

use std::fmt::Write as _;

use crate::model::{Differential, Hunk, LineChange};

use super::display_start;

pub(super) fn render(diff: &Differential) -> String {
    let mut out = String::new();
    for hunk in &diff.hunks {
        render_hunk(hunk, &mut out);
    }
    out
}

fn render_hunk(hunk: &Hunk, out: &mut String) {
    let old_range = range_str(hunk.old_start, hunk.old_count);
    let new_range = range_str(hunk.new_start, hunk.new_count);

    let verb = match (hunk.old_count == 0, hunk.new_count == 0) {
        (true, false) => 'a',
        (false, true) => 'd',
        _ => 'c',
    };

    let old_display = if verb == 'a' { display_start(hunk.old_start, 0).to_string() } else { old_range };
    let new_display = if verb == 'd' { display_start(hunk.new_start, 0).to_string() } else { new_range };

    writeln!(out, "{old_display}{verb}{new_display}").unwrap();

    for change in &hunk.changes {
        match change {
            LineChange::Context(_) => unreachable!("normal dialect carries no context lines"),
            LineChange::Deleted(line) => writeln!(out, "< {line}").unwrap(),
            LineChange::Added(line) => writeln!(out, "> {line}").unwrap(),
            LineChange::Changed { from, to } => {
                for line in from {
                    writeln!(out, "< {line}").unwrap();
                }
                writeln!(out, "---").unwrap();
                for line in to {
                    writeln!(out, "> {line}").unwrap();
                }
            }
        }
    }
}

fn range_str(start: usize, count: usize) -> String {
    if count <= 1 {
        start.to_string()
    } else {
        format!("{start},{end}", end = start + count - 1)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lcs::diff_lines;
    use crate::{build_differential, Dialect};

    #[test]
    fn renders_a_single_line_change() {
        let old = vec!["minVersion=1.2".to_owned()];
        let new = vec!["minVersion=1.3".to_owned()];
        let diffs = diff_lines(&old, &new, |a, b| a == b);
        let differential = build_differential(&old, &new, &diffs, Dialect::Normal);
        let text = render(&differential);
        assert_eq!(text, "1c1\n< minVersion=1.2\n---\n> minVersion=1.3\n");
    }
}
