//! `diff -c` output: `*** / --- / ***************` two-block hunks.

use std::fmt::Write as _;

use crate::model::{Differential, Hunk, LineChange};

use super::display_start;

const SEPARATOR: &str = "***************";

pub(super) fn render(diff: &Differential, old_label: &str, new_label: &str) -> String {
    let mut out = String::new();
    writeln!(out, "*** {old_label}").unwrap();
    writeln!(out, "--- {new_label}").unwrap();
    for hunk in &diff.hunks {
        render_hunk(hunk, &mut out);
    }
    out
}

fn render_hunk(hunk: &Hunk, out: &mut String) {
    writeln!(out, "{SEPARATOR}").unwrap();
    writeln!(out, "*** {} ****", range_str(hunk.old_start, hunk.old_count)).unwrap();
    for line in old_block(hunk) {
        writeln!(out, "{line}").unwrap();
    }
    writeln!(out, "--- {} ----", range_str(hunk.new_start, hunk.new_count)).unwrap();
    for line in new_block(hunk) {
        writeln!(out, "{line}").unwrap();
    }
}

fn old_block(hunk: &Hunk) -> Vec<String> {
    hunk.changes
        .iter()
        .flat_map(|c| match c {
            LineChange::Context(s) => vec![format!("  {s}")],
            LineChange::Deleted(s) => vec![format!("- {s}")],
            LineChange::Changed { from, .. } => from.iter().map(|s| format!("! {s}")).collect(),
            LineChange::Added(_) => Vec::new(),
        })
        .collect()
}

fn new_block(hunk: &Hunk) -> Vec<String> {
    hunk.changes
        .iter()
        .flat_map(|c| match c {
            LineChange::Context(s) => vec![format!("  {s}")],
            LineChange::Added(s) => vec![format!("+ {s}")],
            LineChange::Changed { to, .. } => to.iter().map(|s| format!("! {s}")).collect(),
            LineChange::Deleted(_) => Vec::new(),
        })
        .collect()
}

fn range_str(start: usize, count: usize) -> String {
    let display = display_start(start, count);
    if count == 0 {
        format!("{display},{display}")
    } else if count == 1 {
        display.to_string()
    } else {
        format!("{display},{end}", end = display + count - 1)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lcs::diff_lines;
    use crate::{build_differential, Dialect};

    #[test]
    fn renders_a_change_hunk() {
        let old = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        let new = vec!["a".to_owned(), "x".to_owned(), "c".to_owned()];
        let diffs = diff_lines(&old, &new, |a, b| a == b);
        let differential = build_differential(&old, &new, &diffs, Dialect::Context { context: 1 });
        let text = render(&differential, "old", "new");
        assert!(text.starts_with("*** old\n--- new\n"));
        assert!(text.contains("! b"));
        assert!(text.contains("! x"));
    }
}
