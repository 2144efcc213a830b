//! `diff -u` output: `@@ -l,n +l,n @@` headers, single `+`/`-`/` ` blocks.

use std::fmt::Write as _;

use crate::model::{Differential, Hunk, LineChange};

use super::display_start;

pub(super) fn render(diff: &Differential, old_label: &str, new_label: &str) -> String {
    let mut out = String::new();
    writeln!(out, "--- {old_label}").unwrap();
    writeln!(out, "+++ {new_label}").unwrap();
    for hunk in &diff.hunks {
        render_hunk(hunk, &mut out);
    }
    out
}

fn render_hunk(hunk: &Hunk, out: &mut String) {
    let old_at = display_start(hunk.old_start, hunk.old_count);
    let new_at = display_start(hunk.new_start, hunk.new_count);
    writeln!(out, "@@ -{} +{} @@", range(old_at, hunk.old_count), range(new_at, hunk.new_count)).unwrap();
    for change in &hunk.changes {
        match change {
            LineChange::Context(line) => writeln!(out, " {line}").unwrap(),
            LineChange::Deleted(line) => writeln!(out, "-{line}").unwrap(),
            LineChange::Added(line) => writeln!(out, "+{line}").unwrap(),
            LineChange::Changed { from, to } => {
                for line in from {
                    writeln!(out, "-{line}").unwrap();
                }
                for line in to {
                    writeln!(out, "+{line}").unwrap();
                }
            }
        }
    }
}

/// GNU `diff -u` omits the `,count` suffix when a range covers exactly one line.
fn range(at: usize, count: usize) -> String {
    if count == 1 {
        at.to_string()
    } else {
        format!("{at},{count}")
    }
}
