//! Groups flat [`Difference`]s into dialect-appropriate [`Hunk`]s, merging
//! differences whose surrounding context would otherwise overlap (§4.5).

use crate::lcs::Difference;
use crate::model::{Dialect, Hunk, LineChange};

/// Build a full [`crate::Differential`] from a flat difference list and the
/// two documents they were computed over.
pub fn build_hunks(old: &[String], new: &[String], differences: &[Difference], dialect: Dialect) -> Vec<Hunk> {
    let context = dialect.context_size();
    let groups = group_differences(differences, context, old.len());

    groups
        .into_iter()
        .map(|(group, leading, trailing)| build_hunk(old, new, group, leading, trailing))
        .collect()
}

/// Partition differences into hunks, merging adjacent ones whose context
/// windows would overlap, and return each group with its usable leading and
/// trailing context line counts.
fn group_differences<'a>(differences: &'a [Difference], context: usize, old_len: usize) -> Vec<(Vec<&'a Difference>, usize, usize)> {
    let mut raw_groups: Vec<Vec<&Difference>> = Vec::new();
    for d in differences {
        let merge = raw_groups
            .last()
            .and_then(|g| g.last())
            .map(|last: &&Difference| d.old.start.saturating_sub(last.old.end) <= 2 * context)
            .unwrap_or(false);
        if merge {
            raw_groups.last_mut().unwrap().push(d);
        } else {
            raw_groups.push(vec![d]);
        }
    }

    let mut result = Vec::with_capacity(raw_groups.len());
    let mut prev_old_end = 0usize;
    for (idx, group) in raw_groups.iter().enumerate() {
        let first = group[0];
        let last = *group.last().unwrap();
        let next_old_start = raw_groups.get(idx + 1).map(|g| g[0].old.start).unwrap_or(old_len);
        let leading = context.min(first.old.start - prev_old_end);
        let trailing = context.min(next_old_start - last.old.end);
        prev_old_end = last.old.end;
        result.push((group.clone(), leading, trailing));
    }
    result
}

fn build_hunk(old: &[String], new: &[String], group: Vec<&Difference>, leading: usize, trailing: usize) -> Hunk {
    let first = group[0];
    let last = *group.last().unwrap();

    let old_start = first.old.start - leading;
    let new_start = first.new.start - leading;
    let old_end = last.old.end + trailing;
    let new_end = last.new.end + trailing;

    let mut changes = Vec::new();
    changes.extend(old[old_start..first.old.start].iter().cloned().map(LineChange::Context));

    for (i, diff) in group.iter().enumerate() {
        if i > 0 {
            let prev_old_end = group[i - 1].old.end;
            changes.extend(old[prev_old_end..diff.old.start].iter().cloned().map(LineChange::Context));
        }
        changes.extend(changes_for(old, new, diff));
    }

    changes.extend(old[last.old.end..old_end].iter().cloned().map(LineChange::Context));

    Hunk {
        old_start: old_start + 1,
        old_count: old_end - old_start,
        new_start: new_start + 1,
        new_count: new_end - new_start,
        changes,
    }
}

fn changes_for(old: &[String], new: &[String], diff: &Difference) -> Vec<LineChange> {
    let from: Vec<String> = old[diff.old.clone()].to_vec();
    let to: Vec<String> = new[diff.new.clone()].to_vec();
    match (from.is_empty(), to.is_empty()) {
        (false, true) => from.into_iter().map(LineChange::Deleted).collect(),
        (true, false) => to.into_iter().map(LineChange::Added).collect(),
        _ => vec![LineChange::Changed { from, to }],
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lcs::diff_lines;

    fn lines(s: &str) -> Vec<String> {
        s.lines().map(str::to_owned).collect()
    }

    #[test]
    fn single_change_becomes_one_hunk_with_no_context_in_normal_mode() {
        let old = lines("a\nb\nc");
        let new = lines("a\nx\nc");
        let diffs = diff_lines(&old, &new, |a, b| a == b);
        let hunks = build_hunks(&old, &new, &diffs, Dialect::Normal);
        assert_eq!(hunks.len(), 1);
        assert!(hunks[0].changes.iter().all(|c| !matches!(c, LineChange::Context(_))));
    }

    #[test]
    fn unified_mode_includes_surrounding_context() {
        let old = lines("a\nb\nc\nd\ne");
        let new = lines("a\nb\nX\nd\ne");
        let diffs = diff_lines(&old, &new, |a, b| a == b);
        let hunks = build_hunks(&old, &new, &diffs, Dialect::Unified { context: 2 });
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].old_start, 1);
        assert_eq!(hunks[0].old_count, 5);
    }

    #[test]
    fn distant_changes_stay_in_separate_hunks() {
        let old = lines("a\nb\nc\nd\ne\nf\ng\nh\ni\nj");
        let new = lines("a\nX\nc\nd\ne\nf\ng\nh\ni\nY");
        let diffs = diff_lines(&old, &new, |a, b| a == b);
        let hunks = build_hunks(&old, &new, &diffs, Dialect::Unified { context: 1 });
        assert_eq!(hunks.len(), 2);
    }
}
