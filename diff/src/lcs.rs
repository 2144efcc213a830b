//! The line-level comparison core (§4.5): a classic LCS diff producing a
//! flat list of [`Difference`] blocks, independent of any output dialect.

use std::ops::Range;

/// One contiguous difference between two line sequences.
///
/// Either side's range may be empty (a pure insertion or pure deletion) but
/// never both — an empty/empty difference is not emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Difference {
    /// The affected range of 0-based indices in the old sequence.
    pub old: Range<usize>,
    /// The affected range of 0-based indices in the new sequence.
    pub new: Range<usize>,
}

impl Difference {
    /// Whether this difference has content on both sides (a "change", as
    /// opposed to a pure insertion or pure deletion).
    pub fn is_change(&self) -> bool {
        !self.old.is_empty() && !self.new.is_empty()
    }
}

/// Compute the line-level differences between `old` and `new`.
///
/// Equality is decided by `eq`, so callers can fold in a line-equivalence
/// rule or whitespace normalization before comparing (§4.5).
pub fn diff_lines<T>(old: &[T], new: &[T], eq: impl Fn(&T, &T) -> bool) -> Vec<Difference> {
    let n = old.len();
    let m = new.len();

    // table[i][j] = length of the LCS of old[i..] and new[j..].
    let mut table = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if eq(&old[i], &new[j]) {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    #[derive(PartialEq)]
    enum Op {
        Equal,
        Delete,
        Insert,
    }

    let mut ops = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if eq(&old[i], &new[j]) {
            ops.push(Op::Equal);
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            ops.push(Op::Delete);
            i += 1;
        } else {
            ops.push(Op::Insert);
            j += 1;
        }
    }
    ops.extend(std::iter::repeat_with(|| Op::Delete).take(n - i));
    ops.extend(std::iter::repeat_with(|| Op::Insert).take(m - j));

    // Merge consecutive non-equal runs (deletes and/or inserts) into one
    // Difference block each; a block may mix deletes and inserts, which is
    // exactly what makes it a "change" rather than a pure add/delete.
    let mut differences = Vec::new();
    let (mut oi, mut ni) = (0usize, 0usize);
    let mut k = 0;
    while k < ops.len() {
        match ops[k] {
            Op::Equal => {
                oi += 1;
                ni += 1;
                k += 1;
            }
            Op::Delete | Op::Insert => {
                let (old_start, new_start) = (oi, ni);
                while k < ops.len() && ops[k] != Op::Equal {
                    match ops[k] {
                        Op::Delete => oi += 1,
                        Op::Insert => ni += 1,
                        Op::Equal => unreachable!(),
                    }
                    k += 1;
                }
                differences.push(Difference {
                    old: old_start..oi,
                    new: new_start..ni,
                });
            }
        }
    }
    differences
}

#[cfg(test)]
mod test {
    use super::*;

    fn lines(s: &str) -> Vec<String> {
        s.lines().map(str::to_owned).collect()
    }

    #[test]
    fn identical_sequences_have_no_differences() {
        let old = lines("a\nb\nc");
        let diffs = diff_lines(&old, &old.clone(), |a, b| a == b);
        assert!(diffs.is_empty());
    }

    #[test]
    fn pure_insertion_has_an_empty_old_range() {
        let old = lines("a\nc");
        let new = lines("a\nb\nc");
        let diffs = diff_lines(&old, &new, |a, b| a == b);
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].old.is_empty());
        assert_eq!(diffs[0].new, 1..2);
    }

    #[test]
    fn pure_deletion_has_an_empty_new_range() {
        let old = lines("a\nb\nc");
        let new = lines("a\nc");
        let diffs = diff_lines(&old, &new, |a, b| a == b);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].old, 1..2);
        assert!(diffs[0].new.is_empty());
    }

    #[test]
    fn a_single_line_change_is_a_change_block() {
        let old = lines("minVersion=1.2");
        let new = lines("minVersion=1.3");
        let diffs = diff_lines(&old, &new, |a, b| a == b);
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].is_change());
    }
}
