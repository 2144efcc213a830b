//! Directory-tree comparison (§4.5's `zzdiff` directory mode): walks two
//! roots with [`walk::walk`], pairs up their files, and runs the line
//! comparator over each pair.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use derivative::Derivative;
use path::Equivalence;
use walk::Node;

use crate::compare::CompareOptions;
use crate::error::Error;
use crate::model::{Dialect, Differential};
use crate::{build_differential, diff_documents, diff_lines, Difference};

/// How a path present on only one side of a tree comparison is handled.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Derivative)]
#[derivative(Default)]
pub enum AbsentFileMode {
    /// Report it as added or removed without attempting a line diff (default).
    #[derivative(Default)]
    Report,
    /// Diff it against an empty document, so the result shows every line as
    /// added (new-only) or deleted (old-only).
    CompareWithEmpty,
    /// Leave it out of the comparison entirely.
    Ignore,
}

/// The outcome of comparing one logical file between the two trees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileComparison {
    /// Present, with identical content, on both sides.
    Unchanged {
        /// The file's path (same on both sides unless paired by equivalence).
        path: String,
    },
    /// Present on both sides with different content.
    Changed {
        /// The old tree's path.
        old_path: String,
        /// The new tree's path.
        new_path: String,
        /// The computed line differences.
        differential: Differential,
    },
    /// Present only in the old tree.
    OnlyInOld {
        /// The old tree's path.
        path: String,
        /// Set when [`AbsentFileMode::CompareWithEmpty`] was requested.
        differential: Option<Differential>,
    },
    /// Present only in the new tree.
    OnlyInNew {
        /// The new tree's path.
        path: String,
        /// Set when [`AbsentFileMode::CompareWithEmpty`] was requested.
        differential: Option<Differential>,
    },
}

impl FileComparison {
    /// Whether this comparison represents a difference between the trees.
    pub fn is_difference(&self) -> bool {
        !matches!(self, FileComparison::Unchanged { .. })
    }
}

/// The full result of comparing two directory trees.
#[derive(Clone, Debug, Default)]
pub struct TreeDiff {
    /// One entry per paired or unpaired file, in the order files were discovered.
    pub comparisons: Vec<FileComparison>,
}

impl TreeDiff {
    /// Whether any pair in this diff differs (drives `zzdiff`'s exit status, §6).
    pub fn has_differences(&self) -> bool {
        self.comparisons.iter().any(FileComparison::is_difference)
    }
}

/// Walk `old_root` and `new_root` with `walk_options`, pair up their files by
/// identical path (or, failing that, by `path_equivalence` if given), and
/// compare each pair's content under `compare` into `dialect`'s hunks.
pub fn diff_trees(
    old_root: &Path,
    new_root: &Path,
    walk_options: walk::Options,
    compare: &CompareOptions,
    dialect: Dialect,
    absent: AbsentFileMode,
    path_equivalence: Option<&Equivalence>,
) -> Result<TreeDiff, Error> {
    let mut old_files = collect_leaves(old_root, walk_options.clone())?;
    let mut new_files = collect_leaves(new_root, walk_options)?;

    let mut comparisons = Vec::new();

    let mut shared_keys: Vec<String> = old_files.keys().filter(|k| new_files.contains_key(*k)).cloned().collect();
    shared_keys.sort();
    for key in shared_keys {
        let old_node = old_files.remove(&key).unwrap();
        let new_node = new_files.remove(&key).unwrap();
        comparisons.push(compare_pair(&key, &key, &old_node, &new_node, compare, dialect)?);
    }

    if let Some(equivalence) = path_equivalence {
        let mut old_keys: Vec<String> = old_files.keys().cloned().collect();
        old_keys.sort();
        for old_key in old_keys {
            let mut candidates: Vec<&String> = new_files.keys().filter(|new_key| equivalence.equivalent(&old_key, new_key)).collect();
            candidates.sort();
            let matched = candidates.into_iter().next().cloned();
            if let Some(new_key) = matched {
                log::debug!("pairing {old_key} with {new_key} by path equivalence (no exact-path match)");
                let old_node = old_files.remove(&old_key).unwrap();
                let new_node = new_files.remove(&new_key).unwrap();
                comparisons.push(compare_pair(&old_key, &new_key, &old_node, &new_node, compare, dialect)?);
            }
        }
    }

    if absent != AbsentFileMode::Ignore {
        let mut remaining_old: Vec<(String, Node)> = old_files.into_iter().collect();
        remaining_old.sort_by(|a, b| a.0.cmp(&b.0));
        for (path, node) in remaining_old {
            comparisons.push(absent_comparison(path, &node, compare, dialect, absent, Side::Old)?);
        }

        let mut remaining_new: Vec<(String, Node)> = new_files.into_iter().collect();
        remaining_new.sort_by(|a, b| a.0.cmp(&b.0));
        for (path, node) in remaining_new {
            comparisons.push(absent_comparison(path, &node, compare, dialect, absent, Side::New)?);
        }
    }

    Ok(TreeDiff { comparisons })
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum Side {
    Old,
    New,
}

fn absent_comparison(path: String, node: &Node, compare: &CompareOptions, dialect: Dialect, absent: AbsentFileMode, side: Side) -> Result<FileComparison, Error> {
    let differential = match absent {
        AbsentFileMode::Ignore | AbsentFileMode::Report => None,
        AbsentFileMode::CompareWithEmpty => {
            let text = read_leaf_text(node)?;
            let lines = compare.prepare_lines(&path, &text);
            let differential = match side {
                Side::Old => diff_documents(&lines, &[], |a, b| compare.lines_equal(&path, a, b), dialect),
                Side::New => diff_documents(&[], &lines, |a, b| compare.lines_equal(&path, a, b), dialect),
            };
            Some(differential)
        }
    };
    Ok(match side {
        Side::Old => FileComparison::OnlyInOld { path, differential },
        Side::New => FileComparison::OnlyInNew { path, differential },
    })
}

fn compare_pair(old_path: &str, new_path: &str, old_node: &Node, new_node: &Node, compare: &CompareOptions, dialect: Dialect) -> Result<FileComparison, Error> {
    let old_text = read_leaf_text(old_node)?;
    let new_text = read_leaf_text(new_node)?;
    let old_lines = compare.prepare_lines(old_path, &old_text);
    let new_lines = compare.prepare_lines(new_path, &new_text);

    let eq = |a: &String, b: &String| compare.lines_equal(old_path, a, b);
    let differences: Vec<Difference> = diff_lines(&old_lines, &new_lines, eq);
    if differences.is_empty() {
        return Ok(FileComparison::Unchanged { path: old_path.to_owned() });
    }
    let differential = build_differential(&old_lines, &new_lines, &differences, dialect);
    Ok(FileComparison::Changed {
        old_path: old_path.to_owned(),
        new_path: new_path.to_owned(),
        differential,
    })
}

fn read_leaf_text(node: &Node) -> Result<String, Error> {
    match node {
        Node::Leaf { opener, .. } => {
            let mut buf = Vec::new();
            opener.open()?.read_to_end(&mut buf)?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        }
        _ => Ok(String::new()),
    }
}

fn collect_leaves(root: &Path, options: walk::Options) -> Result<HashMap<String, Node>, Error> {
    let mut files = HashMap::new();
    for result in walk::walk(root, options) {
        let node = result?;
        if node.is_leaf() {
            files.insert(node.path().as_str().to_owned(), node);
        }
    }
    Ok(files)
}

#[cfg(test)]
mod test {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn identical_trees_have_no_differences() {
        let old = tempdir().unwrap();
        let new = tempdir().unwrap();
        fs::write(old.path().join("a.txt"), "hello\n").unwrap();
        fs::write(new.path().join("a.txt"), "hello\n").unwrap();

        let diff = diff_trees(old.path(), new.path(), walk::Options::default(), &CompareOptions::default(), Dialect::Normal, AbsentFileMode::Report, None).unwrap();
        assert!(!diff.has_differences());
    }

    #[test]
    fn a_changed_file_is_reported_with_its_differential() {
        let old = tempdir().unwrap();
        let new = tempdir().unwrap();
        fs::write(old.path().join("a.txt"), "one\ntwo\n").unwrap();
        fs::write(new.path().join("a.txt"), "one\nTWO\n").unwrap();

        let diff = diff_trees(old.path(), new.path(), walk::Options::default(), &CompareOptions::default(), Dialect::Normal, AbsentFileMode::Report, None).unwrap();
        assert!(diff.has_differences());
        assert_eq!(diff.comparisons.len(), 1);
        assert!(matches!(&diff.comparisons[0], FileComparison::Changed { differential, .. } if !differential.is_empty()));
    }

    #[test]
    fn a_file_only_in_the_new_tree_is_reported() {
        let old = tempdir().unwrap();
        let new = tempdir().unwrap();
        fs::write(new.path().join("added.txt"), "new\n").unwrap();

        let diff = diff_trees(old.path(), new.path(), walk::Options::default(), &CompareOptions::default(), Dialect::Normal, AbsentFileMode::Report, None).unwrap();
        assert_eq!(diff.comparisons.len(), 1);
        assert!(matches!(&diff.comparisons[0], FileComparison::OnlyInNew { path, .. } if path == "added.txt"));
    }

    #[test]
    fn ignore_mode_drops_unpaired_files() {
        let old = tempdir().unwrap();
        let new = tempdir().unwrap();
        fs::write(new.path().join("added.txt"), "new\n").unwrap();

        let diff = diff_trees(old.path(), new.path(), walk::Options::default(), &CompareOptions::default(), Dialect::Normal, AbsentFileMode::Ignore, None).unwrap();
        assert!(diff.comparisons.is_empty());
    }

    #[test]
    fn paired_comparisons_are_reported_in_sorted_path_order() {
        let old = tempdir().unwrap();
        let new = tempdir().unwrap();
        for name in ["zeta.txt", "mid.txt", "alpha.txt"] {
            fs::write(old.path().join(name), "one\n").unwrap();
            fs::write(new.path().join(name), "two\n").unwrap();
        }

        let diff = diff_trees(old.path(), new.path(), walk::Options::default(), &CompareOptions::default(), Dialect::Normal, AbsentFileMode::Report, None).unwrap();
        let names: Vec<&str> = diff
            .comparisons
            .iter()
            .map(|c| match c {
                FileComparison::Changed { old_path, .. } => old_path.as_str(),
                other => panic!("expected a Changed comparison, got {other:?}"),
            })
            .collect();
        assert_eq!(names, vec!["alpha.txt", "mid.txt", "zeta.txt"]);
    }
}
