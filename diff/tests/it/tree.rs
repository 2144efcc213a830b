use diff::{AbsentFileMode, CompareOptions, Dialect, FileComparison};

use crate::testdata;

#[test]
fn a_directory_pair_classifies_every_file() {
    let old_root = testdata::path("tree_old");
    let new_root = testdata::path("tree_new");

    let result = diff::diff_trees(&old_root, &new_root, walk::Options::default(), &CompareOptions::default(), Dialect::Unified { context: 3 }, AbsentFileMode::Report, None).unwrap();

    assert!(result.has_differences());
    assert_eq!(result.comparisons.len(), 4);

    let unchanged = find(&result.comparisons, "unchanged.txt");
    assert!(matches!(unchanged, FileComparison::Unchanged { .. }));

    let changed = find(&result.comparisons, "changed.txt");
    assert!(matches!(changed, FileComparison::Changed { differential, .. } if !differential.is_empty()));

    let removed = find(&result.comparisons, "removed.txt");
    assert!(matches!(removed, FileComparison::OnlyInOld { .. }));

    let added = find(&result.comparisons, "added.txt");
    assert!(matches!(added, FileComparison::OnlyInNew { .. }));
}

fn find<'a>(comparisons: &'a [FileComparison], name: &str) -> &'a FileComparison {
    comparisons
        .iter()
        .find(|c| match c {
            FileComparison::Unchanged { path } => path == name,
            FileComparison::Changed { old_path, .. } => old_path == name,
            FileComparison::OnlyInOld { path, .. } => path == name,
            FileComparison::OnlyInNew { path, .. } => path == name,
        })
        .unwrap_or_else(|| panic!("no comparison for {name}"))
}
