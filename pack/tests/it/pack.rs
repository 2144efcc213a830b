use std::io::Cursor;
use std::path::PathBuf;

use pack::{PackOptions, RenameRule};
use tempfile::tempdir;
use zip::ZipArchive;

use crate::testdata;

fn entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    (0..archive.len()).map(|i| archive.by_index(i).unwrap().name().to_owned()).collect()
}

#[test]
fn packs_a_directory_tree_into_a_zip_in_sorted_order() {
    let dir = tempdir().unwrap();
    testdata::write(dir.path(), "b.txt", b"b");
    testdata::write(dir.path(), "a.txt", b"a");
    testdata::write(dir.path(), "sub/c.txt", b"c");

    let options = PackOptions::builder().archive_format("zip").build();
    let mut output = Vec::new();
    pack::pack(&[dir.path().to_path_buf()], &mut output, &options).unwrap();

    let mut names = entry_names(&output);
    names.retain(|n| !n.ends_with('/'));
    assert_eq!(names, vec!["a.txt", "b.txt", "sub/c.txt"]);
}

#[test]
fn a_plain_file_input_is_packed_under_its_own_name() {
    let dir = tempdir().unwrap();
    testdata::write(dir.path(), "solo.txt", b"hello");

    let options = PackOptions::builder().archive_format("zip").build();
    let mut output = Vec::new();
    pack::pack(&[dir.path().join("solo.txt")], &mut output, &options).unwrap();

    assert_eq!(entry_names(&output), vec!["solo.txt".to_owned()]);
}

#[test]
fn rename_rule_rewrites_every_computed_entry_name() {
    let dir = tempdir().unwrap();
    testdata::write(dir.path(), "a.java", b"class A {}");

    let rename = RenameRule::new(r"\.java$", ".class").unwrap();
    let options = PackOptions::builder().archive_format("zip").rename(rename).build();
    let mut output = Vec::new();
    pack::pack(&[dir.path().to_path_buf()], &mut output, &options).unwrap();

    assert_eq!(entry_names(&output), vec!["a.class".to_owned()]);
}

#[test]
fn rename_collisions_are_reported_as_duplicate_entries() {
    let dir = tempdir().unwrap();
    testdata::write(dir.path(), "a.java", b"one");
    testdata::write(dir.path(), "a.kt", b"two");

    let rename = RenameRule::new(r"\.(java|kt)$", ".class").unwrap();
    let options = PackOptions::builder().archive_format("zip").rename(rename).build();
    let mut output = Vec::new();
    let err = pack::pack(&[dir.path().to_path_buf()], &mut output, &options).unwrap_err();

    assert!(matches!(err, pack::Error::DuplicateEntry { .. }), "expected a duplicate entry error, got {err:?}");
}

#[test]
fn multiple_inputs_are_packed_in_the_given_order() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    testdata::write(first.path(), "one.txt", b"1");
    testdata::write(second.path(), "two.txt", b"2");

    let inputs: Vec<PathBuf> = vec![first.path().join("one.txt"), second.path().join("two.txt")];
    let options = PackOptions::builder().archive_format("zip").build();
    let mut output = Vec::new();
    pack::pack(&inputs, &mut output, &options).unwrap();

    assert_eq!(entry_names(&output), vec!["one.txt".to_owned(), "two.txt".to_owned()]);
}
