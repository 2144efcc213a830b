use std::path::PathBuf;

use find::FindOptions;
use tempfile::tempdir;

use crate::testdata;

fn run(root: &std::path::Path, args: &[&str]) -> String {
    let tokens: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let expr = find::parse(&tokens).unwrap();
    let options = FindOptions::builder().root(PathBuf::from(root)).build();
    let mut out = Vec::new();
    find::run(&expr, &options, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn prints_every_matching_path_in_deterministic_order() {
    let dir = tempdir().unwrap();
    testdata::write(dir.path(), "Main.java", b"class Main {}");
    testdata::write(dir.path(), "README.md", b"hi");
    testdata::write(dir.path(), "src/Util.java", b"class Util {}");

    let out = run(dir.path(), &["-name", "*.java", "-and", "-print"]);
    assert_eq!(out, "Main.java\nsrc/Util.java\n");
}

#[test]
fn implicit_print_applies_when_no_action_is_given() {
    let dir = tempdir().unwrap();
    testdata::write(dir.path(), "a.txt", b"a");

    let out = run(dir.path(), &["-name", "a.txt"]);
    assert_eq!(out, "a.txt\n");
}

#[test]
fn or_evaluates_either_side() {
    let dir = tempdir().unwrap();
    testdata::write(dir.path(), "a.java", b"a");
    testdata::write(dir.path(), "b.kt", b"b");
    testdata::write(dir.path(), "c.txt", b"c");

    let out = run(dir.path(), &["-name", "*.java", "-o", "-name", "*.kt"]);
    assert_eq!(out, "a.java\nb.kt\n");
}

#[test]
fn prune_prevents_descent_into_the_current_directory() {
    let dir = tempdir().unwrap();
    testdata::write(dir.path(), "skip/inner.txt", b"x");
    testdata::write(dir.path(), "keep.txt", b"y");

    // The classic `-prune -o -print` idiom: a pruned directory's own name is
    // not printed either, since `-prune`'s `true` short-circuits the `-o`.
    let out = run(dir.path(), &["-name", "skip", "-prune", "-o", "-print"]);
    assert_eq!(out, "keep.txt\n");
}

#[test]
fn size_test_with_a_multiplier_filters_by_byte_count() {
    let dir = tempdir().unwrap();
    testdata::write(dir.path(), "small.bin", &vec![0u8; 10]);
    testdata::write(dir.path(), "big.bin", &vec![0u8; 2048]);

    let out = run(dir.path(), &["-size", "+1k", "-print"]);
    assert_eq!(out, "big.bin\n");
}

#[test]
fn type_test_distinguishes_files_from_directories() {
    let dir = tempdir().unwrap();
    testdata::write(dir.path(), "sub/file.txt", b"x");

    let out = run(dir.path(), &["-type", "d", "-print"]);
    assert_eq!(out, "sub\n");
}

#[test]
fn not_negates_a_test() {
    let dir = tempdir().unwrap();
    testdata::write(dir.path(), "a.txt", b"a");
    testdata::write(dir.path(), "a.log", b"a");

    let out = run(dir.path(), &["!", "-name", "*.log", "-print"]);
    assert_eq!(out, "a.txt\n");
}
