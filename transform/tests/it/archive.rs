use std::io::{Cursor, Read, Write};

use path::Glob;
use transform::{AddRule, RenameTransformer, TransformOptions};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::testdata;

fn build_fixture_zip() -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions<()> = FileOptions::default();
    writer.start_file("keep.txt", options).unwrap();
    writer.write_all(b"keep me").unwrap();
    writer.start_file("drop.txt", options).unwrap();
    writer.write_all(b"drop me").unwrap();
    writer.start_file("old_name.bak", options).unwrap();
    writer.write_all(b"renamed content").unwrap();
    writer.finish().unwrap().into_inner()
}

#[test]
fn archive_rewrite_removes_renames_and_adds_entries() {
    let fixture = build_fixture_zip();

    let rename = RenameTransformer::new(Glob::compile("***").unwrap(), r"(.*)\.bak$", "$1").unwrap();
    let options = TransformOptions::builder()
        .leaf_transformers(vec![Box::new(rename) as Box<dyn transform::LeafTransformer>])
        .remove(Glob::compile("**!drop.txt").unwrap())
        .add_rules(vec![AddRule {
            target_archive: Glob::compile("*.zip").unwrap(),
            entry_name: "extra.txt".to_owned(),
            source: testdata::path("extra.txt"),
        }])
        .build();

    let mut output = Vec::new();
    transform::transform("fixture.zip", &mut Cursor::new(fixture), &mut output, &options).unwrap();

    let mut archive = ZipArchive::new(Cursor::new(output)).unwrap();
    let names: Vec<String> = (0..archive.len()).map(|i| archive.by_index(i).unwrap().name().to_owned()).collect();

    assert!(names.contains(&"keep.txt".to_owned()));
    assert!(!names.contains(&"drop.txt".to_owned()));
    assert!(names.contains(&"old_name".to_owned()), "rename should have dropped the .bak suffix: {names:?}");
    assert!(names.contains(&"extra.txt".to_owned()));

    let mut content = String::new();
    archive.by_name("extra.txt").unwrap().read_to_string(&mut content).unwrap();
    assert_eq!(content, "added entry content\n");
}

#[test]
fn a_rename_collision_is_a_duplicate_entry_error() {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions<()> = FileOptions::default();
    writer.start_file("a.bak", options).unwrap();
    writer.write_all(b"one").unwrap();
    writer.start_file("a", options).unwrap();
    writer.write_all(b"two").unwrap();
    let fixture = writer.finish().unwrap().into_inner();

    let rename = RenameTransformer::new(Glob::compile("***").unwrap(), r"(.*)\.bak$", "$1").unwrap();
    let transform_options = TransformOptions::builder()
        .leaf_transformers(vec![Box::new(rename) as Box<dyn transform::LeafTransformer>])
        .build();

    let mut output = Vec::new();
    let err = transform::transform("fixture.zip", &mut Cursor::new(fixture), &mut output, &transform_options).unwrap_err();
    assert!(matches!(err, transform::Error::DuplicateEntry { .. }));
}
