use std::io::Cursor;

use diff::Dialect;
use path::Glob;
use transform::{LeafTransformer, PatchTransformer, SubstituteCondition, SubstituteTransformer, TransformOptions};

use crate::testdata;

#[test]
fn substitute_rewrites_a_leaf_end_to_end() {
    let transformer = SubstituteTransformer::new(Glob::compile("*.txt").unwrap(), "foo", "bar", SubstituteCondition::Always, false).unwrap();
    let options = TransformOptions::builder().leaf_transformers(vec![Box::new(transformer) as Box<dyn LeafTransformer>]).build();

    let mut output = Vec::new();
    transform::transform("a.txt", &mut Cursor::new(b"foo and foo again".to_vec()), &mut output, &options).unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), "bar and bar again");
}

#[test]
fn patch_applies_a_computed_differential() {
    let old = vec!["one".to_string(), "two".to_string(), "three".to_string()];
    let new = vec!["one".to_string(), "TWO".to_string(), "three".to_string()];
    let differential = diff::diff_documents(&old, &new, |a, b| a == b, Dialect::Normal);

    let transformer = PatchTransformer::new(Glob::compile("*.txt").unwrap(), vec![differential]);
    let options = TransformOptions::builder().leaf_transformers(vec![Box::new(transformer) as Box<dyn LeafTransformer>]).build();

    let mut output = Vec::new();
    transform::transform("a.txt", &mut Cursor::new(b"one\ntwo\nthree\n".to_vec()), &mut output, &options).unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), "one\nTWO\nthree\n");
}

#[test]
fn patch_rejects_a_hunk_whose_context_does_not_match() {
    let old = vec!["one".to_string(), "two".to_string(), "three".to_string()];
    let new = vec!["one".to_string(), "TWO".to_string(), "three".to_string()];
    let differential = diff::diff_documents(&old, &new, |a, b| a == b, Dialect::Normal);

    let transformer = PatchTransformer::new(Glob::compile("*.txt").unwrap(), vec![differential]);
    let options = TransformOptions::builder().leaf_transformers(vec![Box::new(transformer) as Box<dyn LeafTransformer>]).build();

    let mut output = Vec::new();
    let err = transform::transform("a.txt", &mut Cursor::new(b"one\nDIFFERENT\nthree\n".to_vec()), &mut output, &options).unwrap_err();
    assert!(matches!(err, transform::Error::PatchRejected { .. }));
}

#[test]
fn a_pipeline_runs_every_matching_transformer_in_order() {
    let substitute = SubstituteTransformer::new(Glob::compile("*.txt").unwrap(), "foo", "bar", SubstituteCondition::Always, false).unwrap();
    let update = transform::UpdateTransformer::new(Glob::compile("~*.txt").unwrap(), testdata::path("replacement.txt"));
    let options = TransformOptions::builder()
        .leaf_transformers(vec![Box::new(substitute) as Box<dyn LeafTransformer>, Box::new(update) as Box<dyn LeafTransformer>])
        .build();

    let mut output = Vec::new();
    transform::transform("a.txt", &mut Cursor::new(b"foo".to_vec()), &mut output, &options).unwrap();
    // the update transformer's glob is negated, so it never matches "a.txt";
    // only the substitution should take effect.
    assert_eq!(String::from_utf8(output).unwrap(), "bar");
}
