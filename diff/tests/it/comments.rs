use diff::{diff_documents, CStyleTokenizer, CompareOptions, Dialect};

use crate::testdata;

#[test]
fn a_comment_only_change_is_invisible_when_ignoring_line_comments() {
    let old_text = testdata::read("comments/old.c");
    let new_text = testdata::read("comments/new.c");

    let tokenizer = CStyleTokenizer { strip_line: true, ..Default::default() };
    let compare = CompareOptions::builder().tokenizer(tokenizer).build();

    let old_lines = compare.prepare_lines("old.c", &old_text);
    let new_lines = compare.prepare_lines("new.c", &new_text);
    let differential = diff_documents(&old_lines, &new_lines, |a, b| compare.lines_equal("old.c", a, b), Dialect::Unified { context: 3 });

    assert!(differential.is_empty(), "comment-only change should vanish once line comments are ignored");
}

#[test]
fn the_same_change_is_visible_without_comment_ignoring() {
    let old_text = testdata::read("comments/old.c");
    let new_text = testdata::read("comments/new.c");

    let compare = CompareOptions::default();
    let old_lines = compare.prepare_lines("old.c", &old_text);
    let new_lines = compare.prepare_lines("new.c", &new_text);
    let differential = diff_documents(&old_lines, &new_lines, |a, b| compare.lines_equal("old.c", a, b), Dialect::Unified { context: 3 });

    assert!(!differential.is_empty());
}
