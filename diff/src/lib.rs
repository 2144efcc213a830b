//! The diff/patch engine (§4.5): computes, renders, parses, and applies
//! line-level differences between documents and between directory trees.
//!
//! The engine is built in three independent layers: [`lcs`] computes a flat
//! list of differences between two line sequences, [`hunk`] groups them into
//! dialect-appropriate hunks with surrounding context, and [`render`]/[`parse`]
//! convert a [`Differential`] to and from the three textual dialects GNU
//! `diff` produces. [`tree`] walks two directory trees and pairs up their
//! files for comparison; [`compare`] and [`tokenize`] hold the comparison
//! options (whitespace, equivalences, comment-stripping) that feed into the
//! line comparator used by both the document- and tree-level entry points.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod compare;
mod error;
mod hunk;
mod lcs;
mod model;
mod parse;
mod render;
mod tokenize;
mod tree;

pub use compare::{CompareOptions, IgnoreLines, ScopedEquivalence};
pub use error::Error;
pub use lcs::{diff_lines, Difference};
pub use model::{Dialect, Differential, Hunk as DiffHunk, LineChange};
pub use parse::parse;
pub use render::render;
pub use tokenize::{CStyleTokenizer, Tokenizer};
pub use tree::{diff_trees, AbsentFileMode, FileComparison, TreeDiff};

/// Compute the full [`Differential`] between two already-split documents for
/// the given dialect: runs [`diff_lines`] and groups the result into hunks.
///
/// `eq` decides line equality (typically [`CompareOptions::lines_equal`]
/// bound to a path); pass `|a, b| a == b` for a plain comparison.
pub fn diff_documents(old: &[String], new: &[String], eq: impl Fn(&String, &String) -> bool, dialect: Dialect) -> Differential {
    let differences = lcs::diff_lines(old, new, eq);
    build_differential(old, new, &differences, dialect)
}

/// Build a [`Differential`] from an already-computed difference list, as
/// produced by [`diff_lines`]. Exposed separately from [`diff_documents`] so
/// callers that already have a difference list (or want to recompute hunks
/// under a different dialect) don't redo the LCS pass.
pub fn build_differential(old: &[String], new: &[String], differences: &[Difference], dialect: Dialect) -> Differential {
    Differential {
        hunks: hunk::build_hunks(old, new, differences, dialect),
    }
}
