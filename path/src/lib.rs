//! The nested path grammar and glob engine (§3, §4.3).
//!
//! Paths encode a walk through a filesystem, through archive entries (`!`),
//! and through compression wrappers (`%`). Globs match against the rendered
//! path string and support the shell-glob superset described in §4.3.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

mod equivalence;
mod error;
mod glob;
mod nested;

pub use equivalence::Equivalence;
pub use error::Error;
pub use glob::{Glob, LookIntoGlob};
pub use nested::{Component, NestedPath};
