//! Shared plumbing for the five `zz*` binaries (§10.3): the top-level error
//! type each `main` matches on to choose an exit code, and the small
//! `clap::Args` groups (`--look-into`, `--encoding`) flattened into more
//! than one tool's argument struct.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod args;
mod error;

pub use args::{EncodingArg, LookIntoArg};
pub use error::Error;
