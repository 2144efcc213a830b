//! Helpers for accessing `testdata/` fixtures.

use std::fs;
use std::path::{Path, PathBuf};

pub fn path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(rel)
}

pub fn read(rel: &str) -> String {
    fs::read_to_string(path(rel)).unwrap_or_else(|e| panic!("reading testdata/{rel}: {e}"))
}
