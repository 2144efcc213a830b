//! Helpers for accessing `testdata/` fixtures.

use std::path::{Path, PathBuf};

pub fn path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(rel)
}
