//! Integration tests exercising the diff engine end to end: real files under
//! `testdata/`, through the public API, rather than in-memory line vectors.

mod comments;
mod testdata;
mod tree;
