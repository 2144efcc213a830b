//! Integration tests exercising the pack assembler end to end against real
//! directory trees, verified by reading the result back with the `zip`
//! crate directly (the same cross-check style `transform`'s archive tests use).

mod pack;
mod testdata;
