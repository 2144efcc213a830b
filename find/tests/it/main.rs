//! Integration tests exercising the find predicate end to end over real
//! directory trees, rather than directly against `walk::Node` values.

mod eval;
mod testdata;
