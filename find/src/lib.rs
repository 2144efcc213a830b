//! The find predicate (§4.6): a small boolean expression language over
//! node metadata, evaluated short-circuit left-to-right against a node
//! enumeration, generalizing `archive/src/strategy.rs`'s capability-set
//! dispatch to a single pluggable hook (`-disassemble`) while the closed
//! set of tests and actions themselves are a plain AST and evaluator.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod ast;
mod digest;
mod error;
mod eval;
mod parser;

pub use ast::{Action, Cmp, Expr, NodeType, NumArg, Test};
pub use error::Error;
pub use eval::{run, DisassembleHook, DisassembleResult, FindOptions, StubDisassembler};
pub use parser::parse;
