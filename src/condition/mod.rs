//! Condition module
//!
//! Pairs, conjunctive conditions and alternative sets, the AND/NOT algebra
//! over them, the expression parser that builds them from tokens, and the
//! registry that records which variables were tested.

pub mod algebra;
mod ast;
pub mod parser;
mod registry;


pub use algebra::*;
pub use ast::*;
pub use parser::*;
pub use registry::*;
