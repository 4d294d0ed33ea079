//! Lexical analysis of ACS routine source
//!
//! This module turns the raw routine text into uppercase tokens with a
//! single-slot pushback, which is all the lookahead the parser needs.

mod tokenizer;

pub use tokenizer::*;
