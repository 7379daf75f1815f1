//! Error types and error handling for the interpreter.
//!
//! Every phase reports through the same positioned [`errors::Error`]. The
//! payload belongs to exactly one of four taxonomies:
//!
//! - Lexical errors (illegal characters, bad literals)
//! - Syntax errors from the parser
//! - Semantic errors found during validation
//! - Runtime errors raised by the evaluator
//!
//! All of them are fatal: the first one stops the pipeline.

pub mod errors;
