//! Lexical analysis module for the interpreter.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using an ordered regex pattern table
//! - Recognition of reserved words and the three identifier classes
//! - Date and integer literals, validated as they are read
//! - Line tracking across whitespace, strings and `#% ... %#` comments

pub mod lexer;
pub mod tokens;
