//! Abstract Syntax Tree (AST) definitions.
//!
//! A program is a single [`ast::Node`] of kind `Program`. Every node carries
//! a stable id assigned by the parser and the source line it came from, so
//! later passes can attach information to nodes without mutating the tree.

pub mod ast;
