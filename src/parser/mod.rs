//! Parser module for building the syntax tree.
//!
//! Transforms the token stream into a [`crate::ast::ast::Node`] of kind
//! `Program`. Expressions use a Pratt parser: NUD (null denotation) and
//! LED (left denotation) handlers registered per token kind, with binding
//! powers for precedence. Statements are dispatched on their first token.
//!
//! Every node receives a fresh id from the parser, which later passes use
//! as a key into the symbol table's binding index.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
