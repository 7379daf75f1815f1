//! Semantic validation.
//!
//! A validated program has legal attribute names and declared types,
//! `RETURN` statements only where they are allowed, every identifier
//! bound to exactly one symbol and every procedure called in the right
//! context. Each check is a separate walk over the tree and the first
//! error found ends validation.

use crate::{ast::ast::Node, errors::errors::Error};

use self::symbol_table::SymbolTable;

pub mod binding;
pub mod checks;
pub mod symbol_table;
pub mod visitor;


/// Validates `tree` and returns the symbol table the evaluator runs against.
#[tracing::instrument(level = "debug", skip_all)]
pub fn validate(tree: &Node) -> Result<SymbolTable, Error> {
    checks::check_attributes(tree)?;
    checks::check_declared_types(tree)?;
    checks::check_return_placement(tree)?;

    let symbols = binding::bind_variables(tree, SymbolTable::new())?;
    let symbols = binding::bind_callables(tree, symbols)?;
    binding::check_call_context(tree, &symbols)?;

    tracing::debug!(symbols = symbols.len(), "validation finished");
    Ok(symbols)
}
