//! Name binding and call-context checks.
//!
//! Variables and arguments are collected in a first walk, functions and
//! procedures in a second. Callables are registered from the program's
//! definition list before any call is resolved, so a call may name a
//! callable defined further down the file.

use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::{Error, SemanticError},
};

use super::{
    symbol_table::{Signature, SymbolKind, SymbolTable},
    visitor::visit,
};

/// Name of the built-in date function.
pub const TODAY: &str = "Today";

fn bind_variable(node: &Node, mut symbols: SymbolTable) -> Result<SymbolTable, Error> {
    match &node.kind {
        NodeKind::VariableDef { name, .. } => {
            if let Some(earlier) = symbols.lookup_entry(name) {
                return Err(Error::new(
                    SemanticError::VariableRedefined {
                        name: name.clone(),
                        earlier_line: earlier.line,
                    },
                    node.position.clone(),
                ));
            }
            symbols.define(name, SymbolKind::Var, node, None);
        }
        NodeKind::FormalArg { name, .. } => {
            if let Some(earlier) = symbols.lookup_entry(name) {
                return Err(Error::new(
                    SemanticError::ArgumentRedefined {
                        name: name.clone(),
                        earlier_line: earlier.line,
                    },
                    node.position.clone(),
                ));
            }
            symbols.define(name, SymbolKind::Arg, node, None);
        }
        NodeKind::Var { name, .. } => match symbols.lookup(name) {
            Some(symbol) => symbols.bind(node.id, symbol),
            None => {
                return Err(Error::new(
                    SemanticError::UndefinedVariable { name: name.clone() },
                    node.position.clone(),
                ))
            }
        },
        _ => {}
    }

    Ok(symbols)
}

/// Defines every variable and formal argument, and binds each variable use.
pub fn bind_variables(tree: &Node, symbols: SymbolTable) -> Result<SymbolTable, Error> {
    visit(tree, Some(bind_variable), None, symbols)
}

fn define_callable(node: &Node, symbols: &mut SymbolTable) -> Result<(), Error> {
    let (name, kind, signature) = match &node.kind {
        NodeKind::FunctionDef {
            name,
            formals,
            return_type,
            ..
        } => (
            name,
            SymbolKind::Func,
            Signature {
                arity: formals.len(),
                return_type: Some(return_type.clone()),
            },
        ),
        NodeKind::ProcedureDef {
            name,
            formals,
            return_type,
            ..
        } => (
            name,
            SymbolKind::Proc,
            Signature {
                arity: formals.len(),
                return_type: return_type.clone(),
            },
        ),
        _ => return Ok(()),
    };

    if let Some(earlier) = symbols.lookup_entry(name) {
        return Err(Error::new(
            SemanticError::CallableRedefined {
                name: name.clone(),
                earlier_line: earlier.line,
            },
            node.position.clone(),
        ));
    }

    tracing::trace!(name = %name, line = node.line(), "defining callable");
    symbols.define(name, kind, node, Some(signature));
    Ok(())
}

fn bind_callable(node: &Node, mut symbols: SymbolTable) -> Result<SymbolTable, Error> {
    match &node.kind {
        NodeKind::Program { definitions, .. } => {
            for definition in definitions {
                define_callable(definition, &mut symbols)?;
            }
        }
        NodeKind::FunctionCall { name, arguments } | NodeKind::ProcedureCall { name, arguments } => {
            let Some(symbol) = symbols.lookup(name) else {
                if name == TODAY {
                    return Ok(symbols);
                }
                return Err(Error::new(
                    SemanticError::UndefinedCallable { name: name.clone() },
                    node.position.clone(),
                ));
            };

            let expected = match symbols.get(symbol).and_then(|entry| entry.signature.as_ref()) {
                Some(signature) => signature.arity,
                None => {
                    return Err(Error::new(
                        SemanticError::UndefinedCallable { name: name.clone() },
                        node.position.clone(),
                    ))
                }
            };

            if expected != arguments.len() {
                return Err(Error::new(
                    SemanticError::ArityMismatch {
                        name: name.clone(),
                        expected,
                        received: arguments.len(),
                    },
                    node.position.clone(),
                ));
            }

            symbols.bind(node.id, symbol);
        }
        _ => {}
    }

    Ok(symbols)
}

/// Defines every function and procedure, and binds and arity-checks each call.
pub fn bind_callables(tree: &Node, symbols: SymbolTable) -> Result<SymbolTable, Error> {
    visit(tree, Some(bind_callable), None, symbols)
}

/// State carried through the call-context walk.
pub struct CallContext<'a> {
    symbols: &'a SymbolTable,
    /// Depth of enclosing `PRINT` and `RETURN` statements.
    inside_expr: usize,
}

fn opens_expression(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::PrintStatement { .. } | NodeKind::ReturnStatement { .. }
    )
}

fn check_call<'a>(node: &Node, mut context: CallContext<'a>) -> Result<CallContext<'a>, Error> {
    if opens_expression(node) {
        context.inside_expr += 1;
        return Ok(context);
    }

    if let NodeKind::ProcedureCall { name, .. } = &node.kind {
        let returns_value = context
            .symbols
            .resolve(node.id)
            .and_then(|entry| entry.signature.as_ref())
            .is_some_and(|signature| signature.return_type.is_some());

        let error = match (context.inside_expr > 0, returns_value) {
            (true, false) => SemanticError::VoidProcedureInExpression { name: name.clone() },
            (false, true) => SemanticError::ValuedProcedureAsStatement { name: name.clone() },
            _ => return Ok(context),
        };
        return Err(Error::new(error, node.position.clone()));
    }

    Ok(context)
}

fn leave_expression<'a>(node: &Node, mut context: CallContext<'a>) -> Result<CallContext<'a>, Error> {
    if opens_expression(node) {
        context.inside_expr -= 1;
    }

    Ok(context)
}

/// Procedures with a return type may only be called inside a `PRINT` or
/// `RETURN` statement, and procedures without one never there.
pub fn check_call_context(tree: &Node, symbols: &SymbolTable) -> Result<(), Error> {
    let context = CallContext {
        symbols,
        inside_expr: 0,
    };
    visit(tree, Some(check_call), Some(leave_expression), context)?;

    Ok(())
}
