//! Structural checks that need no symbol information.

use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::{Error, SemanticError},
};

use super::visitor::visit;

pub const WRITABLE_ATTRIBUTES: [&str; 3] = ["day", "month", "year"];
pub const READABLE_ATTRIBUTES: [&str; 5] = ["day", "month", "year", "weekday", "weeknum"];
pub const ALLOWED_TYPES: [&str; 2] = ["int", "date"];

/// State carried through the return placement walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationContext {
    pub nested_ifs: usize,
    pub nested_whiles: usize,
    /// Name of the enclosing procedure when it has no return type.
    pub void_procedure: Option<String>,
}

fn check_attribute(node: &Node, context: ()) -> Result<(), Error> {
    match &node.kind {
        NodeKind::WriteAttribute { name } if !WRITABLE_ATTRIBUTES.contains(&name.as_str()) => {
            Err(Error::new(
                SemanticError::UnwritableAttribute {
                    attribute: name.clone(),
                },
                node.position.clone(),
            ))
        }
        NodeKind::ReadAttribute { name } if !READABLE_ATTRIBUTES.contains(&name.as_str()) => {
            Err(Error::new(
                SemanticError::UnreadableAttribute {
                    attribute: name.clone(),
                },
                node.position.clone(),
            ))
        }
        _ => Ok(context),
    }
}

pub fn check_attributes(tree: &Node) -> Result<(), Error> {
    visit(tree, Some(check_attribute), None, ())
}

fn check_declared_type(node: &Node, context: ()) -> Result<(), Error> {
    let error = match &node.kind {
        NodeKind::FunctionDef { return_type, .. }
            if !ALLOWED_TYPES.contains(&return_type.as_str()) =>
        {
            SemanticError::InvalidReturnType {
                callable: "function",
                type_: return_type.clone(),
            }
        }
        NodeKind::ProcedureDef {
            return_type: Some(return_type),
            ..
        } if !ALLOWED_TYPES.contains(&return_type.as_str()) => SemanticError::InvalidReturnType {
            callable: "procedure",
            type_: return_type.clone(),
        },
        NodeKind::FormalArg { name, arg_type } if !ALLOWED_TYPES.contains(&arg_type.as_str()) => {
            SemanticError::InvalidParameterType {
                name: name.clone(),
                type_: arg_type.clone(),
            }
        }
        _ => return Ok(context),
    };

    Err(Error::new(error, node.position.clone()))
}

pub fn check_declared_types(tree: &Node) -> Result<(), Error> {
    visit(tree, Some(check_declared_type), None, ())
}

fn enter_return_scope(node: &Node, mut context: ValidationContext) -> Result<ValidationContext, Error> {
    match &node.kind {
        NodeKind::IfStatement { .. } => context.nested_ifs += 1,
        NodeKind::WhileLoop { .. } => context.nested_whiles += 1,
        NodeKind::ProcedureDef {
            name, return_type, ..
        } => {
            context.void_procedure = match return_type {
                Some(_) => None,
                None => Some(name.clone()),
            };
        }
        NodeKind::ReturnStatement { .. } => {
            if context.nested_ifs > 0 || context.nested_whiles > 0 {
                return Err(Error::new(
                    SemanticError::MisplacedReturn,
                    node.position.clone(),
                ));
            }

            if let Some(name) = &context.void_procedure {
                return Err(Error::new(
                    SemanticError::ReturnInVoidProcedure { name: name.clone() },
                    node.position.clone(),
                ));
            }
        }
        _ => {}
    }

    Ok(context)
}

fn leave_return_scope(node: &Node, mut context: ValidationContext) -> Result<ValidationContext, Error> {
    match &node.kind {
        NodeKind::IfStatement { .. } => context.nested_ifs -= 1,
        NodeKind::WhileLoop { .. } => context.nested_whiles -= 1,
        NodeKind::ProcedureDef { .. } => context.void_procedure = None,
        _ => {}
    }

    Ok(context)
}

/// `RETURN` may not appear under `IF`/`WHILE`, nor in a procedure without a return type.
pub fn check_return_placement(tree: &Node) -> Result<(), Error> {
    visit(
        tree,
        Some(enter_return_scope),
        Some(leave_return_scope),
        ValidationContext::default(),
    )?;

    Ok(())
}
