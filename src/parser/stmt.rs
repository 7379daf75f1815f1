use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_expr, parse_procedure_call_expr, parse_rvalue},
        lookups::BindingPower,
    },
};

use super::parser::Parser;

/// Parses one statement together with its terminating semicolon.
pub fn parse_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let handler = match parser.get_stmt_lookup().get(&parser.current_token_kind()) {
        Some(handler) => *handler,
        None => return Err(parser.unexpected_detailed("expected a statement")),
    };

    let stmt = handler(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(stmt)
}

/// Parses one or more statements, stopping before any of `terminators`.
pub fn parse_stmt_list(parser: &mut Parser, terminators: &[TokenKind]) -> Result<Vec<Node>, Error> {
    let mut statements = vec![parse_stmt(parser)?];
    while !terminators.contains(&parser.current_token_kind()) {
        statements.push(parse_stmt(parser)?);
    }

    Ok(statements)
}

pub fn parse_definition(parser: &mut Parser) -> Result<Node, Error> {
    match parser.current_token_kind() {
        TokenKind::Var => parse_variable_def(parser),
        TokenKind::Function => parse_function_def(parser),
        TokenKind::Procedure => parse_procedure_def(parser),
        _ => Err(parser.unexpected_detailed("expected a definition")),
    }
}

/// `VAR ident IS expression`
pub fn parse_variable_def(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().position.clone();

    let error = parser.unexpected_detailed("expected identifier during variable definition");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
    parser.expect(TokenKind::Is)?;
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(parser.node(
        start,
        NodeKind::VariableDef {
            name,
            value: Box::new(value),
        },
    ))
}

/// Local `VAR` definitions of a function or procedure, each optionally followed by `;`.
fn parse_local_variable_defs(parser: &mut Parser) -> Result<Vec<Node>, Error> {
    let mut variable_defs = vec![];
    while parser.current_token_kind() == TokenKind::Var {
        variable_defs.push(parse_variable_def(parser)?);
        parser.eat(TokenKind::Semicolon);
    }

    Ok(variable_defs)
}

/// `'{' (ident '[' ident ']' (',' ident '[' ident ']')*)? '}'`
fn parse_formals(parser: &mut Parser) -> Result<Vec<Node>, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut formals = vec![];
    if parser.current_token_kind() != TokenKind::CloseCurly {
        formals.push(parse_formal_arg(parser)?);
        while parser.eat(TokenKind::Comma) {
            formals.push(parse_formal_arg(parser)?);
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(formals)
}

fn parse_formal_arg(parser: &mut Parser) -> Result<Node, Error> {
    let error = parser.unexpected_detailed("expected parameter name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;
    parser.expect(TokenKind::OpenSquare)?;
    let error = parser.unexpected_detailed("expected parameter type");
    let arg_type = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
    parser.expect(TokenKind::CloseSquare)?;

    Ok(parser.node(
        name.position,
        NodeKind::FormalArg {
            name: name.value,
            arg_type,
        },
    ))
}

/// `FUNCTION Name { formals } RETURN type vars IS rvalue END FUNCTION`
pub fn parse_function_def(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().position.clone();

    let error = parser.unexpected_detailed("expected function name");
    let name = parser.expect_error(TokenKind::FuncIdentifier, Some(error))?.value;
    let formals = parse_formals(parser)?;

    parser.expect(TokenKind::Return)?;
    let error = parser.unexpected_detailed("expected return type");
    let return_type = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let variable_defs = parse_local_variable_defs(parser)?;
    parser.expect(TokenKind::Is)?;
    let body = parse_rvalue(parser)?;
    parser.expect(TokenKind::End)?;
    parser.expect(TokenKind::Function)?;

    Ok(parser.node(
        start,
        NodeKind::FunctionDef {
            name,
            formals,
            return_type,
            variable_defs,
            body: Box::new(body),
        },
    ))
}

/// `PROCEDURE NAME { formals } (RETURN type)? vars IS statements END PROCEDURE`
pub fn parse_procedure_def(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().position.clone();

    let error = parser.unexpected_detailed("expected procedure name");
    let name = parser.expect_error(TokenKind::ProcIdentifier, Some(error))?.value;
    let formals = parse_formals(parser)?;

    let return_type = if parser.eat(TokenKind::Return) {
        let error = parser.unexpected_detailed("expected return type");
        Some(parser.expect_error(TokenKind::Identifier, Some(error))?.value)
    } else {
        None
    };

    let variable_defs = parse_local_variable_defs(parser)?;
    parser.expect(TokenKind::Is)?;
    let statements = parse_stmt_list(parser, &[TokenKind::End])?;
    parser.expect(TokenKind::End)?;
    parser.expect(TokenKind::Procedure)?;

    Ok(parser.node(
        start,
        NodeKind::ProcedureDef {
            name,
            formals,
            return_type,
            variable_defs,
            statements,
        },
    ))
}

/// `ident ('.' ident)? ':=' rvalue`
pub fn parse_assignment_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let name = parser.advance().clone();

    let attribute = if parser.eat(TokenKind::Dot) {
        let error = parser.unexpected_detailed("expected attribute name after '.'");
        let attribute = parser.expect_error(TokenKind::Identifier, Some(error))?;
        Some(Box::new(parser.node(
            attribute.position,
            NodeKind::WriteAttribute {
                name: attribute.value,
            },
        )))
    } else {
        None
    };

    let target = parser.node(
        name.position.clone(),
        NodeKind::Var {
            name: name.value,
            attribute,
        },
    );

    parser.expect(TokenKind::Assignment)?;
    let value = parse_rvalue(parser)?;

    Ok(parser.node(
        name.position,
        NodeKind::Assignment {
            target: Box::new(target),
            value: Box::new(value),
        },
    ))
}

pub fn parse_procedure_call_stmt(parser: &mut Parser) -> Result<Node, Error> {
    parse_procedure_call_expr(parser)
}

/// `PRINT item (',' item)*` where an item is an expression or a string literal.
pub fn parse_print_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().position.clone();

    let mut items = vec![parse_print_item(parser)?];
    while parser.eat(TokenKind::Comma) {
        items.push(parse_print_item(parser)?);
    }

    Ok(parser.node(start, NodeKind::PrintStatement { items }))
}

fn parse_print_item(parser: &mut Parser) -> Result<Node, Error> {
    if parser.current_token_kind() == TokenKind::String {
        let token = parser.advance().clone();
        return Ok(parser.node(token.position, NodeKind::StringLiteral { value: token.value }));
    }

    parse_expr(parser, BindingPower::Default)
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().position.clone();
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(parser.node(
        start,
        NodeKind::ReturnStatement {
            value: Box::new(value),
        },
    ))
}

/// `WHILE expression DO statements ENDWHILE`
pub fn parse_while_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().position.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Do)?;
    let body = parse_stmt_list(parser, &[TokenKind::EndWhile])?;
    parser.expect(TokenKind::EndWhile)?;

    Ok(parser.node(
        start,
        NodeKind::WhileLoop {
            condition: Box::new(condition),
            body,
        },
    ))
}

/// `IF expression THEN statements (ELSE statements)? ENDIF`
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().position.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Then)?;
    let then_branch = parse_stmt_list(parser, &[TokenKind::Else, TokenKind::EndIf])?;

    let else_branch = if parser.eat(TokenKind::Else) {
        parse_stmt_list(parser, &[TokenKind::EndIf])?
    } else {
        vec![]
    };

    parser.expect(TokenKind::EndIf)?;

    Ok(parser.node(
        start,
        NodeKind::IfStatement {
            condition: Box::new(condition),
            then_branch,
            else_branch,
        },
    ))
}
