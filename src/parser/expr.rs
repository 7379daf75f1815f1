use crate::{
    ast::ast::{ArithmeticOperator, ComparisonOperator, Node, NodeKind, UnaryOperator},
    errors::errors::Error,
    lexer::{lexer::parse_date, tokens::TokenKind},
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Node, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected_detailed("expected an expression")),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected()),
        };
        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

/// `rvalue := expression | IF expression THEN expression ELSE expression ENDIF`
pub fn parse_rvalue(parser: &mut Parser) -> Result<Node, Error> {
    if parser.current_token_kind() == TokenKind::If {
        parse_if_expr(parser)
    } else {
        parse_expr(parser, BindingPower::Default)
    }
}

pub fn parse_if_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().position.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Then)?;
    let then_value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Else)?;
    let else_value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::EndIf)?;

    Ok(parser.node(
        start,
        NodeKind::IfExpression {
            condition: Box::new(condition),
            then_value: Box::new(then_value),
            else_value: Box::new(else_value),
        },
    ))
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Node, Error> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Int => {
            let value = token
                .value
                .parse::<i64>()
                .map_err(|_| parser.unexpected_detailed("invalid integer literal"))?;
            parser.advance();
            Ok(parser.node(token.position, NodeKind::IntLiteral { value }))
        }
        TokenKind::Date => {
            let value = parse_date(&token.value)
                .ok_or_else(|| parser.unexpected_detailed("invalid date literal"))?;
            parser.advance();
            Ok(parser.node(token.position, NodeKind::DateLiteral { value }))
        }
        TokenKind::Identifier => {
            parser.advance();

            let attribute = if parser.eat(TokenKind::Apostrophe) {
                let attribute = parser.expect_error(
                    TokenKind::Identifier,
                    Some(parser.unexpected_detailed("expected attribute name after '")),
                )?;
                Some(Box::new(parser.node(
                    attribute.position,
                    NodeKind::ReadAttribute {
                        name: attribute.value,
                    },
                )))
            } else {
                None
            };

            Ok(parser.node(
                token.position,
                NodeKind::Var {
                    name: token.value,
                    attribute,
                },
            ))
        }
        _ => Err(parser.unexpected()),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Node, bp: BindingPower) -> Result<Node, Error> {
    let operator = match parser.advance().kind {
        TokenKind::Plus => ArithmeticOperator::Add,
        TokenKind::Dash => ArithmeticOperator::Subtract,
        TokenKind::Star => ArithmeticOperator::Multiply,
        _ => ArithmeticOperator::Divide,
    };

    let right = parse_expr(parser, bp)?;

    Ok(parser.node(
        left.position.clone(),
        NodeKind::Operation {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
    ))
}

pub fn parse_comparison_expr(
    parser: &mut Parser,
    left: Node,
    bp: BindingPower,
) -> Result<Node, Error> {
    let operator = match parser.advance().kind {
        TokenKind::Equals => ComparisonOperator::Equal,
        _ => ComparisonOperator::Less,
    };

    let right = parse_expr(parser, bp)?;

    Ok(parser.node(
        left.position.clone(),
        NodeKind::Comparison {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
    ))
}

/// `factor := ('+' | '-') atom`
pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Node, Error> {
    let operator_token = parser.advance().clone();
    let operator = if operator_token.kind == TokenKind::Dash {
        UnaryOperator::Minus
    } else {
        UnaryOperator::Plus
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(parser.node(
        operator_token.position,
        NodeKind::UnaryOperation {
            operator,
            operand: Box::new(operand),
        },
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Node, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Parses `'(' (expression (',' expression)*)? ')'`.
pub fn parse_arguments(parser: &mut Parser) -> Result<Vec<Node>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut args = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser, BindingPower::Default)?);
        while parser.eat(TokenKind::Comma) {
            args.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(args)
}

pub fn parse_function_call_expr(parser: &mut Parser) -> Result<Node, Error> {
    let name_token = parser.advance().clone();
    let arguments = parse_arguments(parser)?;

    Ok(parser.node(
        name_token.position,
        NodeKind::FunctionCall {
            name: name_token.value,
            arguments,
        },
    ))
}

pub fn parse_procedure_call_expr(parser: &mut Parser) -> Result<Node, Error> {
    let name_token = parser.advance().clone();
    let arguments = parse_arguments(parser)?;

    Ok(parser.node(
        name_token.position,
        NodeKind::ProcedureCall {
            name: name_token.value,
            arguments,
        },
    ))
}
