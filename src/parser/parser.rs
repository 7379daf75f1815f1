//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! Expressions are parsed Pratt-style through NUD/LED handler tables;
//! statements are dispatched on their first token through a statement
//! table, and top-level definitions are parsed in `stmt.rs`.

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::ast::{Node, NodeId, NodeKind},
    errors::errors::{Error, SyntaxError},
    lexer::tokens::{Token, TokenKind},
    Position, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::{parse_definition, parse_stmt},
};

/// The main parser structure that maintains parsing state.
///
/// Holds the token stream, the handler lookup tables and the counter used
/// to hand out node ids.
pub struct Parser {
    /// The list of tokens to parse, always terminated by `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Counter for generating unique node ids
    current_id: NodeId,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Reference-counted string containing the source file name
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let line = tokens.last().map(|token| token.position.line()).unwrap_or(1);
            tokens.push(MK_TOKEN!(
                TokenKind::EOF,
                String::from("EOF"),
                Position(line, file)
            ));
        }

        Parser {
            tokens,
            pos: 0,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            current_id: 0,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The parser never moves past the final `EOF` token.
    pub fn advance(&mut self) -> &Token {
        let previous = self.pos;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[previous]
    }

    /// Builds the error for an unexpected current token.
    pub fn unexpected(&self) -> Error {
        let token = self.current_token();
        let error = if token.kind == TokenKind::EOF {
            SyntaxError::UnexpectedEndOfInput
        } else {
            SyntaxError::UnexpectedToken {
                token: token.value.clone(),
            }
        };
        Error::new(error, token.position.clone())
    }

    /// Like [`Parser::unexpected`], with a description of what was expected.
    pub fn unexpected_detailed(&self, message: &str) -> Error {
        let token = self.current_token();
        if token.kind == TokenKind::EOF {
            return Error::new(SyntaxError::UnexpectedEndOfInput, token.position.clone());
        }
        Error::new(
            SyntaxError::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: message.to_string(),
            },
            token.position.clone(),
        )
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// Returns the consumed token if the current token matches.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(self.unexpected()),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Consumes the current token if it is of the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current_token_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Unlike `led`, this leaves the binding power table alone so a token
    /// can be both a prefix and an infix operator (`-`).
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Advances the internal id counter and returns the previous value.
    pub fn advance_id(&mut self) -> NodeId {
        let id = self.current_id;
        self.current_id += 1;
        id
    }

    /// Creates a node with a fresh id.
    pub fn node(&mut self, position: Position, kind: NodeKind) -> Node {
        Node::new(self.advance_id(), position, kind)
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().position.clone()
    }
}

/// Parses a stream of tokens into a `Program` node.
///
/// Definitions (`VAR`, `FUNCTION`, `PROCEDURE`) come first, then the
/// top-level statements. Parsing stops at the first syntax error.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Node, Error> {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);

    let start = parser.get_position();

    let mut definitions = vec![];
    while matches!(
        parser.current_token_kind(),
        TokenKind::Var | TokenKind::Function | TokenKind::Procedure
    ) {
        definitions.push(parse_definition(&mut parser)?);
        parser.eat(TokenKind::Semicolon);
    }

    let mut statements = vec![];
    while parser.has_tokens() {
        statements.push(parse_stmt(&mut parser)?);
    }

    tracing::debug!(
        definitions = definitions.len(),
        statements = statements.len(),
        "parsed program"
    );

    Ok(parser.node(
        start,
        NodeKind::Program {
            definitions,
            statements,
        },
    ))
}
