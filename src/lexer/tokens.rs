use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Position;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("VAR", TokenKind::Var);
        map.insert("IS", TokenKind::Is);
        map.insert("IF", TokenKind::If);
        map.insert("THEN", TokenKind::Then);
        map.insert("ELSE", TokenKind::Else);
        map.insert("ENDIF", TokenKind::EndIf);
        map.insert("WHILE", TokenKind::While);
        map.insert("DO", TokenKind::Do);
        map.insert("ENDWHILE", TokenKind::EndWhile);
        map.insert("PROCEDURE", TokenKind::Procedure);
        map.insert("FUNCTION", TokenKind::Function);
        map.insert("RETURN", TokenKind::Return);
        map.insert("PRINT", TokenKind::Print);
        map.insert("END", TokenKind::End);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Int,
    Date,
    String,
    Identifier,
    FuncIdentifier,
    ProcIdentifier,

    OpenSquare,
    CloseSquare,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // :=
    Equals,     // =
    Less,       // <

    Apostrophe,
    Semicolon,
    Comma,
    Dot,

    Plus,
    Dash,
    Slash,
    Star,

    // Reserved
    Var,
    Is,
    If,
    Then,
    Else,
    EndIf,
    While,
    Do,
    EndWhile,
    Procedure,
    Function,
    Return,
    Print,
    End,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: Position,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    /// One-line rendering used by the `--tokens` dump.
    pub fn debug(&self) -> String {
        if self.is_one_of_many(&[
            TokenKind::String,
            TokenKind::Identifier,
            TokenKind::FuncIdentifier,
            TokenKind::ProcIdentifier,
            TokenKind::Int,
            TokenKind::Date,
        ]) {
            format!("{}: {} ({})", self.position.line(), self.kind, self.value)
        } else {
            format!("{}: {} ()", self.position.line(), self.kind)
        }
    }
}
