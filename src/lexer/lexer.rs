use std::rc::Rc;

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, LexicalError},
    Position, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Integer literals must stay below this bound.
pub const INT_LIMIT: i64 = 1 << 42;

/// Years a date may carry, so every date prints as `YYYY-MM-DD`.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// Parses a `YYYY-MM-DD` date literal, rejecting impossible days and years
/// outside [`YEAR_RANGE`].
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .filter(|date| YEAR_RANGE.contains(&date.year()))
}

pub type RegexHandler = fn(&mut Lexer, &str) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // Tried in order; the first pattern matching at the current position wins.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^(?s)#%.*?%#").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r#"^"[^"]*""#).unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap(), handler: date_handler },
        RegexPattern { regex: Regex::new(r"^\d+").unwrap(), handler: int_handler },
        RegexPattern { regex: Regex::new(r"^[a-z][a-zA-Z0-9_]*").unwrap(), handler: ident_handler },
        RegexPattern { regex: Regex::new(r"^[A-Z][a-z0-9_]+").unwrap(), handler: func_ident_handler },
        RegexPattern { regex: Regex::new(r"^[A-Z]{2,}").unwrap(), handler: proc_ident_handler },
        RegexPattern { regex: Regex::new(r"^:=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, ":=") },
        RegexPattern { regex: Regex::new(r"^\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new(r"^\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new(r"^\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenSquare, "[") },
        RegexPattern { regex: Regex::new(r"^\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseSquare, "]") },
        RegexPattern { regex: Regex::new(r"^\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new(r"^\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        RegexPattern { regex: Regex::new(r"^'").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Apostrophe, "'") },
        RegexPattern { regex: Regex::new(r"^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new(r"^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new(r"^\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
        RegexPattern { regex: Regex::new(r"^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "=") },
        RegexPattern { regex: Regex::new(r"^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new(r"^\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new(r"^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new(r"^\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new(r"^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
    ];
}

pub struct Lexer<'a> {
    tokens: Vec<Token>,
    source: &'a str,
    pos: usize,
    line: u32,
    file: Rc<String>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: Rc<String>) -> Lexer<'a> {
        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            line: 1,
            file,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    /// Advances past `text`, counting the newlines it contains.
    pub fn consume(&mut self, text: &str) {
        self.line += text.matches('\n').count() as u32;
        self.advance_n(text.len());
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn position(&self) -> Position {
        Position(self.line, Rc::clone(&self.file))
    }

    pub fn remainder(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn skip_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    lexer.consume(matched);
    Ok(())
}

fn string_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    // Crop the quotation marks
    let literal = &matched[1..matched.len() - 1];
    lexer.push(MK_TOKEN!(TokenKind::String, literal.to_string(), lexer.position()));
    lexer.consume(matched);
    Ok(())
}

fn date_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    if parse_date(matched).is_none() {
        return Err(Error::new(
            LexicalError::IncorrectDate { token: matched.to_string() },
            lexer.position(),
        ));
    }

    lexer.push(MK_TOKEN!(TokenKind::Date, matched.to_string(), lexer.position()));
    lexer.advance_n(matched.len());
    Ok(())
}

fn int_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    match matched.parse::<i64>() {
        Ok(value) if value < INT_LIMIT => {}
        _ => {
            return Err(Error::new(
                LexicalError::IntegerTooLarge { token: matched.to_string() },
                lexer.position(),
            ))
        }
    }

    lexer.push(MK_TOKEN!(TokenKind::Int, matched.to_string(), lexer.position()));
    lexer.advance_n(matched.len());
    Ok(())
}

fn ident_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    lexer.push(MK_TOKEN!(TokenKind::Identifier, matched.to_string(), lexer.position()));
    lexer.advance_n(matched.len());
    Ok(())
}

fn func_ident_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    lexer.push(MK_TOKEN!(TokenKind::FuncIdentifier, matched.to_string(), lexer.position()));
    lexer.advance_n(matched.len());
    Ok(())
}

fn proc_ident_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::ProcIdentifier);

    lexer.push(MK_TOKEN!(kind, matched.to_string(), lexer.position()));
    lexer.advance_n(matched.len());
    Ok(())
}

/// Splits `source` into tokens, ending with a single `EOF` token.
pub fn tokenize(source: &str, file: Rc<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let remainder = lex.remainder();
        let pattern = PATTERNS
            .iter()
            .find_map(|pattern| pattern.regex.find(remainder).map(|m| (pattern.handler, m.as_str())));

        match pattern {
            Some((handler, matched)) => handler(&mut lex, matched)?,
            None => {
                let token = remainder.chars().next().map(String::from).unwrap_or_default();
                return Err(Error::new(
                    LexicalError::UnrecognisedToken { token },
                    lex.position(),
                ));
            }
        }
    }

    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), lex.position()));
    tracing::debug!(count = lex.tokens.len(), "tokenized source");
    Ok(lex.tokens)
}
