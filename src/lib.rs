#![allow(clippy::module_inception)]

use std::{fs, io::Write, path::Path, rc::Rc};

use crate::{
    ast::ast::Node,
    config::Config,
    errors::errors::{Error, ErrorTip},
    evaluator::evaluator::run_with,
    lexer::lexer::tokenize,
    parser::parser::parse,
    semantics::validate,
};

pub mod ast;
pub mod config;
pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod semantics;

extern crate regex;

/// A source line together with the file it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }

    pub fn line(&self) -> u32 {
        self.0
    }
}

/// Lexes, parses and validates `source`, returning the tree ready for evaluation.
pub fn compile(source: &str, file: Option<String>) -> Result<(Node, semantics::symbol_table::SymbolTable), Error> {
    let file = Rc::new(file.unwrap_or_else(|| String::from("shell")));
    let tokens = tokenize(source, Rc::clone(&file))?;
    let tree = parse(tokens, file)?;
    let symbols = validate(&tree)?;
    Ok((tree, symbols))
}

/// Runs the whole pipeline over `source`, writing program output to `out`.
pub fn interpret<W: Write>(
    source: &str,
    file: Option<String>,
    config: &Config,
    out: &mut W,
) -> Result<(), Error> {
    let (tree, mut symbols) = compile(source, file)?;
    run_with(&tree, &mut symbols, config, out)
}

/// Returns the text of line `line` (1-based) of `file`, if it exists.
pub fn get_line_at_position(file: &Path, line: u32) -> Option<String> {
    let content = fs::read_to_string(file).ok()?;
    if line == 0 {
        return None;
    }

    content
        .split_inclusive('\n')
        .nth(line as usize - 1)
        .map(|text| text.trim_end_matches(|c: char| c == '\n' || c == '\r').to_string())
}

pub fn display_error(error: &Error, file: &Path) {
    /*
        Error: UndefinedVariable (undefined variable "y")
        -> dates.when
          |
        3 | PRINT y;
          |
    */

    let line = error.get_position().line();
    let line_str = line.to_string();
    let padding = line_str.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", file.as_os_str().to_string_lossy());
    eprintln!("{:>padding$}", "|");

    match get_line_at_position(file, line) {
        Some(line_text) => {
            let (line_text_removed, _) = remove_starting_whitespace(&line_text);
            eprintln!("{} | {}", line_str, line_text_removed.trim());
        }
        None => eprintln!("{} | {}", line_str, error),
    }

    eprintln!("{:>padding$}", "|");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
