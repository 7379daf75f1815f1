use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// Which stage of the pipeline produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lexical,
    Syntax,
    Semantic,
    Runtime,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Lexical => write!(f, "lexical"),
            Phase::Syntax => write!(f, "syntax"),
            Phase::Semantic => write!(f, "semantic"),
            Phase::Runtime => write!(f, "runtime"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: impl Into<ErrorImpl>, position: Position) -> Self {
        Error {
            internal_error: error_impl.into(),
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    /// Source line the error was reported at.
    pub fn get_line(&self) -> u32 {
        self.position.0
    }

    pub fn get_internal(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn phase(&self) -> Phase {
        match &self.internal_error {
            ErrorImpl::Lexical(_) => Phase::Lexical,
            ErrorImpl::Syntax(_) => Phase::Syntax,
            ErrorImpl::Semantic(_) => Phase::Semantic,
            ErrorImpl::Runtime(_) => Phase::Runtime,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::Lexical(error) => match error {
                LexicalError::UnrecognisedToken { .. } => "UnrecognisedToken",
                LexicalError::IncorrectDate { .. } => "IncorrectDate",
                LexicalError::IntegerTooLarge { .. } => "IntegerTooLarge",
            },
            ErrorImpl::Syntax(error) => match error {
                SyntaxError::UnexpectedToken { .. } => "UnexpectedToken",
                SyntaxError::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
                SyntaxError::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            },
            ErrorImpl::Semantic(error) => match error {
                SemanticError::VariableRedefined { .. } => "VariableRedefined",
                SemanticError::ArgumentRedefined { .. } => "ArgumentRedefined",
                SemanticError::CallableRedefined { .. } => "CallableRedefined",
                SemanticError::UndefinedVariable { .. } => "UndefinedVariable",
                SemanticError::UndefinedCallable { .. } => "UndefinedCallable",
                SemanticError::ArityMismatch { .. } => "ArityMismatch",
                SemanticError::UnwritableAttribute { .. } => "UnwritableAttribute",
                SemanticError::UnreadableAttribute { .. } => "UnreadableAttribute",
                SemanticError::InvalidReturnType { .. } => "InvalidReturnType",
                SemanticError::InvalidParameterType { .. } => "InvalidParameterType",
                SemanticError::MisplacedReturn => "MisplacedReturn",
                SemanticError::ReturnInVoidProcedure { .. } => "ReturnInVoidProcedure",
                SemanticError::VoidProcedureInExpression { .. } => "VoidProcedureInExpression",
                SemanticError::ValuedProcedureAsStatement { .. } => "ValuedProcedureAsStatement",
            },
            ErrorImpl::Runtime(error) => match error {
                RuntimeError::UndefinedOperation { .. } => "UndefinedOperation",
                RuntimeError::UndefinedComparison { .. } => "UndefinedComparison",
                RuntimeError::UndefinedUnary { .. } => "UndefinedUnary",
                RuntimeError::DivisionByZero => "DivisionByZero",
                RuntimeError::IntegerOverflow { .. } => "IntegerOverflow",
                RuntimeError::AttributeOnNonDate { .. } => "AttributeOnNonDate",
                RuntimeError::InvalidAttributeValue { .. } => "InvalidAttributeValue",
                RuntimeError::InvalidDate { .. } => "InvalidDate",
                RuntimeError::DateOutOfRange => "DateOutOfRange",
                RuntimeError::NonIntegerCondition { .. } => "NonIntegerCondition",
                RuntimeError::MissingReturn { .. } => "MissingReturn",
                RuntimeError::VoidValue { .. } => "VoidValue",
                RuntimeError::CallDepthExceeded { .. } => "CallDepthExceeded",
                RuntimeError::Output { .. } => "Output",
                RuntimeError::Internal { .. } => "Internal",
            },
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::Lexical(LexicalError::UnrecognisedToken { .. }) => ErrorTip::None,
            ErrorImpl::Lexical(LexicalError::IntegerTooLarge { token }) => ErrorTip::Suggestion(
                format!("Invalid number: `{}`, integers must be less than 2^42", token),
            ),
            ErrorImpl::Syntax(SyntaxError::UnexpectedToken { token }) => ErrorTip::Suggestion(
                format!("Unexpected token: `{}`, did you miss a semicolon?", token),
            ),
            ErrorImpl::Semantic(SemanticError::ValuedProcedureAsStatement { name }) => {
                ErrorTip::Suggestion(format!(
                    "`{}` returns a value, use it in a PRINT or RETURN such as `PRINT {}(...)`",
                    name, name
                ))
            }
            ErrorImpl::Runtime(RuntimeError::Internal { .. }) => ErrorTip::Suggestion(format!(
                "{} (this is a bug in the interpreter)",
                self.internal_error
            )),
            other => ErrorTip::Suggestion(other.to_string()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: Error: {}", self.position.0, self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexicalError {
    #[error("illegal character {token:?}")]
    UnrecognisedToken { token: String },
    #[error("incorrect date {token:?}")]
    IncorrectDate { token: String },
    #[error("integer value {token} must be less than 2^42")]
    IntegerTooLarge { token: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("syntax error (token: {token:?})")]
    UnexpectedToken { token: String },
    #[error("syntax error, {message} (token: {token:?})")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("redefined variable {name:?} (earlier definition on line {earlier_line})")]
    VariableRedefined { name: String, earlier_line: u32 },
    #[error("multiple arguments with the same name {name:?} (earlier definition on line {earlier_line})")]
    ArgumentRedefined { name: String, earlier_line: u32 },
    #[error("redefined {name:?} (earlier definition on line {earlier_line})")]
    CallableRedefined { name: String, earlier_line: u32 },
    #[error("undefined variable {name:?}")]
    UndefinedVariable { name: String },
    #[error("call to undefined function/procedure {name:?}")]
    UndefinedCallable { name: String },
    #[error("{name:?} needs {expected} parameter(s) but is called with {received}")]
    ArityMismatch {
        name: String,
        expected: usize,
        received: usize,
    },
    #[error("{attribute:?} is not a writable attribute")]
    UnwritableAttribute { attribute: String },
    #[error("{attribute:?} is not a readable attribute")]
    UnreadableAttribute { attribute: String },
    #[error("return type of a {callable} must be either 'int' or 'date', found {type_:?}")]
    InvalidReturnType { callable: &'static str, type_: String },
    #[error("type of parameter {name:?} must be either 'int' or 'date', found {type_:?}")]
    InvalidParameterType { name: String, type_: String },
    #[error("a return statement cannot appear inside a while or if statement")]
    MisplacedReturn,
    #[error("procedure {name:?} has no return type, so it cannot contain a return statement")]
    ReturnInVoidProcedure { name: String },
    #[error("procedure {name:?} has no return type, so it cannot be called inside PRINT or RETURN")]
    VoidProcedureInExpression { name: String },
    #[error("procedure {name:?} has a return type, so it can only be called inside PRINT or RETURN")]
    ValuedProcedureAsStatement { name: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("operation '{operator}' is undefined between types {left} and {right}")]
    UndefinedOperation {
        operator: String,
        left: &'static str,
        right: &'static str,
    },
    #[error("comparison '{operator}' is undefined between types {left} and {right}")]
    UndefinedComparison {
        operator: String,
        left: &'static str,
        right: &'static str,
    },
    #[error("unary '{operator}' is undefined for type {operand}")]
    UndefinedUnary {
        operator: String,
        operand: &'static str,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer result of '{operator}' does not fit in 42 bits")]
    IntegerOverflow { operator: String },
    #[error("attribute {attribute:?} needs a date, found {type_}")]
    AttributeOnNonDate {
        attribute: String,
        type_: &'static str,
    },
    #[error("attribute {attribute:?} can only be set to an int, found {type_}")]
    InvalidAttributeValue {
        attribute: String,
        type_: &'static str,
    },
    #[error("setting {attribute:?} to {value} does not give a valid date")]
    InvalidDate { attribute: String, value: i64 },
    #[error("date arithmetic left the supported calendar range")]
    DateOutOfRange,
    #[error("condition must be an int, found {type_}")]
    NonIntegerCondition { type_: &'static str },
    #[error("procedure {name:?} ended without returning a value")]
    MissingReturn { name: String },
    #[error("{name:?} does not produce a value")]
    VoidValue { name: String },
    #[error("maximum call depth of {limit} exceeded")]
    CallDepthExceeded { limit: usize },
    #[error("could not write output: {message}")]
    Output { message: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}
