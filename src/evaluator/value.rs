use std::fmt::Display;

use chrono::NaiveDate;

/// A runtime value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Always within `(-2^42, 2^42)`.
    Int(i64),
    Date(NaiveDate),
    Str(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Date(_) => "date",
            Value::Str(_) => "string",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            Value::Str(value) => write!(f, "{}", value),
        }
    }
}
