//! Operator and attribute semantics over [`Value`]s.
//!
//! Every function here is position-free; the evaluator attaches the line
//! of the offending node to any error.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate, TimeDelta};

use crate::{
    ast::ast::{ArithmeticOperator, ComparisonOperator, UnaryOperator},
    errors::errors::RuntimeError,
    lexer::lexer::{INT_LIMIT, YEAR_RANGE},
};

use super::value::Value;

fn bounded_int(result: Option<i64>, operator: ArithmeticOperator) -> Result<Value, RuntimeError> {
    match result {
        Some(value) if value > -INT_LIMIT && value < INT_LIMIT => Ok(Value::Int(value)),
        _ => Err(RuntimeError::IntegerOverflow {
            operator: operator.to_string(),
        }),
    }
}

/// Integer division rounding towards negative infinity.
fn floor_div(left: i64, right: i64) -> i64 {
    let quotient = left / right;
    if left % right != 0 && (left < 0) != (right < 0) {
        quotient - 1
    } else {
        quotient
    }
}

fn shift_date(date: NaiveDate, days: i64) -> Result<Value, RuntimeError> {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .filter(|date| YEAR_RANGE.contains(&date.year()))
        .map(Value::Date)
        .ok_or(RuntimeError::DateOutOfRange)
}

pub fn arithmetic(
    operator: ArithmeticOperator,
    left: Value,
    right: Value,
) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(left), Value::Int(right)) => match operator {
            ArithmeticOperator::Add => bounded_int(left.checked_add(right), operator),
            ArithmeticOperator::Subtract => bounded_int(left.checked_sub(right), operator),
            ArithmeticOperator::Multiply => bounded_int(left.checked_mul(right), operator),
            ArithmeticOperator::Divide => {
                if right == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                bounded_int(Some(floor_div(left, right)), operator)
            }
        },
        (Value::Date(date), Value::Int(days)) if operator == ArithmeticOperator::Add => {
            shift_date(date, days)
        }
        (Value::Date(date), Value::Int(days)) if operator == ArithmeticOperator::Subtract => {
            shift_date(date, -days)
        }
        (Value::Date(left), Value::Date(right)) if operator == ArithmeticOperator::Subtract => {
            Ok(Value::Int(left.signed_duration_since(right).num_days()))
        }
        (left, right) => Err(RuntimeError::UndefinedOperation {
            operator: operator.to_string(),
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}

/// Compares two values of the same type, giving `1` for true and `0` for false.
pub fn comparison(
    operator: ComparisonOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    let ordering = match (left, right) {
        (Value::Int(left), Value::Int(right)) => left.cmp(right),
        (Value::Date(left), Value::Date(right)) => left.cmp(right),
        (Value::Str(left), Value::Str(right)) => left.cmp(right),
        _ => {
            return Err(RuntimeError::UndefinedComparison {
                operator: operator.to_string(),
                left: left.type_name(),
                right: right.type_name(),
            })
        }
    };

    let holds = match operator {
        ComparisonOperator::Equal => ordering == Ordering::Equal,
        ComparisonOperator::Less => ordering == Ordering::Less,
    };

    Ok(Value::Int(i64::from(holds)))
}

pub fn unary(operator: UnaryOperator, operand: Value) -> Result<Value, RuntimeError> {
    match (operator, operand) {
        (UnaryOperator::Plus, Value::Int(value)) => Ok(Value::Int(value)),
        (UnaryOperator::Minus, Value::Int(value)) => Ok(Value::Int(-value)),
        (operator, operand) => Err(RuntimeError::UndefinedUnary {
            operator: operator.to_string(),
            operand: operand.type_name(),
        }),
    }
}

fn expect_date(attribute: &str, value: &Value) -> Result<NaiveDate, RuntimeError> {
    match value {
        Value::Date(date) => Ok(*date),
        other => Err(RuntimeError::AttributeOnNonDate {
            attribute: attribute.to_string(),
            type_: other.type_name(),
        }),
    }
}

/// Reads `year`, `month`, `day`, `weekday` (Monday is 0) or `weeknum` (ISO week).
pub fn read_attribute(attribute: &str, value: &Value) -> Result<Value, RuntimeError> {
    let date = expect_date(attribute, value)?;

    let result = match attribute {
        "year" => i64::from(date.year()),
        "month" => i64::from(date.month()),
        "day" => i64::from(date.day()),
        "weekday" => i64::from(date.weekday().num_days_from_monday()),
        "weeknum" => i64::from(date.iso_week().week()),
        other => {
            return Err(RuntimeError::Internal {
                message: format!("{:?} is not a readable attribute", other),
            })
        }
    };

    Ok(Value::Int(result))
}

/// Returns `value` with one calendar field replaced. The result must be a
/// valid date; nothing is clamped.
pub fn write_attribute(
    attribute: &str,
    value: &Value,
    new_value: &Value,
) -> Result<Value, RuntimeError> {
    let date = expect_date(attribute, value)?;
    let field = match new_value {
        Value::Int(field) => *field,
        other => {
            return Err(RuntimeError::InvalidAttributeValue {
                attribute: attribute.to_string(),
                type_: other.type_name(),
            })
        }
    };

    let updated = match attribute {
        "year" => i32::try_from(field)
            .ok()
            .and_then(|year| date.with_year(year)),
        "month" => u32::try_from(field)
            .ok()
            .and_then(|month| date.with_month(month)),
        "day" => u32::try_from(field).ok().and_then(|day| date.with_day(day)),
        other => {
            return Err(RuntimeError::Internal {
                message: format!("{:?} is not a writable attribute", other),
            })
        }
    };

    updated
        .filter(|date| YEAR_RANGE.contains(&date.year()))
        .map(Value::Date)
        .ok_or(RuntimeError::InvalidDate {
            attribute: attribute.to_string(),
            value: field,
        })
}
