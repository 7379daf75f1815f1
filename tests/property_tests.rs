//! Property-based tests for the operator and attribute rules.
//!
//! These use proptest to check laws that must hold for every value, not
//! just the hand-picked cases in the unit tests:
//! 1. Int arithmetic matches exact arithmetic, with floor division
//! 2. Shifting a date by n days and back returns the same date
//! 3. Date differences are antisymmetric
//! 4. Attribute writes are read back unchanged

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use when::{
    ast::ast::ArithmeticOperator,
    errors::errors::RuntimeError,
    evaluator::{
        operations::{arithmetic, read_attribute, write_attribute},
        value::Value,
    },
    lexer::lexer::INT_LIMIT,
};

/// Generate a date far enough from the year range ends to shift by
/// `shift_strategy()` days in either direction.
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (300i32..=9700, 1u32..=12, 1u32..=31).prop_filter_map("valid calendar date", |(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d)
    })
}

fn shift_strategy() -> impl Strategy<Value = i64> {
    -100_000i64..=100_000
}

fn int_strategy() -> impl Strategy<Value = i64> {
    (-INT_LIMIT + 1)..INT_LIMIT
}

fn int(value: i64) -> Value {
    Value::Int(value)
}

fn exact(operator: ArithmeticOperator, left: i64, right: i64) -> i128 {
    let (left, right) = (i128::from(left), i128::from(right));
    match operator {
        ArithmeticOperator::Add => left + right,
        ArithmeticOperator::Subtract => left - right,
        ArithmeticOperator::Multiply => left * right,
        ArithmeticOperator::Divide => {
            let quotient = left / right;
            if left % right != 0 && (left < 0) != (right < 0) {
                quotient - 1
            } else {
                quotient
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_int_arithmetic_is_exact_or_overflows(
        left in int_strategy(),
        right in int_strategy(),
        operator in prop_oneof![
            Just(ArithmeticOperator::Add),
            Just(ArithmeticOperator::Subtract),
            Just(ArithmeticOperator::Multiply),
            Just(ArithmeticOperator::Divide),
        ],
    ) {
        prop_assume!(!(operator == ArithmeticOperator::Divide && right == 0));

        let expected = exact(operator, left, right);
        let limit = i128::from(INT_LIMIT);
        match arithmetic(operator, int(left), int(right)) {
            Ok(Value::Int(result)) => {
                prop_assert_eq!(i128::from(result), expected);
                prop_assert!(expected > -limit && expected < limit);
            }
            Err(RuntimeError::IntegerOverflow { .. }) => {
                prop_assert!(expected <= -limit || expected >= limit);
            }
            other => prop_assert!(false, "unexpected result {:?}", other),
        }
    }

    #[test]
    fn prop_floor_division_remainder_follows_divisor(
        left in int_strategy(),
        right in int_strategy().prop_filter("non-zero divisor", |value| *value != 0),
    ) {
        let Ok(Value::Int(quotient)) = arithmetic(ArithmeticOperator::Divide, int(left), int(right)) else {
            return Err(TestCaseError::fail("division failed"));
        };

        let remainder = i128::from(left) - i128::from(quotient) * i128::from(right);
        prop_assert!(remainder.abs() < i128::from(right).abs());
        prop_assert!(remainder == 0 || (remainder < 0) == (right < 0));
    }

    #[test]
    fn prop_date_shift_round_trips(date in date_strategy(), days in shift_strategy()) {
        let start = Value::Date(date);
        let shifted = arithmetic(ArithmeticOperator::Add, start.clone(), int(days)).unwrap();

        prop_assert_eq!(
            arithmetic(ArithmeticOperator::Subtract, shifted.clone(), int(days)),
            Ok(start.clone())
        );
        prop_assert_eq!(arithmetic(ArithmeticOperator::Subtract, shifted, start), Ok(int(days)));
    }

    #[test]
    fn prop_date_difference_is_antisymmetric(first in date_strategy(), second in date_strategy()) {
        let forward = arithmetic(ArithmeticOperator::Subtract, Value::Date(first), Value::Date(second));
        let backward = arithmetic(ArithmeticOperator::Subtract, Value::Date(second), Value::Date(first));

        let (Ok(Value::Int(forward)), Ok(Value::Int(backward))) = (forward, backward) else {
            return Err(TestCaseError::fail("date difference failed"));
        };
        prop_assert_eq!(forward, -backward);
        prop_assert_eq!(forward == 0, first == second);
    }

    #[test]
    fn prop_attribute_write_reads_back(
        date in date_strategy(),
        year in 1i64..=9999,
        month in 1i64..=12,
        day in 1i64..=28,
    ) {
        // Day first, so every month and year below stays valid.
        let mut value = Value::Date(date);
        for (attribute, field) in [("day", day), ("month", month), ("year", year)] {
            value = write_attribute(attribute, &value, &int(field)).unwrap();
            prop_assert_eq!(read_attribute(attribute, &value), Ok(int(field)));
        }

        let Value::Date(written) = value else {
            return Err(TestCaseError::fail("attribute write produced a non-date"));
        };
        prop_assert_eq!(
            (written.year(), written.month(), written.day()),
            (year as i32, month as u32, day as u32)
        );
    }

    #[test]
    fn prop_writing_current_field_is_identity(date in date_strategy()) {
        let value = Value::Date(date);
        for attribute in ["year", "month", "day"] {
            let current = read_attribute(attribute, &value).unwrap();
            prop_assert_eq!(write_attribute(attribute, &value, &current), Ok(value.clone()));
        }
    }
}
