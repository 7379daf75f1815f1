//! Unit tests for the evaluator.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use crate::{
    ast::ast::{ArithmeticOperator, ComparisonOperator, UnaryOperator},
    config::Config,
    errors::errors::{Error, ErrorImpl, RuntimeError},
    interpret,
};

use super::{
    operations::{arithmetic, comparison, read_attribute, unary, write_attribute},
    value::Value,
};

fn date(year: i32, month: u32, day: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(year, month, day).unwrap())
}

fn run_with_config(source: &str, config: &Config) -> Result<String, Error> {
    let mut out = Vec::new();
    interpret(source, Some("test.when".to_string()), config, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn run(source: &str) -> String {
    run_with_config(source, &Config::default()).unwrap()
}

fn runtime_error(source: &str) -> (RuntimeError, u32) {
    let error = run_with_config(source, &Config::default()).unwrap_err();
    match error.get_internal() {
        ErrorImpl::Runtime(runtime) => (runtime.clone(), error.get_line()),
        other => panic!("expected a runtime error, got {:?}", other),
    }
}

#[test]
fn test_value_display() {
    assert_eq!(Value::Int(-3).to_string(), "-3");
    assert_eq!(date(2020, 3, 1).to_string(), "2020-03-01");
    assert_eq!(Value::Str("hi there".to_string()).to_string(), "hi there");
}

#[test]
fn test_int_arithmetic() {
    use ArithmeticOperator::*;

    assert_eq!(arithmetic(Add, Value::Int(2), Value::Int(3)), Ok(Value::Int(5)));
    assert_eq!(arithmetic(Subtract, Value::Int(2), Value::Int(3)), Ok(Value::Int(-1)));
    assert_eq!(arithmetic(Multiply, Value::Int(4), Value::Int(3)), Ok(Value::Int(12)));
    assert_eq!(arithmetic(Divide, Value::Int(7), Value::Int(2)), Ok(Value::Int(3)));
    assert_eq!(arithmetic(Divide, Value::Int(-7), Value::Int(2)), Ok(Value::Int(-4)));
    assert_eq!(arithmetic(Divide, Value::Int(-7), Value::Int(-2)), Ok(Value::Int(3)));
    assert_eq!(
        arithmetic(Divide, Value::Int(1), Value::Int(0)),
        Err(RuntimeError::DivisionByZero)
    );
}

#[test]
fn test_int_overflow() {
    let large = Value::Int((1 << 42) - 1);

    assert_eq!(
        arithmetic(ArithmeticOperator::Add, large.clone(), Value::Int(1)),
        Err(RuntimeError::IntegerOverflow {
            operator: "+".to_string()
        })
    );
    assert_eq!(
        arithmetic(ArithmeticOperator::Multiply, large.clone(), large),
        Err(RuntimeError::IntegerOverflow {
            operator: "*".to_string()
        })
    );
}

#[test]
fn test_date_arithmetic() {
    use ArithmeticOperator::*;

    assert_eq!(arithmetic(Add, date(2020, 1, 31), Value::Int(1)), Ok(date(2020, 2, 1)));
    assert_eq!(arithmetic(Subtract, date(2020, 3, 1), Value::Int(1)), Ok(date(2020, 2, 29)));
    assert_eq!(arithmetic(Add, date(2020, 3, 1), Value::Int(-1)), Ok(date(2020, 2, 29)));
    assert_eq!(arithmetic(Subtract, date(2021, 1, 1), date(2020, 1, 1)), Ok(Value::Int(366)));
    assert_eq!(arithmetic(Subtract, date(2020, 1, 1), date(2021, 1, 1)), Ok(Value::Int(-366)));
}

#[test]
fn test_date_shift_inverts() {
    let start = date(2019, 12, 25);
    for days in [0, 1, 7, 59, 365, 1000] {
        let shifted = arithmetic(ArithmeticOperator::Add, start.clone(), Value::Int(days)).unwrap();
        let back = arithmetic(ArithmeticOperator::Subtract, shifted.clone(), Value::Int(days)).unwrap();
        assert_eq!(back, start);
        assert_eq!(
            arithmetic(ArithmeticOperator::Subtract, shifted, start.clone()),
            Ok(Value::Int(days))
        );
    }
}

#[test]
fn test_date_out_of_range() {
    assert_eq!(
        arithmetic(ArithmeticOperator::Add, date(2020, 1, 1), Value::Int((1 << 42) - 1)),
        Err(RuntimeError::DateOutOfRange)
    );
}

#[test]
fn test_date_arithmetic_stays_within_four_digit_years() {
    use ArithmeticOperator::*;

    assert_eq!(arithmetic(Subtract, date(1, 1, 2), Value::Int(1)), Ok(date(1, 1, 1)));
    assert_eq!(
        arithmetic(Subtract, date(1, 1, 1), Value::Int(1)),
        Err(RuntimeError::DateOutOfRange)
    );
    assert_eq!(arithmetic(Add, date(9999, 12, 30), Value::Int(1)), Ok(date(9999, 12, 31)));
    assert_eq!(
        arithmetic(Add, date(9999, 12, 31), Value::Int(1)),
        Err(RuntimeError::DateOutOfRange)
    );
}

#[test]
fn test_year_write_outside_four_digits() {
    let start = date(2020, 3, 1);

    for year in [0, -1, 10000] {
        assert_eq!(
            write_attribute("year", &start, &Value::Int(year)),
            Err(RuntimeError::InvalidDate {
                attribute: "year".to_string(),
                value: year
            })
        );
    }
    assert_eq!(write_attribute("year", &start, &Value::Int(9999)), Ok(date(9999, 3, 1)));
}

#[test]
fn test_undefined_operations() {
    use ArithmeticOperator::*;

    assert_eq!(
        arithmetic(Multiply, date(2020, 1, 1), Value::Int(2)),
        Err(RuntimeError::UndefinedOperation {
            operator: "*".to_string(),
            left: "date",
            right: "int"
        })
    );
    assert_eq!(
        arithmetic(Add, date(2020, 1, 1), date(2020, 1, 2)),
        Err(RuntimeError::UndefinedOperation {
            operator: "+".to_string(),
            left: "date",
            right: "date"
        })
    );
    assert_eq!(
        arithmetic(Add, Value::Int(1), date(2020, 1, 2)),
        Err(RuntimeError::UndefinedOperation {
            operator: "+".to_string(),
            left: "int",
            right: "date"
        })
    );
}

#[test]
fn test_comparisons() {
    use ComparisonOperator::*;

    assert_eq!(comparison(Equal, &Value::Int(2), &Value::Int(2)), Ok(Value::Int(1)));
    assert_eq!(comparison(Less, &Value::Int(2), &Value::Int(2)), Ok(Value::Int(0)));
    assert_eq!(comparison(Less, &date(2020, 1, 1), &date(2020, 1, 2)), Ok(Value::Int(1)));
    assert_eq!(
        comparison(Less, &Value::Str("a".to_string()), &Value::Str("b".to_string())),
        Ok(Value::Int(1))
    );
    assert_eq!(
        comparison(Equal, &Value::Int(1), &date(2020, 1, 1)),
        Err(RuntimeError::UndefinedComparison {
            operator: "=".to_string(),
            left: "int",
            right: "date"
        })
    );
}

#[test]
fn test_unary() {
    assert_eq!(unary(UnaryOperator::Minus, Value::Int(4)), Ok(Value::Int(-4)));
    assert_eq!(unary(UnaryOperator::Plus, Value::Int(4)), Ok(Value::Int(4)));
    assert_eq!(
        unary(UnaryOperator::Minus, date(2020, 1, 1)),
        Err(RuntimeError::UndefinedUnary {
            operator: "-".to_string(),
            operand: "date"
        })
    );
}

#[test]
fn test_read_attributes() {
    // 2021-01-04 is the Monday of ISO week 1.
    let monday = date(2021, 1, 4);

    assert_eq!(read_attribute("year", &monday), Ok(Value::Int(2021)));
    assert_eq!(read_attribute("month", &monday), Ok(Value::Int(1)));
    assert_eq!(read_attribute("day", &monday), Ok(Value::Int(4)));
    assert_eq!(read_attribute("weekday", &monday), Ok(Value::Int(0)));
    assert_eq!(read_attribute("weeknum", &monday), Ok(Value::Int(1)));
    assert_eq!(read_attribute("weeknum", &date(2021, 1, 3)), Ok(Value::Int(53)));
    assert_eq!(read_attribute("weekday", &date(2021, 1, 3)), Ok(Value::Int(6)));
    assert_eq!(
        read_attribute("day", &Value::Int(0)),
        Err(RuntimeError::AttributeOnNonDate {
            attribute: "day".to_string(),
            type_: "int"
        })
    );
}

#[test]
fn test_write_attributes() {
    let start = date(2020, 4, 15);

    assert_eq!(write_attribute("year", &start, &Value::Int(2024)), Ok(date(2024, 4, 15)));
    assert_eq!(write_attribute("month", &start, &Value::Int(12)), Ok(date(2020, 12, 15)));
    assert_eq!(write_attribute("day", &start, &Value::Int(30)), Ok(date(2020, 4, 30)));
    assert_eq!(
        write_attribute("day", &start, &Value::Int(31)),
        Err(RuntimeError::InvalidDate {
            attribute: "day".to_string(),
            value: 31
        })
    );
    assert_eq!(
        write_attribute("month", &start, &Value::Int(-1)),
        Err(RuntimeError::InvalidDate {
            attribute: "month".to_string(),
            value: -1
        })
    );
    assert_eq!(
        write_attribute("day", &start, &date(2020, 1, 1)),
        Err(RuntimeError::InvalidAttributeValue {
            attribute: "day".to_string(),
            type_: "date"
        })
    );
}

#[test]
fn test_variables_start_at_zero() {
    assert_eq!(run("VAR x IS x + 1; PRINT x;"), "1\n");
}

#[test]
fn test_print_joins_items() {
    assert_eq!(
        run("VAR d IS 2020-03-01; PRINT \"year\", d'year, d;"),
        "year 2020 2020-03-01\n"
    );
}

#[test]
fn test_attribute_write_in_program() {
    assert_eq!(
        run("VAR d IS 2020-01-31; d.month := 3; d.day := d'day - 1; PRINT d;"),
        "2020-03-30\n"
    );

    let (error, line) = runtime_error("VAR d IS 2021-01-31;\nd.month := 2;");
    assert_eq!(line, 2);
    assert_eq!(
        error,
        RuntimeError::InvalidDate {
            attribute: "month".to_string(),
            value: 2
        }
    );
}

#[test]
fn test_dates_before_year_one_in_program() {
    let (error, line) = runtime_error("VAR d IS 2020-03-01;\nd.year := 0;\nPRINT d;");
    assert_eq!(line, 2);
    assert_eq!(
        error,
        RuntimeError::InvalidDate {
            attribute: "year".to_string(),
            value: 0
        }
    );

    let (error, line) = runtime_error("VAR d IS 2020-03-01;\nd := 0001-01-01 - 1;\nPRINT d;");
    assert_eq!(line, 2);
    assert_eq!(error, RuntimeError::DateOutOfRange);
}

#[test]
fn test_control_flow() {
    assert_eq!(
        run("VAR i IS 0; VAR total IS 0;\n\
             WHILE i < 5 DO i := i + 1; total := total + i; ENDWHILE;\n\
             IF total = 15 THEN PRINT \"ok\", i; ELSE PRINT \"bad\"; ENDIF;"),
        "ok 5\n"
    );
}

#[test]
fn test_if_expression_value() {
    assert_eq!(
        run("VAR i IS 4; VAR r IS 0; r := IF i < 3 THEN 1 ELSE 2 ENDIF; PRINT r;"),
        "2\n"
    );
}

#[test]
fn test_date_condition_is_rejected() {
    let (error, line) = runtime_error("VAR d IS 2020-01-01;\nIF d THEN PRINT 1; ENDIF;");

    assert_eq!(line, 2);
    assert_eq!(error, RuntimeError::NonIntegerCondition { type_: "date" });
}

#[test]
fn test_unary_minus_on_date_is_rejected() {
    let (error, _) = runtime_error("VAR d IS 2020-01-01; d := -d;");

    assert!(matches!(error, RuntimeError::UndefinedUnary { operand: "date", .. }));
}

#[test]
fn test_error_stops_output() {
    let mut out = Vec::new();
    let result = interpret(
        "PRINT 1;\nPRINT 1 / 0;\nPRINT 2;",
        None,
        &Config::default(),
        &mut out,
    );

    assert_eq!(result.unwrap_err().get_line(), 2);
    assert_eq!(String::from_utf8(out).unwrap(), "1\n");
}

#[test]
fn test_today_uses_pinned_date() {
    let config = Config {
        today: NaiveDate::from_ymd_opt(2024, 2, 28),
        ..Config::default()
    };

    assert_eq!(
        run_with_config("VAR d IS 2000-01-01; d := Today() + 1; PRINT d, d'weekday;", &config).unwrap(),
        "2024-02-29 3\n"
    );
}

#[test]
fn test_function_call() {
    assert_eq!(
        run("FUNCTION Days {from [date], to [date]} RETURN int IS to - from END FUNCTION\n\
             PRINT Days(2020-01-01, 2020-03-01);"),
        "60\n"
    );
}

#[test]
fn test_function_locals_and_if_body() {
    assert_eq!(
        run("FUNCTION Clamp {n [int]} RETURN int\n\
               VAR limit IS 10\n\
             IS IF limit < n THEN limit ELSE n ENDIF\n\
             END FUNCTION\n\
             PRINT Clamp(3), Clamp(42);"),
        "3 10\n"
    );
}

#[test]
fn test_valued_procedure_with_locals() {
    assert_eq!(
        run("PROCEDURE FACT {n [int]} RETURN int\n\
               VAR acc IS 1\n\
             IS\n\
               WHILE 1 < n DO acc := acc * n; n := n - 1; ENDWHILE;\n\
               RETURN acc;\n\
             END PROCEDURE\n\
             PRINT FACT(10), FACT(3);"),
        "3628800 6\n"
    );
}

#[test]
fn test_recursive_procedure_restores_arguments() {
    assert_eq!(
        run("PROCEDURE DOWN {n [int]} IS\n\
               PRINT n;\n\
               IF 0 < n THEN DOWN(n - 1); ENDIF;\n\
               PRINT n;\n\
             END PROCEDURE\n\
             DOWN(2);"),
        "2\n1\n0\n0\n1\n2\n"
    );
}

#[test]
fn test_initializer_calls_later_definition() {
    assert_eq!(
        run("VAR x IS Double(2);\n\
             VAR y IS Double(x);\n\
             FUNCTION Double {n [int]} RETURN int IS n * 2 END FUNCTION\n\
             PRINT x, y;"),
        "4 8\n"
    );
}

#[test]
fn test_recursion_restores_caller_arguments() {
    assert_eq!(
        run("FUNCTION Sum {n [int]} RETURN int IS IF n < 1 THEN 0 ELSE n + Sum(n - 1) ENDIF END FUNCTION\n\
             PRINT Sum(4);"),
        "10\n"
    );
}

#[test]
fn test_void_procedure_call() {
    assert_eq!(
        run("VAR count IS 0;\n\
             PROCEDURE BUMP {by [int]} IS count := count + by; END PROCEDURE\n\
             BUMP(2); BUMP(3); PRINT count;"),
        "5\n"
    );
}

#[test]
fn test_missing_return() {
    let (error, line) = runtime_error(
        "PROCEDURE MAYBE {n [int]} RETURN int IS PRINT n; END PROCEDURE\nPRINT MAYBE(1);",
    );

    assert_eq!(line, 1);
    assert_eq!(
        error,
        RuntimeError::MissingReturn {
            name: "MAYBE".to_string()
        }
    );
}

#[test]
fn test_call_depth_limit() {
    let config = Config {
        max_call_depth: 5,
        ..Config::default()
    };
    let error = run_with_config(
        "FUNCTION Loop {n [int]} RETURN int IS Loop(n + 1) END FUNCTION\nPRINT Loop(0);",
        &config,
    )
    .unwrap_err();

    assert_eq!(
        error.get_internal(),
        &ErrorImpl::Runtime(RuntimeError::CallDepthExceeded { limit: 5 })
    );
}

#[test]
fn test_top_level_return_ends_program() {
    assert_eq!(run("PRINT 1;\nRETURN 0;\nPRINT 2;"), "1\n");
}
