// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use flexrule_app::{Condition, Context, Lookup, Operator};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::warn;

/// Tests one condition against the context. Malformed conditions evaluate
/// to `false`; an inactive condition is always `false`.
pub fn evaluate(condition: &Condition, context: &Context) -> bool {
    let Some(operator) = condition.operator else {
        warn!(path = ?condition.path, "condition has no recognized operator");
        return false;
    };

    if !condition.active {
        return false;
    }

    let Some(path) = condition.path.as_deref() else {
        warn!(
            operator = operator.as_str(),
            "condition has neither field nor dataSource and path"
        );
        return false;
    };

    let actual = match context.lookup(path) {
        Lookup::Unreachable => return false,
        Lookup::Missing => None,
        Lookup::Value(value) => Some(value),
    };

    compare(operator, actual, condition.expected.as_ref())
}

/// `None` on either side stands for an absent value.
pub fn compare(operator: Operator, actual: Option<&Value>, expected: Option<&Value>) -> bool {
    match operator {
        Operator::Eq => strict_eq(actual, expected),
        Operator::Ne => {
            if expected.is_none_or(Value::is_null) {
                return actual.is_some_and(|value| !value.is_null());
            }
            !strict_eq(actual, expected)
        }
        Operator::Gt => ordering(actual, expected) == Some(Ordering::Greater),
        Operator::Gte => matches!(
            ordering(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::Lt => ordering(actual, expected) == Some(Ordering::Less),
        Operator::Lte => matches!(
            ordering(actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Operator::In => match expected {
            Some(Value::Array(candidates)) => includes(candidates, actual),
            _ => false,
        },
        Operator::Nin => match expected {
            Some(Value::Array(candidates)) => !includes(candidates, actual),
            _ => false,
        },
        Operator::Contains => match actual {
            Some(Value::String(haystack)) => match expected {
                Some(Value::String(needle)) => haystack.contains(needle.as_str()),
                Some(value @ (Value::Number(_) | Value::Bool(_))) => {
                    haystack.contains(&value.to_string())
                }
                _ => false,
            },
            Some(Value::Array(items)) => includes(items, expected),
            _ => false,
        },
    }
}

fn strict_eq(actual: Option<&Value>, expected: Option<&Value>) -> bool {
    match (actual, expected) {
        (None, None) => true,
        (Some(actual), Some(expected)) => same_value(actual, expected),
        _ => false,
    }
}

/// Scalar identity; arrays and objects never compare equal.
fn same_value(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::Number(left), Value::Number(right)) => left.as_f64() == right.as_f64(),
        (Value::String(left), Value::String(right)) => left == right,
        _ => false,
    }
}

fn includes(candidates: &[Value], needle: Option<&Value>) -> bool {
    needle.is_some_and(|needle| candidates.iter().any(|item| same_value(item, needle)))
}

fn ordering(actual: Option<&Value>, expected: Option<&Value>) -> Option<Ordering> {
    match (actual?, expected?) {
        (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
        (left, right) => numeric(left)?.partial_cmp(&numeric(right)?),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::Bool(flag) => Some(f64::from(u8::from(*flag))),
        _ => None,
    }
}
