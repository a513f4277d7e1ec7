//! Evaluate typed comparisons against stored JSON values.
//!
//! Stored values are JSON; operands were coerced by field type when the plan was compiled.
//! Null never matches, and neither does the not-a-number operand.

use std::cmp::Ordering;

use serde_json::Value as Json;

use query_engine_translation::translation::query::plan::{Comparison, Value, Where};

use crate::executor::Row;

/// Whether a row satisfies every comparison of a where clause.
pub fn matches_where(row: &Row, where_: &Where) -> bool {
    where_
        .0
        .iter()
        .all(|(field, comparison)| matches_comparison(row.get(field), comparison))
}

/// Whether a stored value satisfies a comparison.
pub fn matches_comparison(stored: Option<&Json>, comparison: &Comparison) -> bool {
    let Some(stored) = stored.filter(|stored| !stored.is_null()) else {
        return false;
    };
    match comparison {
        Comparison::Equals(operand) => compare_value(stored, operand) == Some(Ordering::Equal),
        Comparison::In(operands) => operands
            .iter()
            .any(|operand| compare_value(stored, operand) == Some(Ordering::Equal)),
        Comparison::Between(low, high) => {
            matches!(
                compare_value(stored, low),
                Some(Ordering::Greater | Ordering::Equal)
            ) && matches!(
                compare_value(stored, high),
                Some(Ordering::Less | Ordering::Equal)
            )
        }
        Comparison::StartsWith(pattern) => {
            matches_pattern(stored, pattern, |text, pattern| text.starts_with(pattern))
        }
        Comparison::EndsWith(pattern) => {
            matches_pattern(stored, pattern, |text, pattern| text.ends_with(pattern))
        }
        Comparison::Contains(pattern) => {
            matches_pattern(stored, pattern, |text, pattern| text.contains(pattern))
        }
    }
}

fn matches_pattern(stored: &Json, pattern: &Value, test: impl Fn(&str, &str) -> bool) -> bool {
    match (text_of(stored), pattern) {
        (Some(text), Value::String(pattern)) => test(&text, pattern),
        _ => false,
    }
}

fn text_of(stored: &Json) -> Option<String> {
    match stored {
        Json::String(string) => Some(string.clone()),
        Json::Number(number) => Some(number.to_string()),
        Json::Bool(boolean) => Some(boolean.to_string()),
        Json::Null | Json::Array(_) | Json::Object(_) => None,
    }
}

/// Order a stored value against a coerced operand. None when they are not comparable.
#[allow(clippy::cast_precision_loss)]
pub fn compare_value(stored: &Json, operand: &Value) -> Option<Ordering> {
    match (stored, operand) {
        (_, Value::NotANumber) => None,
        (Json::Number(number), Value::Integer(int)) => match number.as_i64() {
            Some(stored) => Some(stored.cmp(int)),
            None => number.as_f64()?.partial_cmp(&(*int as f64)),
        },
        (Json::Number(number), Value::Float(float)) => number.as_f64()?.partial_cmp(float),
        (Json::Number(number), Value::String(string)) => {
            number.as_f64()?.partial_cmp(&string.parse::<f64>().ok()?)
        }
        (Json::String(stored), Value::String(string)) => Some(stored.as_str().cmp(string)),
        (Json::String(stored), Value::Integer(int)) => {
            stored.parse::<f64>().ok()?.partial_cmp(&(*int as f64))
        }
        (Json::String(stored), Value::Float(float)) => stored.parse::<f64>().ok()?.partial_cmp(float),
        (Json::Bool(boolean), Value::String(string)) => {
            Some(boolean.to_string().as_str().cmp(string))
        }
        _ => None,
    }
}

/// Whether two stored key values identify the same record. A number and its decimal text are
/// the same key.
pub fn same_key(left: &Json, right: &Json) -> bool {
    if left.is_null() || right.is_null() {
        return false;
    }
    if left == right {
        return true;
    }
    match (left, right) {
        (Json::Number(number), Json::String(string))
        | (Json::String(string), Json::Number(number)) => {
            match (number.as_f64(), string.parse::<f64>()) {
                (Some(number), Ok(parsed)) => number == parsed,
                _ => false,
            }
        }
        _ => false,
    }
}

/// A total order over stored values, used for sorting. Missing values and nulls sort last.
pub fn compare_json(left: Option<&Json>, right: Option<&Json>) -> Ordering {
    let left = left.unwrap_or(&Json::Null);
    let right = right.unwrap_or(&Json::Null);
    match (left, right) {
        (Json::Number(left), Json::Number(right)) => match (left.as_f64(), right.as_f64()) {
            (Some(left), Some(right)) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (Json::String(left), Json::String(right)) => left.cmp(right),
        (Json::Bool(left), Json::Bool(right)) => left.cmp(right),
        _ => rank(left).cmp(&rank(right)),
    }
}

fn rank(value: &Json) -> u8 {
    match value {
        Json::Bool(_) => 0,
        Json::Number(_) => 1,
        Json::String(_) => 2,
        Json::Array(_) => 3,
        Json::Object(_) => 4,
        Json::Null => 5,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn string(value: &str) -> Value {
        Value::String(value.to_string())
    }

    #[test]
    fn nulls_and_not_a_number_match_nothing() {
        assert!(!matches_comparison(None, &Comparison::Equals(Value::Integer(1))));
        assert!(!matches_comparison(
            Some(&json!(null)),
            &Comparison::In(vec![Value::Integer(1)])
        ));
        assert!(!matches_comparison(
            Some(&json!(1)),
            &Comparison::Equals(Value::NotANumber)
        ));
        assert!(!matches_comparison(
            Some(&json!(12)),
            &Comparison::StartsWith(Value::NotANumber)
        ));
    }

    #[test]
    fn ranges_are_inclusive() {
        let range = Comparison::Between(Value::Integer(1), Value::Integer(10));
        assert!(matches_comparison(Some(&json!(1)), &range));
        assert!(matches_comparison(Some(&json!(10)), &range));
        assert!(!matches_comparison(Some(&json!(11)), &range));

        let dates = Comparison::Between(string("2019-01-01"), string("2019-12-31"));
        assert!(matches_comparison(Some(&json!("2019-06-01")), &dates));
        assert!(!matches_comparison(Some(&json!("2020-01-01")), &dates));
    }

    #[test]
    fn patterns_match_text() {
        assert!(matches_comparison(
            Some(&json!("acme")),
            &Comparison::StartsWith(string("ac"))
        ));
        assert!(matches_comparison(
            Some(&json!("acme")),
            &Comparison::EndsWith(string("me"))
        ));
        assert!(matches_comparison(
            Some(&json!("acme")),
            &Comparison::Contains(string("cm"))
        ));
        assert!(!matches_comparison(
            Some(&json!("acme")),
            &Comparison::Contains(string("x"))
        ));
    }

    #[test]
    fn numbers_compare_across_representations() {
        assert_eq!(compare_value(&json!(2.5), &Value::Integer(2)), Some(Ordering::Greater));
        assert_eq!(compare_value(&json!(7), &string("7")), Some(Ordering::Equal));
        assert_eq!(compare_value(&json!(true), &string("true")), Some(Ordering::Equal));
        assert!(same_key(&json!(7), &json!("7")));
        assert!(!same_key(&json!(null), &json!(null)));
    }

    #[test]
    fn nulls_sort_last() {
        let mut values = vec![json!(null), json!(3), json!(1)];
        values.sort_by(|left, right| compare_json(Some(left), Some(right)));
        assert_eq!(values, vec![json!(1), json!(3), json!(null)]);
    }
}
