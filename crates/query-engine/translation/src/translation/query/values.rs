//! Handle the translation of raw filter values into typed comparisons.

use query_engine_metadata::metadata::ScalarType;

use super::plan::{Comparison, Value};

/// Convert a raw query-string value into a comparison against a field of the given type.
///
/// * `(a,b)` is a range, `(a,b,c)` a set.
/// * `a,b,c` is a set.
/// * `ab*` starts with, `*ab` ends with, `*ab*` contains.
/// * Anything else is an equality.
pub fn translate_value(raw: &str, scalar_type: ScalarType) -> Comparison {
    let (value, ranged) = match raw
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (inner, true),
        None => (raw, false),
    };

    let elements: Vec<&str> = value.split(',').collect();
    if elements.len() > 1 {
        return match elements.as_slice() {
            [low, high] if ranged => {
                Comparison::Between(coerce(low, scalar_type), coerce(high, scalar_type))
            }
            _ => Comparison::In(
                elements
                    .iter()
                    .map(|element| coerce(element, scalar_type))
                    .collect(),
            ),
        };
    }

    let (value, ends_with) = match value.strip_prefix('*') {
        Some(rest) => (rest, true),
        None => (value, false),
    };
    let (value, starts_with) = match value.strip_suffix('*') {
        Some(rest) => (rest, true),
        None => (value, false),
    };

    match (ends_with, starts_with) {
        (false, false) => Comparison::Equals(coerce(value, scalar_type)),
        (true, false) => Comparison::EndsWith(coerce_pattern(value, scalar_type)),
        (false, true) => Comparison::StartsWith(coerce_pattern(value, scalar_type)),
        (true, true) => Comparison::Contains(coerce_pattern(value, scalar_type)),
    }
}

/// Coerce a scalar literal to the declared type of its field.
pub fn coerce(raw: &str, scalar_type: ScalarType) -> Value {
    match scalar_type {
        ScalarType::Integer => parse_integer_prefix(raw).map_or(Value::NotANumber, Value::Integer),
        ScalarType::Float => parse_float_prefix(raw).map_or(Value::NotANumber, Value::Float),
        ScalarType::String | ScalarType::Boolean | ScalarType::Date | ScalarType::Identifier => {
            Value::String(raw.to_string())
        }
    }
}

// A pattern carries its wildcard, which is never a number.
fn coerce_pattern(raw: &str, scalar_type: ScalarType) -> Value {
    if scalar_type.is_numeric() {
        Value::NotANumber
    } else {
        Value::String(raw.to_string())
    }
}

/// Parse the longest integer prefix, after leading whitespace.
fn parse_integer_prefix(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let sign_len = usize::from(raw.starts_with(['+', '-']));
    let digits_len = raw[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    raw[..sign_len + digits_len].parse().ok()
}

/// Parse the longest decimal floating point prefix, after leading whitespace.
fn parse_float_prefix(raw: &str) -> Option<f64> {
    let raw = raw.trim_start();
    let bytes = raw.as_bytes();
    let mut end = usize::from(raw.starts_with(['+', '-']));

    let integer_digits = count_digits(&bytes[end..]);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = count_digits(&bytes[end + 1..]);
        if integer_digits > 0 || fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }
    if integer_digits == 0 && fraction_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits = count_digits(&bytes[exponent_end..]);
        if exponent_digits > 0 {
            end = exponent_end + exponent_digits;
        }
    }

    raw[..end].parse::<f64>().ok().filter(|float| float.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}
