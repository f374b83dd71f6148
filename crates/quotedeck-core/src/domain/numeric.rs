//! Lenient numeric coercion for provider payloads.
//!
//! The provider encodes every number as a string and uses placeholders such
//! as `"None"` or `"-"` for gaps. Both parsers read the longest numeric
//! prefix of a string, so `"150.25 USD"` gives `150.25`. Floats without a
//! numeric prefix become `NaN`; integers become `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads the leading decimal of a JSON string or number, `NaN` when there
/// is none.
///
/// Only decimal notation is read: `"inf"` and `"nan"` give `NaN`, while
/// `"Infinity"` gives infinity.
pub fn parse_float(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => leading_float(text),
        _ => f64::NAN,
    }
}

/// Reads the leading integer of a JSON string or number.
///
/// `"1000"` and `"1000.75"` both give `Some(1000)`; `"None"` gives `None`.
pub fn parse_int(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64)),
        Some(Value::String(text)) => leading_integer(text),
        _ => None,
    }
}

/// Reads a JSON string field, empty when absent or not a string.
pub fn parse_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn leading_float(text: &str) -> f64 {
    let trimmed = text.trim();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    if trimmed[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let int_digits = digits_from(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    trimmed[..end].parse::<f64>().unwrap_or(f64::NAN)
}

fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };

    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    digits[..end].parse::<i64>().ok().map(|value| value * sign)
}

/// Serde adapter: accepts a number, a numeric string or null (as `NaN`).
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(parse_float(value.as_ref()))
}

/// Serde adapter: accepts an integer, a float, a numeric string or null.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(parse_int(value.as_ref()))
}
