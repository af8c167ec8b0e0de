//! Type coercion: turn raw text from a declaration or a config file into a
//! typed [`Value`].
//!
//! The same rules apply to declared defaults (at schema construction) and to
//! values read from a config source (at load time):
//!
//! - Surrounding whitespace is trimmed first.
//! - `null` / `none` (any case) become [`Value::Null`] for every type.
//! - `str`: one pair of matching outer quotes is stripped, nothing else is
//!   unescaped.
//! - `int` / `float`: numeric literals only. `_` digit separators and
//!   `0x`/`0o`/`0b` prefixes are accepted for integers; an integral float such
//!   as `3.0` narrows to an integer, `3.5` does not.
//! - `bool`: `true`/`false`, `yes`/`no`, `on`/`off`, or any numeric literal
//!   (non-zero is true).

use crate::error::DoconfError;
use crate::types::{Value, VarType};

/// Coerce `raw` into a value of type `target`.
pub fn coerce(raw: &str, target: VarType) -> Result<Value, DoconfError> {
    let text = raw.trim();
    if is_null_literal(text) {
        return Ok(Value::Null);
    }
    match target {
        VarType::String => Ok(Value::String(strip_quotes(text).to_string())),
        VarType::Integer => coerce_integer(text),
        VarType::Float => coerce_float(text),
        VarType::Boolean => coerce_bool(text),
    }
}

/// Whether `text` is one of the null literals. Expects trimmed input.
pub fn is_null_literal(text: &str) -> bool {
    text.eq_ignore_ascii_case("null") || text.eq_ignore_ascii_case("none")
}

fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn coerce_integer(text: &str) -> Result<Value, DoconfError> {
    if let Some(i) = parse_int_literal(text).map_err(|reason| mismatch(text, VarType::Integer, reason))? {
        return Ok(Value::Integer(i));
    }
    match parse_float_literal(text) {
        Some(x) if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 => {
            Ok(Value::Integer(x as i64))
        }
        Some(_) => Err(mismatch(text, VarType::Integer, "has a fractional part")),
        None => Err(mismatch(text, VarType::Integer, "not a numeric literal")),
    }
}

fn coerce_float(text: &str) -> Result<Value, DoconfError> {
    if let Some(i) = parse_int_literal(text).map_err(|reason| mismatch(text, VarType::Float, reason))? {
        return Ok(Value::Float(i as f64));
    }
    parse_float_literal(text)
        .map(Value::Float)
        .ok_or_else(|| mismatch(text, VarType::Float, "not a numeric literal"))
}

fn coerce_bool(text: &str) -> Result<Value, DoconfError> {
    let lowered = text.to_ascii_lowercase();
    match lowered.as_str() {
        "true" | "yes" | "on" => return Ok(Value::Boolean(true)),
        "false" | "no" | "off" => return Ok(Value::Boolean(false)),
        _ => {}
    }
    if let Ok(Some(i)) = parse_int_literal(text) {
        return Ok(Value::Boolean(i != 0));
    }
    if let Some(x) = parse_float_literal(text) {
        return Ok(Value::Boolean(x != 0.0));
    }
    Err(mismatch(
        text,
        VarType::Boolean,
        "expected true/false, yes/no, on/off or a number",
    ))
}

fn mismatch(text: &str, target: VarType, reason: impl Into<String>) -> DoconfError {
    DoconfError::TypeCoercion {
        value: text.to_string(),
        target: target.to_string(),
        reason: reason.into(),
    }
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else {
        (false, text.strip_prefix('+').unwrap_or(text))
    }
}

/// Remove `_` digit separators. Separators must sit between two digits.
fn strip_separators(digits: &str) -> Option<String> {
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    Some(digits.replace('_', ""))
}

/// `Ok(None)` when `text` is not an integer literal at all, `Err` when it is
/// one but does not fit in an `i64`.
fn parse_int_literal(text: &str) -> Result<Option<i64>, String> {
    let (negative, body) = split_sign(text);
    let lower = body.to_ascii_lowercase();
    let (radix, digits) = if let Some(d) = lower.strip_prefix("0x") {
        (16, d.trim_start_matches('_'))
    } else if let Some(d) = lower.strip_prefix("0o") {
        (8, d.trim_start_matches('_'))
    } else if let Some(d) = lower.strip_prefix("0b") {
        (2, d.trim_start_matches('_'))
    } else {
        (10, lower.as_str())
    };

    let Some(cleaned) = strip_separators(digits) else {
        return Ok(None);
    };
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_digit(radix)) {
        return Ok(None);
    }

    let magnitude = i128::from_str_radix(&cleaned, radix)
        .map_err(|_| "out of range for a 64-bit integer".to_string())?;
    let signed = if negative { -magnitude } else { magnitude };
    i64::try_from(signed)
        .map(Some)
        .map_err(|_| "out of range for a 64-bit integer".to_string())
}

fn parse_float_literal(text: &str) -> Option<f64> {
    let (negative, body) = split_sign(text);
    if !body.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-' | '_'))
    {
        return None;
    }
    let cleaned = strip_separators(body)?;
    let x: f64 = cleaned.parse().ok()?;
    if !x.is_finite() {
        return None;
    }
    Some(if negative { -x } else { x })
}
