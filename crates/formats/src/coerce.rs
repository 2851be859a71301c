//! Attribute coercion with JavaScript unary-plus semantics.
//!
//! Records arrive as loosely typed JSON; views only ever need numbers (axes,
//! weights, colour) or category labels (grouping).

use serde_json::Value;

/// Numeric value of `value` as `+value` would produce it.
///
/// - numbers as-is, booleans `1` / `0`, `null` → `0`
/// - strings: blank → `0`, numeric text parsed, anything else NaN
/// - arrays: empty → `0`, single element → that element, otherwise NaN
/// - objects → NaN
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_numeric_text(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] if !single.is_array() && !single.is_object() => to_number(single),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

/// Weight coercion: NaN, infinite and negative values count as zero.
pub fn to_weight(value: Option<&Value>) -> f64 {
    let v = value.map(to_number).unwrap_or(0.0);
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Category label used for grouping. Missing and `null` map to the empty label.
pub fn to_label(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

fn parse_numeric_text(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // Rust accepts spellings ("inf", "nan") that unary plus rejects.
    if t.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}
