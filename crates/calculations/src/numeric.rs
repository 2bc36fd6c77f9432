//! Lenient numeric parsing for locale-ambiguous input.
//!
//! Form fields and spreadsheet cells arrive as strings like "1.055,80" or
//! "R$ 200" as often as plain numbers. Anything unparseable degrades to 0.0
//! instead of failing, so one bad cell never aborts a batch import.

use serde_json::Value;

/// Converts a loosely-typed JSON value into a number. Null, missing and
/// empty values become 0.0; non-finite numbers become 0.0; strings go
/// through [`parse_decimal`]. Never panics.
pub fn to_number(raw: &Value) -> f64 {
    match raw {
        Value::Null => 0.0,
        Value::Number(n) => {
            let v = n.as_f64().unwrap_or(0.0);
            if v.is_finite() {
                v
            } else {
                0.0
            }
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => parse_decimal(s),
        _ => 0.0,
    }
}

/// Converts a value to a whole count (floored), for installment columns.
pub fn to_count(raw: &Value) -> i64 {
    to_number(raw).floor() as i64
}

/// Parses a decimal string in Brazilian or plain format.
///
/// Handles "1.055,80" (dot thousands, comma decimal), "1055,80" (comma
/// decimal), "1.055.80" (dots as thousands) and "1055.80" (dot decimal),
/// with an optional leading currency marker ("R$", "$"). Returns 0.0 on
/// anything unparseable.
pub fn parse_decimal(raw: &str) -> f64 {
    let mut s = raw.trim().to_string();
    if s.is_empty() {
        return 0.0;
    }

    // Strip a leading currency marker and any whitespace after it.
    let lower = s.to_lowercase();
    for marker in ["r$", "$"] {
        if lower.starts_with(marker) {
            s = s[marker.len()..].trim_start().to_string();
            break;
        }
    }
    s.retain(|c| !c.is_whitespace());

    let has_comma = s.contains(',');
    let has_dot = s.contains('.');

    if has_comma && has_dot {
        // Dot is a thousands separator, comma is the decimal: 1.055,80
        s = s.replace('.', "").replace(',', ".");
    } else if has_comma {
        // Comma decimal: 1055,80
        s = s.replace(',', ".");
    } else if has_dot {
        // Dot only: decimal unless it looks like thousands grouping,
        // i.e. more than two segments or a final segment longer than
        // two digits (1.055.80 or 1.055).
        let segments: Vec<&str> = s.split('.').collect();
        let last_len = segments.last().map_or(0, |p| p.len());
        if segments.len() > 2 || last_len > 2 {
            s = s.replace('.', "");
        }
    }

    // Drop whatever is left that cannot be part of a number.
    s.retain(|c| c.is_ascii_digit() || c == '.' || c == '-');
    if s.is_empty() || s == "-" {
        return 0.0;
    }

    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn brazilian_thousands_and_decimal() {
        assert_eq!(parse_decimal("1.055,80"), 1055.80);
        assert_eq!(parse_decimal("12.345.678,90"), 12_345_678.90);
    }

    #[test]
    fn comma_only_is_decimal() {
        assert_eq!(parse_decimal("1055,80"), 1055.80);
        assert_eq!(parse_decimal("0,5"), 0.5);
    }

    #[test]
    fn dot_only_decimal_or_thousands() {
        assert_eq!(parse_decimal("1055.80"), 1055.80);
        // Final segment longer than two digits means grouping.
        assert_eq!(parse_decimal("1.055"), 1055.0);
        // More than two segments means grouping.
        assert_eq!(parse_decimal("1.055.80"), 105580.0);
    }

    #[test]
    fn currency_markers_are_stripped() {
        assert_eq!(parse_decimal("R$ 200"), 200.0);
        assert_eq!(parse_decimal("r$200,50"), 200.50);
        assert_eq!(parse_decimal("$ 1.000,00"), 1000.0);
    }

    #[test]
    fn garbage_degrades_to_zero() {
        assert_eq!(parse_decimal("abc"), 0.0);
        assert_eq!(parse_decimal(""), 0.0);
        assert_eq!(parse_decimal("-"), 0.0);
        assert_eq!(parse_decimal("R$"), 0.0);
    }

    #[test]
    fn negatives_are_preserved() {
        assert_eq!(parse_decimal("-1.055,80"), -1055.80);
        assert_eq!(parse_decimal("-200"), -200.0);
    }

    #[test]
    fn to_number_is_total_over_json_values() {
        assert_eq!(to_number(&Value::Null), 0.0);
        assert_eq!(to_number(&json!(42.5)), 42.5);
        assert_eq!(to_number(&json!("1.055,80")), 1055.80);
        assert_eq!(to_number(&json!("abc")), 0.0);
        assert_eq!(to_number(&json!([1, 2])), 0.0);
        assert_eq!(to_number(&json!(true)), 1.0);
    }

    #[test]
    fn to_count_floors() {
        assert_eq!(to_count(&json!("2,9")), 2);
        assert_eq!(to_count(&json!(3.7)), 3);
        assert_eq!(to_count(&Value::Null), 0);
    }
}
