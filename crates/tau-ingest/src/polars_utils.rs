//! Polars AnyValue utility functions.
//!
//! Conversions from Polars `AnyValue` cells to labels, floats and the
//! tagged [`FieldValue`] used by record validation and dataset metadata.

use polars::prelude::*;
use tau_model::FieldValue;

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null, properly formats numeric types.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Converts an AnyValue to an axis label, `None` for Null.
pub fn any_to_label(value: AnyValue<'_>) -> Option<String> {
    if matches!(value, AnyValue::Null) {
        None
    } else {
        Some(any_to_string(value))
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Converts an AnyValue to f64, returning None for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::Boolean(b) => Some(if b { 1.0 } else { 0.0 }),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok()
}

/// Converts an AnyValue to a [`FieldValue`], keeping integers and floats apart.
///
/// Booleans become 0/1 integers, matching how QC flags are stored.
pub fn any_to_field_value(value: AnyValue<'_>) -> FieldValue {
    match value {
        AnyValue::Null => FieldValue::Null,
        AnyValue::Int8(v) => FieldValue::Integer(i64::from(v)),
        AnyValue::Int16(v) => FieldValue::Integer(i64::from(v)),
        AnyValue::Int32(v) => FieldValue::Integer(i64::from(v)),
        AnyValue::Int64(v) => FieldValue::Integer(v),
        AnyValue::UInt8(v) => FieldValue::Integer(i64::from(v)),
        AnyValue::UInt16(v) => FieldValue::Integer(i64::from(v)),
        AnyValue::UInt32(v) => FieldValue::Integer(i64::from(v)),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => FieldValue::Integer(v),
            Err(_) => FieldValue::Float(v as f64),
        },
        AnyValue::Float32(v) => FieldValue::Float(f64::from(v)),
        AnyValue::Float64(v) => FieldValue::Float(v),
        AnyValue::Boolean(b) => FieldValue::Integer(i64::from(b)),
        AnyValue::String(s) => FieldValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => FieldValue::Text(s.to_string()),
        other => FieldValue::Text(other.to_string()),
    }
}

/// Returns true for the numeric and boolean dtypes a numeric layer accepts.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Boolean
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_string() {
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_string(AnyValue::Int64(42)), "42");
        assert_eq!(any_to_string(AnyValue::Float64(2.50)), "2.5");
        assert_eq!(any_to_string(AnyValue::Float64(100.0)), "100");
        assert_eq!(any_to_string(AnyValue::String("IL6")), "IL6");
    }

    #[test]
    fn test_format_numeric_keeps_integer_zeros() {
        assert_eq!(format_numeric(10.0), "10");
        assert_eq!(format_numeric(1.10), "1.1");
        assert_eq!(format_numeric(f64::NAN), "NaN");
    }

    #[test]
    fn test_any_to_label() {
        assert_eq!(any_to_label(AnyValue::Null), None);
        assert_eq!(any_to_label(AnyValue::String("")), Some(String::new()));
    }

    #[test]
    fn test_any_to_field_value() {
        assert_eq!(any_to_field_value(AnyValue::Null), FieldValue::Null);
        assert_eq!(
            any_to_field_value(AnyValue::Int32(1)),
            FieldValue::Integer(1)
        );
        assert_eq!(
            any_to_field_value(AnyValue::Float64(0.5)),
            FieldValue::Float(0.5)
        );
        assert_eq!(
            any_to_field_value(AnyValue::Boolean(true)),
            FieldValue::Integer(1)
        );
        assert_eq!(
            any_to_field_value(AnyValue::String("Pass")),
            FieldValue::Text("Pass".to_string())
        );
    }

    #[test]
    fn test_any_to_f64() {
        assert_eq!(any_to_f64(AnyValue::Int32(3)), Some(3.0));
        assert_eq!(any_to_f64(AnyValue::String(" 1.5 ")), Some(1.5));
        assert_eq!(any_to_f64(AnyValue::String("")), None);
        assert_eq!(any_to_f64(AnyValue::Null), None);
    }
}
