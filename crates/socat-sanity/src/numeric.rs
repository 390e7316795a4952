//! Numeric parsing and rendering shared by the unit converters.

use crate::error::{Result, SanityError};

/// Parses a string as f64, returning None for invalid, empty or non-finite strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a value that a conversion to `unit` requires to be numeric.
pub fn parse_for_conversion(value: &str, unit: &str) -> Result<f64> {
    parse_f64(value).ok_or_else(|| SanityError::Conversion {
        value: value.to_string(),
        unit: unit.to_string(),
        reason: "not a number".to_string(),
    })
}

/// Renders a number as a decimal string, always keeping a fractional part.
pub fn format_decimal(value: f64) -> String {
    let text = format!("{value}");
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_blank_and_non_finite() {
        assert_eq!(parse_f64(" 12.5 "), Some(12.5));
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64("inf"), None);
        assert_eq!(parse_f64("twelve"), None);
    }

    #[test]
    fn format_keeps_a_decimal_point() {
        assert_eq!(format_decimal(273.15), "273.15");
        assert_eq!(format_decimal(1000.0), "1000.0");
        assert_eq!(format_decimal(-45.5), "-45.5");
    }

    #[test]
    fn conversion_error_names_unit() {
        let err = parse_for_conversion("abc", "kelvin").unwrap_err();
        assert!(err.to_string().contains("kelvin"));
    }
}
