use crate::error::Result;
use crate::numeric::{format_decimal, parse_for_conversion};

use super::{UnitConverter, ensure_supported};

const UNITS: &[&str] = &["hpa", "mbar", "millibar", "kpa", "pa", "atm", "mmhg", "inhg"];

/// Multiplier taking a value in the unit to hectopascals. Units missing here
/// are already equivalent to hPa.
fn hpa_factor(unit: &str) -> Option<f64> {
    match unit.to_ascii_lowercase().as_str() {
        "kpa" => Some(10.0),
        "pa" => Some(0.01),
        "atm" => Some(1013.25),
        "mmhg" => Some(1.333_223_684),
        "inhg" => Some(33.863_886),
        _ => None,
    }
}

/// Normalizes pressures to hectopascals.
#[derive(Debug, Clone, Copy, Default)]
pub struct PressureConverter;

impl UnitConverter for PressureConverter {
    fn name(&self) -> &'static str {
        "pressure"
    }

    fn canonical_unit(&self) -> &'static str {
        "hPa"
    }

    fn supported_units(&self) -> &'static [&'static str] {
        UNITS
    }

    fn convert(&self, value: &str, unit: &str) -> Result<String> {
        ensure_supported(self, unit)?;
        let unit = unit.trim();
        match hpa_factor(unit) {
            Some(factor) => Ok(format_decimal(parse_for_conversion(value, unit)? * factor)),
            None => Ok(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_to_hectopascals() {
        let converter = PressureConverter;
        assert_eq!(converter.convert("100", "kPa").unwrap(), "1000.0");
        assert_eq!(converter.convert("1", "atm").unwrap(), "1013.25");
    }

    #[test]
    fn hpa_equivalents_pass_through() {
        let converter = PressureConverter;
        assert_eq!(converter.convert("1013.2", "mbar").unwrap(), "1013.2");
        assert_eq!(converter.convert("1013.2", "hPa").unwrap(), "1013.2");
    }

    #[test]
    fn rejects_text() {
        assert!(PressureConverter.convert("high", "kpa").is_err());
    }
}
