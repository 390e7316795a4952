use crate::error::Result;

use super::{UnitConverter, ensure_supported};

const UNITS: &[&str] = &["psu", "pss", "pss-78", "ppt"];

/// Accepts the practical-salinity unit spellings; values pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalinityConverter;

impl UnitConverter for SalinityConverter {
    fn name(&self) -> &'static str {
        "salinity"
    }

    fn canonical_unit(&self) -> &'static str {
        "PSU"
    }

    fn supported_units(&self) -> &'static [&'static str] {
        UNITS
    }

    fn convert(&self, value: &str, unit: &str) -> Result<String> {
        ensure_supported(self, unit)?;
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_spellings_pass_through() {
        for unit in ["PSU", "pss-78", "ppt"] {
            assert_eq!(SalinityConverter.convert("35.1", unit).unwrap(), "35.1");
        }
        assert!(SalinityConverter.convert("35.1", "g/kg").is_err());
    }
}
