use crate::error::{Result, SanityError};
use crate::numeric::{format_decimal, parse_for_conversion};

use super::{UnitConverter, ensure_supported};

const UNITS: &[&str] = &["degrees_east", "decimal_degrees", "degrees_west"];

/// Normalizes longitudes to decimal degrees east in (-180, 180].
#[derive(Debug, Clone, Copy, Default)]
pub struct LongitudeConverter;

impl UnitConverter for LongitudeConverter {
    fn name(&self) -> &'static str {
        "longitude"
    }

    fn canonical_unit(&self) -> &'static str {
        "degrees_east"
    }

    fn supported_units(&self) -> &'static [&'static str] {
        UNITS
    }

    fn convert(&self, value: &str, unit: &str) -> Result<String> {
        ensure_supported(self, unit)?;
        let unit = unit.trim();
        let raw = parse_for_conversion(value, unit)?;
        if !(-360.0..=360.0).contains(&raw) {
            return Err(SanityError::Conversion {
                value: value.to_string(),
                unit: unit.to_string(),
                reason: "outside -360..360".to_string(),
            });
        }
        let mut east = if unit.eq_ignore_ascii_case("degrees_west") {
            -raw
        } else {
            raw
        };
        if east > 180.0 {
            east -= 360.0;
        } else if east <= -180.0 {
            east += 360.0;
        }
        Ok(format_decimal(east))
    }
}
