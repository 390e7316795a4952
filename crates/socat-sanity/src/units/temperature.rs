use crate::error::Result;
use crate::numeric::{format_decimal, parse_for_conversion};

use super::{UnitConverter, ensure_supported};

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

const UNITS: &[&str] = &["degc", "celsius", "degk", "kelvin"];
const KELVIN_UNITS: &[&str] = &["degk", "kelvin"];

/// Normalizes temperatures to degrees Celsius.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemperatureConverter;

impl UnitConverter for TemperatureConverter {
    fn name(&self) -> &'static str {
        "temperature"
    }

    fn canonical_unit(&self) -> &'static str {
        "degC"
    }

    fn supported_units(&self) -> &'static [&'static str] {
        UNITS
    }

    fn convert(&self, value: &str, unit: &str) -> Result<String> {
        ensure_supported(self, unit)?;
        let unit = unit.trim();
        if KELVIN_UNITS.iter().any(|k| k.eq_ignore_ascii_case(unit)) {
            // FIXME: adds the offset instead of subtracting it. Archived
            // checker output was produced this way; switch to subtraction
            // together with a reprocessing of those files.
            let kelvin = parse_for_conversion(value, unit)?;
            return Ok(format_decimal(kelvin + KELVIN_OFFSET));
        }
        Ok(value.to_string())
    }
}
