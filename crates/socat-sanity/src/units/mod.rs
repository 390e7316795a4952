//! Unit converters used to normalize raw column values.
//!
//! Each converter owns a family of units (temperature, pressure, ...) and
//! rewrites values into that family's canonical unit. Columns pick their
//! converter through a [`UnitConverterRegistry`] by unit name, so adding a
//! unit family means registering one more converter.

mod longitude;
mod pressure;
mod salinity;
mod temperature;

use std::sync::OnceLock;

use crate::error::{Result, SanityError};

pub use longitude::LongitudeConverter;
pub use pressure::PressureConverter;
pub use salinity::SalinityConverter;
pub use temperature::{KELVIN_OFFSET, TemperatureConverter};

/// Converts values expressed in a family of units into its canonical unit.
pub trait UnitConverter: Send + Sync {
    /// Short name of the unit family (e.g., "temperature").
    fn name(&self) -> &'static str;

    /// Unit every supported value is converted into.
    fn canonical_unit(&self) -> &'static str;

    /// Lowercase names of every accepted unit.
    fn supported_units(&self) -> &'static [&'static str];

    /// Case-insensitive check against [`UnitConverter::supported_units`].
    fn supports_unit(&self, unit: &str) -> bool {
        let unit = unit.trim();
        self.supported_units()
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(unit))
    }

    /// Converts `value` given in `unit` into the canonical unit.
    ///
    /// # Errors
    ///
    /// [`SanityError::Conversion`] when a numeric transformation is needed and
    /// `value` does not parse, [`SanityError::UnsupportedUnit`] when `unit`
    /// is not accepted by this converter.
    fn convert(&self, value: &str, unit: &str) -> Result<String>;
}

pub(crate) fn ensure_supported(converter: &dyn UnitConverter, unit: &str) -> Result<()> {
    if converter.supports_unit(unit) {
        Ok(())
    } else {
        Err(SanityError::UnsupportedUnit(unit.to_string()))
    }
}

/// Ordered set of converters searched by unit name.
pub struct UnitConverterRegistry {
    converters: Vec<Box<dyn UnitConverter>>,
}

impl UnitConverterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    pub fn register(&mut self, converter: Box<dyn UnitConverter>) {
        self.converters.push(converter);
    }

    /// First registered converter accepting `unit`.
    pub fn find(&self, unit: &str) -> Option<&dyn UnitConverter> {
        self.converters
            .iter()
            .map(|converter| converter.as_ref())
            .find(|converter| converter.supports_unit(unit))
    }

    pub fn convert(&self, value: &str, unit: &str) -> Result<String> {
        self.find(unit)
            .ok_or_else(|| SanityError::UnsupportedUnit(unit.to_string()))?
            .convert(value, unit)
    }

    pub fn converters(&self) -> impl Iterator<Item = &dyn UnitConverter> + '_ {
        self.converters.iter().map(|converter| converter.as_ref())
    }

    /// Every unit accepted by some registered converter, in registration order.
    pub fn supported_units(&self) -> Vec<&'static str> {
        self.converters
            .iter()
            .flat_map(|converter| converter.supported_units().iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl Default for UnitConverterRegistry {
    /// Registry holding every built-in converter.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TemperatureConverter));
        registry.register(Box::new(PressureConverter));
        registry.register(Box::new(SalinityConverter));
        registry.register(Box::new(LongitudeConverter));
        registry
    }
}

static DEFAULT_REGISTRY: OnceLock<UnitConverterRegistry> = OnceLock::new();

/// Shared registry with the built-in converters.
pub fn default_registry() -> &'static UnitConverterRegistry {
    DEFAULT_REGISTRY.get_or_init(UnitConverterRegistry::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_converter_case_insensitively() {
        let registry = default_registry();
        assert_eq!(registry.find("Kelvin").map(|c| c.name()), Some("temperature"));
        assert_eq!(registry.find(" hPa ").map(|c| c.name()), Some("pressure"));
        assert!(registry.find("furlongs").is_none());
    }

    #[test]
    fn unknown_unit_is_an_error() {
        let err = default_registry().convert("1", "furlongs").unwrap_err();
        assert!(matches!(err, SanityError::UnsupportedUnit(unit) if unit == "furlongs"));
    }

    #[test]
    fn unit_families_do_not_overlap() {
        let registry = default_registry();
        for converter in registry.converters() {
            for unit in converter.supported_units() {
                assert_eq!(
                    registry.find(unit).map(|c| c.name()),
                    Some(converter.name()),
                    "{unit} claimed by more than one converter"
                );
            }
        }
    }

    #[test]
    fn empty_registry_converts_nothing() {
        let registry = UnitConverterRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.supported_units().is_empty());
        assert!(registry.convert("25.0", "degc").is_err());
    }

    #[test]
    fn supported_units_follow_registration_order() {
        let units = default_registry().supported_units();
        assert_eq!(units.first(), Some(&"degc"));
        assert!(units.contains(&"mbar"));
        assert!(units.contains(&"degrees_west"));
    }
}
