//! Column configuration for the sanity checker.
//!
//! The configuration is a JSON document naming the columns to normalize:
//!
//! ```json
//! {
//!   "missing_values": ["NaN", "-999"],
//!   "invalid_values": "report",
//!   "columns": [
//!     { "name": "SST", "unit": "kelvin" },
//!     { "name": "expocode", "calculator": { "kind": "metadata", "key": "Cruise_ID" } }
//!   ]
//! }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calculate::{
    DataCalculator, FixedValueCalculator, MetadataValueCalculator, TimestampCalculator,
};
use crate::error::{Result, SanityError};

/// Cell texts treated as "no value" when none is given in the configuration.
pub const DEFAULT_MISSING_VALUES: &[&str] = &["NaN", "-999", "-9999"];

/// What to do when a cell cannot be converted or calculated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidValuePolicy {
    /// Blank the cell and record an issue.
    #[default]
    Report,
    /// Stop at the first failure.
    Fail,
}

/// Which calculator fills a derived column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculatorSpec {
    /// Copy a metadata item.
    Metadata { key: String },
    /// Assemble a timestamp from date and time columns.
    Timestamp {
        year: String,
        month: String,
        day: String,
        hour: String,
        minute: String,
        #[serde(default)]
        second: Option<String>,
    },
    /// Use a constant.
    Fixed { value: String },
}

impl CalculatorSpec {
    pub fn build(&self) -> Box<dyn DataCalculator> {
        match self {
            Self::Metadata { key } => Box::new(MetadataValueCalculator::new(key.as_str())),
            Self::Timestamp {
                year,
                month,
                day,
                hour,
                minute,
                second,
            } => Box::new(TimestampCalculator {
                year: year.clone(),
                month: month.clone(),
                day: day.clone(),
                hour: hour.clone(),
                minute: minute.clone(),
                second: second.clone(),
            }),
            Self::Fixed { value } => Box::new(FixedValueCalculator::new(value.as_str())),
        }
    }
}

/// One configured column: converted when `unit` is set, derived when
/// `calculator` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculator: Option<CalculatorSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub missing_values: Vec<String>,
    pub invalid_values: InvalidValuePolicy,
    pub columns: Vec<ColumnSpec>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            missing_values: DEFAULT_MISSING_VALUES
                .iter()
                .map(|value| (*value).to_string())
                .collect(),
            invalid_values: InvalidValuePolicy::default(),
            columns: Vec::new(),
        }
    }
}

impl ColumnConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Rejects blank or repeated column names and columns that are both
    /// converted and calculated.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for column in &self.columns {
            let name = column.name.trim();
            if name.is_empty() {
                return Err(SanityError::Config("column name is empty".to_string()));
            }
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(SanityError::Config(format!(
                    "column '{name}' is configured more than once"
                )));
            }
            if column.unit.is_some() && column.calculator.is_some() {
                return Err(SanityError::Config(format!(
                    "column '{name}' has both a unit and a calculator"
                )));
            }
        }
        Ok(())
    }

    /// True when `cell` stands for "no value".
    pub fn is_missing(&self, cell: &str) -> bool {
        let cell = cell.trim();
        cell.is_empty()
            || self
                .missing_values
                .iter()
                .any(|missing| missing.trim().eq_ignore_ascii_case(cell))
    }
}
