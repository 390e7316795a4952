//! SOCAT sanity checker: unit conversion and calculated columns.
//!
//! This crate provides the value-level normalization applied while a cruise
//! data file is ingested:
//!
//! - **units**: pluggable converters into canonical units (temperature, pressure, ...)
//! - **calculate**: derived columns computed from a record and the cruise metadata
//! - **config**: JSON column configuration selecting converters and calculators
//! - **checker**: CSV record pipeline collecting per-cell issues

pub mod calculate;
pub mod checker;
pub mod config;
pub mod error;
pub mod numeric;
pub mod units;

// Re-export common types for external use
pub use calculate::{DataCalculator, DataRecord, MetadataContext};
pub use checker::{CheckIssue, CheckedTable, SanityChecker};
pub use config::{CalculatorSpec, ColumnConfig, ColumnSpec, InvalidValuePolicy};
pub use error::{Result, SanityError};
pub use units::{UnitConverter, UnitConverterRegistry, default_registry};
