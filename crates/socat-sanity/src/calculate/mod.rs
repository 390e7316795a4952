//! Calculated columns.
//!
//! A [`DataCalculator`] derives one column's value for a record from the
//! record itself and the cruise metadata. Which calculator fills which
//! column is decided by the column configuration, not by the checker.

mod fixed;
mod metadata_value;
mod timestamp;

use std::collections::BTreeMap;

use socat_model::OmeMetadata;

use crate::error::Result;

pub use fixed::FixedValueCalculator;
pub use metadata_value::MetadataValueCalculator;
pub use timestamp::TimestampCalculator;

/// Derives the value of a column for one data record.
pub trait DataCalculator: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Computes the value for `column_name` (at `column_index`) in `record`.
    ///
    /// # Errors
    ///
    /// [`SanityError::Data`](crate::SanityError::Data) when a prerequisite
    /// field or metadata item is missing or unusable.
    fn calculate_data_value(
        &self,
        metadata: &MetadataContext,
        record: &DataRecord<'_>,
        column_index: usize,
        column_name: &str,
    ) -> Result<String>;
}

/// Read-only view of cruise metadata items by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataContext {
    items: BTreeMap<String, String>,
}

impl MetadataContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Context built from the singular sections of a metadata document.
    pub fn from_metadata(metadata: &OmeMetadata) -> Self {
        Self::from_pairs(metadata.simple_values())
    }

    /// Value of `name`, matched exactly first and then ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .get(name)
            .or_else(|| {
                self.items
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One line of a data file.
#[derive(Debug, Clone, Copy)]
pub struct DataRecord<'a> {
    line: usize,
    headers: &'a [String],
    fields: &'a [String],
}

impl<'a> DataRecord<'a> {
    pub fn new(line: usize, headers: &'a [String], fields: &'a [String]) -> Self {
        Self {
            line,
            headers,
            fields,
        }
    }

    /// Line number in the source file (1-based, header included).
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Field under the header `name`, ignoring ASCII case.
    pub fn value(&self, name: &str) -> Option<&'a str> {
        let index = self
            .headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))?;
        self.field(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
