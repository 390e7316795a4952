use crate::error::Result;

use super::{DataCalculator, DataRecord, MetadataContext};

/// Fills a column with the same value on every record.
#[derive(Debug, Clone)]
pub struct FixedValueCalculator {
    value: String,
}

impl FixedValueCalculator {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl DataCalculator for FixedValueCalculator {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn calculate_data_value(
        &self,
        _metadata: &MetadataContext,
        _record: &DataRecord<'_>,
        _column_index: usize,
        _column_name: &str,
    ) -> Result<String> {
        Ok(self.value.clone())
    }
}
