use socat_model::CONFLICT_STRING;

use crate::error::{Result, SanityError};

use super::{DataCalculator, DataRecord, MetadataContext};

/// Copies a metadata item (e.g., the cruise expocode) into a column.
#[derive(Debug, Clone)]
pub struct MetadataValueCalculator {
    key: String,
}

impl MetadataValueCalculator {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl DataCalculator for MetadataValueCalculator {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn calculate_data_value(
        &self,
        metadata: &MetadataContext,
        _record: &DataRecord<'_>,
        _column_index: usize,
        column_name: &str,
    ) -> Result<String> {
        match metadata.get(&self.key).map(str::trim) {
            None | Some("") => Err(SanityError::data(
                column_name,
                format!("metadata item {} is not set", self.key),
            )),
            Some(CONFLICT_STRING) => Err(SanityError::data(
                column_name,
                format!("metadata item {} has conflicting values", self.key),
            )),
            Some(value) => Ok(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculate(context: &MetadataContext) -> Result<String> {
        let record = DataRecord::new(2, &[], &[]);
        MetadataValueCalculator::new("Cruise_ID").calculate_data_value(context, &record, 0, "expocode")
    }

    #[test]
    fn copies_the_item() {
        let context = MetadataContext::from_pairs([("Cruise_ID", "33RO20120101")]);
        assert_eq!(calculate(&context).unwrap(), "33RO20120101");
    }

    #[test]
    fn missing_or_blank_item_is_a_data_error() {
        assert!(matches!(
            calculate(&MetadataContext::new()),
            Err(SanityError::Data { ref column, .. }) if column == "expocode"
        ));
        let blank = MetadataContext::from_pairs([("Cruise_ID", "  ")]);
        assert!(calculate(&blank).is_err());
    }

    #[test]
    fn conflicted_item_is_a_data_error() {
        let context = MetadataContext::from_pairs([("Cruise_ID", CONFLICT_STRING)]);
        let err = calculate(&context).unwrap_err();
        assert!(err.to_string().contains("conflicting"));
    }
}
