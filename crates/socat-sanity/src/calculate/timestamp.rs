use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Result, SanityError};

use super::{DataCalculator, DataRecord, MetadataContext};

/// Builds an ISO 8601 UTC timestamp from separate date and time columns.
///
/// Seconds are optional and may carry a fraction, which is dropped.
#[derive(Debug, Clone)]
pub struct TimestampCalculator {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub minute: String,
    pub second: Option<String>,
}

impl TimestampCalculator {
    fn part(&self, record: &DataRecord<'_>, source: &str, column_name: &str) -> Result<u32> {
        let raw = record
            .value(source)
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| {
                SanityError::data(
                    column_name,
                    format!("line {}: {source} is missing", record.line()),
                )
            })?;
        raw.parse::<u32>().map_err(|_| {
            SanityError::data(
                column_name,
                format!("line {}: {source} value '{raw}' is not a whole number", record.line()),
            )
        })
    }

    fn seconds(&self, record: &DataRecord<'_>, column_name: &str) -> Result<u32> {
        let Some(source) = &self.second else {
            return Ok(0);
        };
        let raw = record.value(source).map(str::trim).unwrap_or("");
        if raw.is_empty() {
            return Ok(0);
        }
        match raw.parse::<f64>() {
            Ok(seconds) if (0.0..60.0).contains(&seconds) => Ok(seconds.trunc() as u32),
            _ => Err(SanityError::data(
                column_name,
                format!("line {}: {source} value '{raw}' is not valid seconds", record.line()),
            )),
        }
    }
}

impl DataCalculator for TimestampCalculator {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn calculate_data_value(
        &self,
        _metadata: &MetadataContext,
        record: &DataRecord<'_>,
        _column_index: usize,
        column_name: &str,
    ) -> Result<String> {
        let year = self.part(record, &self.year, column_name)?;
        let month = self.part(record, &self.month, column_name)?;
        let day = self.part(record, &self.day, column_name)?;
        let hour = self.part(record, &self.hour, column_name)?;
        let minute = self.part(record, &self.minute, column_name)?;
        let second = self.seconds(record, column_name)?;

        let date = i32::try_from(year)
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
            .ok_or_else(|| {
                SanityError::data(
                    column_name,
                    format!("line {}: invalid date {year}-{month}-{day}", record.line()),
                )
            })?;
        let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
            SanityError::data(
                column_name,
                format!("line {}: invalid time {hour}:{minute}:{second}", record.line()),
            )
        })?;
        Ok(NaiveDateTime::new(date, time)
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string())
    }
}
