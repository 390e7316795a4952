//! Error types for the sanity checker.

use thiserror::Error;

/// Errors raised while converting or deriving column values.
#[derive(Debug, Error)]
pub enum SanityError {
    /// A value could not be parsed for a numeric unit conversion.
    #[error("cannot convert '{value}' from {unit}: {reason}")]
    Conversion {
        value: String,
        unit: String,
        reason: String,
    },

    /// A calculated column could not be derived for a record.
    #[error("cannot calculate {column}: {message}")]
    Data { column: String, message: String },

    /// No registered converter accepts the unit.
    #[error("unsupported unit '{0}'")]
    UnsupportedUnit(String),

    /// A record has more cells than the header names.
    #[error("line {line}: {count} cell(s) beyond the header: {cells}")]
    ExtraFields {
        line: usize,
        count: usize,
        cells: String,
    },

    /// A configured column is absent from the data file header.
    #[error("column '{0}' not found in data file")]
    MissingColumn(String),

    /// The column configuration is inconsistent.
    #[error("invalid column configuration: {0}")]
    Config(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SanityError {
    pub(crate) fn data(column: &str, message: impl Into<String>) -> Self {
        Self::Data {
            column: column.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SanityError>;
