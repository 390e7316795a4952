//! Error types for the metadata model.

use thiserror::Error;

/// Errors raised while building, parsing or merging metadata variables.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// A second observation was offered for an identity field.
    #[error(
        "cannot add a second observation to identifier '{field}' of {variable}: \
         existing '{existing}', attempted '{attempted}'"
    )]
    Conflict {
        variable: String,
        field: String,
        existing: String,
        attempted: String,
    },

    /// A collection handed to the merge holds two variables with the same identity.
    #[error("duplicate {variable} with identity [{identity}] in merge input")]
    DuplicateIdentity { variable: String, identity: String },

    /// The XML reader or writer failed.
    #[error("xml error: {0}")]
    Xml(String),

    /// The document parsed but does not have the expected shape.
    #[error("malformed metadata document: {0}")]
    MalformedDocument(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetadataError {
    pub(crate) fn xml(error: impl std::fmt::Display) -> Self {
        Self::Xml(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MetadataError>;
