//! Metadata model for SOCAT cruise submissions.
//!
//! Metadata arrives from several sources (repeated uploads, user edits,
//! previously archived documents). Each field keeps every distinct value it
//! was given so disagreements can be surfaced instead of silently
//! overwritten:
//!
//! - [`Value`]: one field and its distinct observations
//! - [`CompositeVariable`]: fields merged and reported as one unit
//! - [`merge_variables`]: identity-matched merge of two collections
//! - [`OmeMetadata`]: a whole OME document built from composite variables

pub mod composite;
pub mod document;
pub mod error;
pub mod merge;
pub mod metadata;
pub mod path;
pub mod value;

pub use composite::{CONFLICT_VALUE_ELEMENT, CompositeVariable};
pub use document::Element;
pub use error::{MetadataError, Result};
pub use merge::{merge_variables, same_identity};
pub use metadata::{CONFLICTS_ELEMENT, MetadataSection, OmeMetadata, ROOT_ELEMENT, SECTIONS, SectionSpec};
pub use path::{CONFLICT_ELEMENT, ElementPath};
pub use value::{CONFLICT_STRING, Value};
