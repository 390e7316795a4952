//! Multi-valued metadata fields.

use serde::{Deserialize, Serialize};

/// Canonical value reported for a field holding two or more distinct observations.
pub const CONFLICT_STRING: &str = "%%CONFLICT%%";

/// A named metadata field holding every distinct text observed for it.
///
/// Observations keep their arrival order and are deduplicated by exact
/// textual equality, so a field only becomes conflicted when two sources
/// genuinely disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    name: String,
    observations: Vec<String>,
}

impl Value {
    /// Creates a field with no observations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            observations: Vec::new(),
        }
    }

    /// Creates a field holding a single observation.
    pub fn with_observation(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            observations: vec![text.into()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends `text` unless it has already been observed.
    pub fn add_value(&mut self, text: &str) {
        if !self.observations.iter().any(|existing| existing == text) {
            self.observations.push(text.to_string());
        }
    }

    /// Appends each observation in order, skipping ones already present.
    pub fn add_values<I, S>(&mut self, observations: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for text in observations {
            self.add_value(text.as_ref());
        }
    }

    /// Empty string, the sole observation, or [`CONFLICT_STRING`].
    pub fn canonical_value(&self) -> &str {
        match self.observations.as_slice() {
            [] => "",
            [only] => only,
            _ => CONFLICT_STRING,
        }
    }

    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    pub fn observations(&self) -> &[String] {
        &self.observations
    }

    pub fn is_conflicted(&self) -> bool {
        self.observations.len() > 1
    }

    /// Whether `text` would be new to this field.
    pub(crate) fn would_add(&self, text: &str) -> bool {
        !self.observations.iter().any(|existing| existing == text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_is_blank() {
        let value = Value::new("Vessel_Name");
        assert_eq!(value.observation_count(), 0);
        assert_eq!(value.canonical_value(), "");
        assert!(!value.is_conflicted());
    }

    #[test]
    fn duplicate_observations_are_suppressed() {
        let mut value = Value::with_observation("Vessel_Name", "Ronald H. Brown");
        value.add_value("Ronald H. Brown");
        value.add_values(["Ronald H. Brown"]);
        assert_eq!(value.observation_count(), 1);
        assert_eq!(value.canonical_value(), "Ronald H. Brown");
    }

    #[test]
    fn second_distinct_observation_conflicts() {
        let mut value = Value::with_observation("Depth", "10");
        value.add_value("20");
        assert_eq!(value.observations(), ["10", "20"]);
        assert_eq!(value.canonical_value(), CONFLICT_STRING);
        assert!(value.is_conflicted());
    }

    #[test]
    fn observations_are_case_sensitive() {
        let mut value = Value::with_observation("Country", "USA");
        value.add_value("usa");
        assert_eq!(value.observation_count(), 2);
    }

    #[test]
    fn clone_is_independent() {
        let original = Value::with_observation("Depth", "10");
        let mut copy = original.clone();
        copy.add_value("20");
        assert_eq!(original.observation_count(), 1);
        assert_eq!(copy.observation_count(), 2);
        assert_eq!(copy.name(), "Depth");
    }
}
