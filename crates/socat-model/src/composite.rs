//! Composite variables: groups of fields merged and reported as one unit.

use tracing::trace;

use crate::document::Element;
use crate::error::{MetadataError, Result};
use crate::path::ElementPath;
use crate::value::Value;

/// Child element used to list each observation of a conflicted field.
pub const CONFLICT_VALUE_ELEMENT: &str = "Value";

/// A named group of [`Value`]s identified by a subset of its fields.
///
/// Identity fields are single-valued: they are what lets two submissions of
/// the same investigator or variable be matched during a merge, so a second
/// distinct observation is rejected instead of turned into a conflict.
#[derive(Debug, Clone)]
pub struct CompositeVariable {
    path: ElementPath,
    identity_fields: Vec<String>,
    values: Vec<Value>,
}

impl CompositeVariable {
    pub fn new<I, S>(path: ElementPath, identity_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields: Vec<String> = Vec::new();
        for field in identity_fields {
            let field = field.into();
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        Self {
            path,
            identity_fields: fields,
            values: Vec::new(),
        }
    }

    pub fn path(&self) -> &ElementPath {
        &self.path
    }

    pub fn identity_fields(&self) -> &[String] {
        &self.identity_fields
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn is_identity_field(&self, name: &str) -> bool {
        self.identity_fields.iter().any(|field| field == name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|value| value.name() == name)
    }

    /// Canonical value of the named field, or `""` when the field is absent.
    pub fn get_value(&self, name: &str) -> &str {
        self.value(name).map_or("", Value::canonical_value)
    }

    /// Canonical value of the named field, or `None` when the field is absent.
    pub fn find_value(&self, name: &str) -> Option<&str> {
        self.value(name).map(Value::canonical_value)
    }

    /// Records an observation for `name`. `None` is ignored.
    ///
    /// Fails with [`MetadataError::Conflict`] when `name` is an identity field
    /// that already holds a different observation; the variable is unchanged
    /// in that case. Re-adding the identity field's current text is accepted
    /// and leaves it with one observation.
    pub fn add_value(&mut self, name: &str, text: Option<&str>) -> Result<()> {
        let Some(text) = text else {
            return Ok(());
        };
        match self.values.iter().position(|value| value.name() == name) {
            Some(index) => {
                self.check_identity_lock(&self.values[index], text)?;
                self.values[index].add_value(text);
            }
            None => self.values.push(Value::with_observation(name, text)),
        }
        Ok(())
    }

    /// Records the trimmed text of `source`'s child named `name`, if present.
    pub fn add_value_from(&mut self, name: &str, source: &Element) -> Result<()> {
        match source.child_text(name) {
            Some(text) => self.add_value(name, Some(text)),
            None => Ok(()),
        }
    }

    /// Merges whole fields into this variable, uniting observations by name.
    ///
    /// The identity lock is checked for the entire batch before anything is
    /// applied.
    pub fn add_values<'a, I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let values: Vec<&Value> = values.into_iter().collect();
        let mut staged = self.clone();
        for incoming in values {
            match staged
                .values
                .iter()
                .position(|value| value.name() == incoming.name())
            {
                Some(index) => {
                    for text in incoming.observations() {
                        staged.check_identity_lock(&staged.values[index], text)?;
                        staged.values[index].add_value(text);
                    }
                }
                None => {
                    if staged.is_identity_field(incoming.name()) && incoming.is_conflicted() {
                        return Err(staged.conflict_error(
                            incoming.name(),
                            &incoming.observations()[0],
                            &incoming.observations()[1],
                        ));
                    }
                    staged.values.push(incoming.clone());
                }
            }
        }
        self.values = staged.values;
        Ok(())
    }

    pub fn has_conflict(&self) -> bool {
        self.values.iter().any(Value::is_conflicted)
    }

    /// Identity field values in declaration order, `""` for unset fields.
    pub fn identity(&self) -> Vec<&str> {
        self.identity_fields
            .iter()
            .map(|field| self.get_value(field))
            .collect()
    }

    /// One element named after the path, one child per field holding its
    /// canonical value.
    pub fn to_record(&self) -> Element {
        let mut node = Element::new(self.path.element_name());
        for value in &self.values {
            node.push_child(Element::with_text(value.name(), value.canonical_value()));
        }
        node
    }

    /// Conflict record for this variable, or `None` when nothing conflicts.
    ///
    /// The record carries the identity fields as attributes and, for every
    /// conflicted field, a child listing each observation. It is returned
    /// inside the `Conflict` container built from the variable's path.
    pub fn to_conflict_record(&self) -> Option<Element> {
        if !self.has_conflict() {
            return None;
        }
        let mut node = Element::new(self.path.element_name());
        for field in &self.identity_fields {
            node.set_attribute(field.as_str(), self.get_value(field));
        }
        for value in self.values.iter().filter(|value| value.is_conflicted()) {
            let mut field = Element::new(value.name());
            for observation in value.observations() {
                field.push_child(Element::with_text(CONFLICT_VALUE_ELEMENT, observation.as_str()));
            }
            node.push_child(field);
        }
        trace!(path = %self.path, "built conflict record");
        Some(self.path.conflict_container(node))
    }

    fn check_identity_lock(&self, existing: &Value, text: &str) -> Result<()> {
        if self.is_identity_field(existing.name())
            && existing.observation_count() > 0
            && existing.would_add(text)
        {
            return Err(self.conflict_error(existing.name(), existing.canonical_value(), text));
        }
        Ok(())
    }

    fn conflict_error(&self, field: &str, existing: &str, attempted: &str) -> MetadataError {
        MetadataError::Conflict {
            variable: self.path.to_string(),
            field: field.to_string(),
            existing: existing.to_string(),
            attempted: attempted.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CONFLICT_STRING;

    fn station() -> CompositeVariable {
        CompositeVariable::new(ElementPath::root("x_tags").child("Station"), ["Station"])
    }

    #[test]
    fn identity_double_write_is_rejected() {
        let mut variable =
            CompositeVariable::new(ElementPath::root("Cruise"), ["CRUISE_ID"]);
        variable.add_value("CRUISE_ID", Some("A")).unwrap();
        let err = variable.add_value("CRUISE_ID", Some("B")).unwrap_err();
        assert!(matches!(err, MetadataError::Conflict { ref field, .. } if field == "CRUISE_ID"));
        assert_eq!(variable.get_value("CRUISE_ID"), "A");
        assert_eq!(variable.value("CRUISE_ID").unwrap().observation_count(), 1);
    }

    #[test]
    fn identity_repeat_of_same_text_is_accepted() {
        let mut variable = station();
        variable.add_value("Station", Some("1")).unwrap();
        variable.add_value("Station", Some("1")).unwrap();
        assert_eq!(variable.get_value("Station"), "1");
    }

    #[test]
    fn none_is_a_no_op() {
        let mut variable = station();
        variable.add_value("Depth", None).unwrap();
        assert!(variable.values().is_empty());
        assert_eq!(variable.get_value("Depth"), "");
        assert_eq!(variable.find_value("Depth"), None);
    }

    #[test]
    fn non_identity_fields_collect_conflicts() {
        let mut variable = station();
        variable.add_value("Station", Some("1")).unwrap();
        variable.add_value("Depth", Some("10")).unwrap();
        assert!(!variable.has_conflict());
        variable.add_value("Depth", Some("20")).unwrap();
        assert!(variable.has_conflict());
        assert_eq!(variable.get_value("Depth"), CONFLICT_STRING);
    }

    #[test]
    fn add_value_from_reads_child_text() {
        let source = Element::new("Station")
            .with_child(Element::with_text("Station", " 7 "))
            .with_child(Element::new("Depth"));
        let mut variable = station();
        variable.add_value_from("Station", &source).unwrap();
        variable.add_value_from("Depth", &source).unwrap();
        variable.add_value_from("Salinity", &source).unwrap();
        assert_eq!(variable.get_value("Station"), "7");
        assert_eq!(variable.find_value("Depth"), Some(""));
        assert!(variable.value("Salinity").is_none());
    }

    #[test]
    fn add_values_unites_and_inserts() {
        let mut variable = station();
        variable.add_value("Station", Some("1")).unwrap();
        variable.add_value("Depth", Some("10")).unwrap();
        let incoming = [
            Value::with_observation("Station", "1"),
            Value::with_observation("Depth", "20"),
            Value::with_observation("Salinity", "35"),
        ];
        variable.add_values(&incoming).unwrap();
        assert_eq!(variable.value("Depth").unwrap().observations(), ["10", "20"]);
        assert_eq!(variable.get_value("Salinity"), "35");
        let names: Vec<&str> = variable.values().iter().map(Value::name).collect();
        assert_eq!(names, ["Station", "Depth", "Salinity"]);
    }

    #[test]
    fn add_values_is_all_or_nothing() {
        let mut variable = station();
        variable.add_value("Station", Some("1")).unwrap();
        let incoming = [
            Value::with_observation("Depth", "10"),
            Value::with_observation("Station", "2"),
        ];
        assert!(variable.add_values(&incoming).is_err());
        assert!(variable.value("Depth").is_none());
        assert_eq!(variable.get_value("Station"), "1");
    }

    #[test]
    fn clone_does_not_alias_values() {
        let mut original = station();
        original.add_value("Depth", Some("10")).unwrap();
        let mut copy = original.clone();
        copy.add_value("Depth", Some("20")).unwrap();
        copy.add_value("Salinity", Some("35")).unwrap();
        assert_eq!(original.get_value("Depth"), "10");
        assert!(original.value("Salinity").is_none());
        assert!(original.path().ptr_eq(copy.path()));
    }

    #[test]
    fn record_lists_canonical_values() {
        let mut variable = station();
        variable.add_value("Station", Some("1")).unwrap();
        variable.add_value("Depth", Some("10")).unwrap();
        variable.add_value("Depth", Some("20")).unwrap();
        let record = variable.to_record();
        assert_eq!(record.name(), "Station");
        assert_eq!(record.child_text("Station"), Some("1"));
        assert_eq!(record.child_text("Depth"), Some(CONFLICT_STRING));
    }

    #[test]
    fn conflict_record_only_when_conflicted() {
        let mut variable = CompositeVariable::new(
            ElementPath::root("x_tags").child("Investigator"),
            ["Name", "Organization"],
        );
        variable.add_value("Name", Some("Jane Doe")).unwrap();
        variable.add_value("Email", Some("jane@example.org")).unwrap();
        assert!(variable.to_conflict_record().is_none());

        variable.add_value("Email", Some("jdoe@example.org")).unwrap();
        let container = variable.to_conflict_record().unwrap();
        assert_eq!(container.name(), "Conflict");
        let node = container.child("Investigator").unwrap();
        assert_eq!(node.attribute("Name"), Some("Jane Doe"));
        assert_eq!(node.attribute("Organization"), Some(""));
        let email = node.child("Email").unwrap();
        let listed: Vec<&str> = email
            .children_named(CONFLICT_VALUE_ELEMENT)
            .filter_map(Element::text)
            .collect();
        assert_eq!(listed, ["jane@example.org", "jdoe@example.org"]);
        assert!(node.child("Name").is_none());
    }
}
