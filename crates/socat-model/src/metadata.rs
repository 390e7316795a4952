//! OME cruise metadata documents.
//!
//! A document is split into sections. Singular sections (the submitting
//! user, the vessel, the cruise) hold one variable with no identity fields,
//! so two documents always merge them field by field. Repeated sections
//! (investigators, data-file variables) hold one variable per element,
//! matched across documents by their identity fields.

use tracing::{debug, info};

use crate::composite::CompositeVariable;
use crate::document::Element;
use crate::error::{MetadataError, Result};
use crate::merge::merge_variables;
use crate::path::ElementPath;

/// Root element of an OME metadata document.
pub const ROOT_ELEMENT: &str = "x_tags";

/// Root element of a conflicts document.
pub const CONFLICTS_ELEMENT: &str = "Conflicts";

/// Layout of one section of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    /// Element names below the root, ending with the section element.
    pub segments: &'static [&'static str],
    /// Fields identifying an element of a repeated section.
    pub identity: &'static [&'static str],
    pub repeated: bool,
}

/// Sections in document order.
pub const SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        segments: &["User"],
        identity: &[],
        repeated: false,
    },
    SectionSpec {
        segments: &["Investigator"],
        identity: &["Name"],
        repeated: true,
    },
    SectionSpec {
        segments: &["Dataset_Info"],
        identity: &[],
        repeated: false,
    },
    SectionSpec {
        segments: &["Cruise_Info", "Experiment"],
        identity: &[],
        repeated: false,
    },
    SectionSpec {
        segments: &["Cruise_Info", "Experiment", "Cruise"],
        identity: &[],
        repeated: false,
    },
    SectionSpec {
        segments: &["Cruise_Info", "Vessel"],
        identity: &[],
        repeated: false,
    },
    SectionSpec {
        segments: &["Variables_Info", "Variable"],
        identity: &["Variable_Name"],
        repeated: true,
    },
];

/// Variables parsed from one section.
#[derive(Debug, Clone)]
pub struct MetadataSection {
    spec: SectionSpec,
    path: ElementPath,
    variables: Vec<CompositeVariable>,
}

impl MetadataSection {
    fn new(spec: SectionSpec) -> Self {
        let mut path = ElementPath::root(ROOT_ELEMENT);
        for segment in spec.segments {
            path = path.child(*segment);
        }
        Self {
            spec,
            path,
            variables: Vec::new(),
        }
    }

    pub fn spec(&self) -> &SectionSpec {
        &self.spec
    }

    pub fn path(&self) -> &ElementPath {
        &self.path
    }

    pub fn variables(&self) -> &[CompositeVariable] {
        &self.variables
    }

    pub fn conflict_count(&self) -> usize {
        self.variables.iter().filter(|v| v.has_conflict()).count()
    }

    fn new_variable(&self) -> CompositeVariable {
        CompositeVariable::new(self.path.clone(), self.spec.identity.iter().copied())
    }

    fn parse(&mut self, root: &Element) -> Result<()> {
        let Some((name, parents)) = self.spec.segments.split_last() else {
            return Ok(());
        };
        let Some(parent) = root.descend(parents) else {
            return Ok(());
        };
        let mut singular: Option<CompositeVariable> = None;
        for node in parent.children_named(name) {
            let variable = if self.spec.repeated {
                self.variables.push(self.new_variable());
                self.variables.last_mut()
            } else {
                Some(singular.get_or_insert_with(|| self.new_variable()))
            };
            let Some(variable) = variable else {
                continue;
            };
            let mut seen: Vec<&str> = Vec::new();
            for field in node.children().iter().filter(|c| c.children().is_empty()) {
                if seen.contains(&field.name()) {
                    continue;
                }
                seen.push(field.name());
                variable.add_value_from(field.name(), node)?;
            }
        }
        if let Some(variable) = singular {
            self.variables.push(variable);
        }
        Ok(())
    }
}

/// A parsed OME metadata document.
#[derive(Debug, Clone)]
pub struct OmeMetadata {
    sections: Vec<MetadataSection>,
}

impl Default for OmeMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl OmeMetadata {
    /// A document with every section empty.
    pub fn new() -> Self {
        Self {
            sections: SECTIONS.iter().copied().map(MetadataSection::new).collect(),
        }
    }

    pub fn from_element(root: &Element) -> Result<Self> {
        if root.name() != ROOT_ELEMENT {
            return Err(MetadataError::MalformedDocument(format!(
                "expected <{ROOT_ELEMENT}> root, found <{}>",
                root.name()
            )));
        }
        let mut metadata = Self::new();
        for section in &mut metadata.sections {
            section.parse(root)?;
        }
        debug!(
            variables = metadata.variable_count(),
            "parsed metadata document"
        );
        Ok(metadata)
    }

    pub fn parse_xml(xml: &str) -> Result<Self> {
        Self::from_element(&Element::parse_xml(xml)?)
    }

    pub fn sections(&self) -> &[MetadataSection] {
        &self.sections
    }

    /// Section whose path (below the root) is `segments`.
    pub fn section(&self, segments: &[&str]) -> Option<&MetadataSection> {
        self.sections
            .iter()
            .find(|section| section.spec.segments == segments)
    }

    pub fn variable_count(&self) -> usize {
        self.sections.iter().map(|s| s.variables.len()).sum()
    }

    pub fn has_conflicts(&self) -> bool {
        self.sections
            .iter()
            .any(|section| section.variables.iter().any(CompositeVariable::has_conflict))
    }

    /// Merges a newer document into this one, section by section.
    pub fn merge(&self, newer: &OmeMetadata) -> Result<OmeMetadata> {
        let mut sections = Vec::with_capacity(self.sections.len());
        for (older, newer) in self.sections.iter().zip(&newer.sections) {
            let variables = merge_variables(&older.variables, &newer.variables)?;
            sections.push(MetadataSection {
                spec: older.spec,
                path: older.path.clone(),
                variables,
            });
        }
        let merged = OmeMetadata { sections };
        info!(
            variables = merged.variable_count(),
            conflicted = merged.sections.iter().map(MetadataSection::conflict_count).sum::<usize>(),
            "merged metadata documents"
        );
        Ok(merged)
    }

    /// The document with conflicted fields shown as the conflict marker.
    pub fn to_element(&self) -> Element {
        let mut root = Element::new(ROOT_ELEMENT);
        for section in &self.sections {
            let Some((_, parents)) = section.spec.segments.split_last() else {
                continue;
            };
            for variable in &section.variables {
                root.descend_mut(parents).push_child(variable.to_record());
            }
        }
        root
    }

    /// Every conflict record, under a `Conflicts` root.
    pub fn conflicts_element(&self) -> Element {
        let mut root = Element::new(CONFLICTS_ELEMENT);
        for variable in self.sections.iter().flat_map(|s| s.variables.iter()) {
            if let Some(record) = variable.to_conflict_record() {
                root.push_child(record);
            }
        }
        root
    }

    /// Field name and canonical value of every singular section field.
    pub fn simple_values(&self) -> Vec<(String, String)> {
        self.sections
            .iter()
            .filter(|section| !section.spec.repeated)
            .flat_map(|section| section.variables.iter())
            .flat_map(|variable| variable.values())
            .map(|value| (value.name().to_string(), value.canonical_value().to_string()))
            .collect()
    }
}
