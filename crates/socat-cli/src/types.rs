use std::path::PathBuf;

use socat_model::OmeMetadata;
use socat_sanity::CheckedTable;

/// Inputs of a metadata merge.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    /// Metadata documents, oldest first.
    pub sources: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub conflicts_output: Option<PathBuf>,
}

#[derive(Debug)]
pub struct MergeResult {
    pub merged: OmeMetadata,
    pub sources: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    /// Set only when conflicts were found and a path was requested.
    pub conflicts_output: Option<PathBuf>,
    pub sections: Vec<SectionSummary>,
    pub has_conflicts: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub section: String,
    pub variables: usize,
    pub conflicts: usize,
}

/// Inputs of a data file sanity check.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub data_file: PathBuf,
    pub columns: PathBuf,
    pub metadata: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

#[derive(Debug)]
pub struct CheckResult {
    pub data_file: PathBuf,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub table: CheckedTable,
}
