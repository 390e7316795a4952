//! Merge and check pipelines behind the CLI subcommands.
//!
//! Both pipelines follow the same stages:
//! 1. **Load**: read metadata documents and configuration
//! 2. **Process**: merge documents, or normalize the data file
//! 3. **Output**: write the merged/normalized files and reports

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span, warn};

use socat_model::{Element, OmeMetadata};
use socat_sanity::{ColumnConfig, MetadataContext, SanityChecker, default_registry};

use crate::types::{CheckRequest, CheckResult, MergeRequest, MergeResult, SectionSummary};

/// Reads and parses one OME metadata document.
pub fn load_metadata(path: &Path) -> Result<OmeMetadata> {
    let xml = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    OmeMetadata::parse_xml(&xml).with_context(|| format!("parse {}", path.display()))
}

/// Writes `element` as an XML document, creating parent directories.
pub fn write_document(element: &Element, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    element
        .write_xml(BufWriter::new(file))
        .with_context(|| format!("write {}", path.display()))
}

/// Merges the documents in order; later documents are treated as newer.
pub fn merge_documents(documents: &[OmeMetadata]) -> Result<OmeMetadata> {
    let mut iter = documents.iter();
    let Some(first) = iter.next() else {
        bail!("no metadata documents supplied");
    };
    let mut merged = first.clone();
    for (index, newer) in iter.enumerate() {
        merged = merged
            .merge(newer)
            .with_context(|| format!("merge document {}", index + 2))?;
    }
    Ok(merged)
}

pub fn section_summaries(metadata: &OmeMetadata) -> Vec<SectionSummary> {
    metadata
        .sections()
        .iter()
        .map(|section| SectionSummary {
            section: section.spec().segments.join("/"),
            variables: section.variables().len(),
            conflicts: section.conflict_count(),
        })
        .collect()
}

pub fn run_merge(request: &MergeRequest) -> Result<MergeResult> {
    let span = info_span!("merge", sources = request.sources.len());
    let _guard = span.enter();

    let load_start = Instant::now();
    let documents = request
        .sources
        .iter()
        .map(|path| load_metadata(path))
        .collect::<Result<Vec<_>>>()?;
    debug!(
        documents = documents.len(),
        duration_ms = load_start.elapsed().as_millis(),
        "loaded metadata documents"
    );

    let merged = merge_documents(&documents)?;
    let has_conflicts = merged.has_conflicts();

    if let Some(path) = &request.output {
        write_document(&merged.to_element(), path)?;
        info!(path = %path.display(), "wrote merged metadata");
    }
    let mut conflicts_output = None;
    if has_conflicts {
        warn!("merged metadata has conflicting values");
        if let Some(path) = &request.conflicts_output {
            write_document(&merged.conflicts_element(), path)?;
            info!(path = %path.display(), "wrote conflict report");
            conflicts_output = Some(path.clone());
        }
    }

    Ok(MergeResult {
        sections: section_summaries(&merged),
        merged,
        sources: request.sources.clone(),
        output: request.output.clone(),
        conflicts_output,
        has_conflicts,
    })
}

pub fn run_check(request: &CheckRequest) -> Result<CheckResult> {
    let span = info_span!("check", data_file = %request.data_file.display());
    let _guard = span.enter();

    let config = ColumnConfig::load(&request.columns)
        .with_context(|| format!("load {}", request.columns.display()))?;
    let metadata = match &request.metadata {
        Some(path) => MetadataContext::from_metadata(&load_metadata(path)?),
        None => MetadataContext::new(),
    };
    debug!(items = metadata.len(), "metadata context ready");

    let checker = SanityChecker::from_config(config, default_registry())
        .with_context(|| format!("configure columns from {}", request.columns.display()))?;
    let table = checker
        .check_path(&request.data_file, &metadata)
        .with_context(|| format!("check {}", request.data_file.display()))?;

    if let Some(path) = &request.output {
        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        table
            .write_csv(BufWriter::new(file))
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), rows = table.rows.len(), "wrote normalized data");
    }
    if let Some(path) = &request.report {
        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &table.issues)
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), issues = table.issues.len(), "wrote issue report");
    }

    Ok(CheckResult {
        data_file: request.data_file.clone(),
        output: request.output.clone(),
        report: request.report.clone(),
        table,
    })
}
