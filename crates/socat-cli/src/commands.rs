use anyhow::Result;

use socat_cli::pipeline::{run_check, run_merge};
use socat_cli::types::{CheckRequest, CheckResult, MergeRequest, MergeResult};
use socat_sanity::default_registry;

use crate::cli::{CheckArgs, MergeArgs};
use crate::summary::print_units;

pub fn run_merge_command(args: &MergeArgs) -> Result<MergeResult> {
    run_merge(&MergeRequest {
        sources: args.files.clone(),
        output: args.output.clone(),
        conflicts_output: args.conflicts.clone(),
    })
}

pub fn run_check_command(args: &CheckArgs) -> Result<CheckResult> {
    run_check(&CheckRequest {
        data_file: args.data_file.clone(),
        columns: args.columns.clone(),
        metadata: args.metadata.clone(),
        output: args.output.clone(),
        report: args.report.clone(),
    })
}

pub fn run_units() -> Result<()> {
    print_units(default_registry());
    Ok(())
}
