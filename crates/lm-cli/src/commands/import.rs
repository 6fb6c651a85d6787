//! Import command implementation

use crate::cli::{GlobalArgs, ImportArgs, ImportTarget};
use crate::commands::common::{self, ExitCode};
use anyhow::{Context, Result};
use lm_core::{Stage, StageReport};
use lm_import::RunContext;
use std::path::{Path, PathBuf};

/// Execute the import command
pub(crate) fn execute(args: &ImportArgs, global: &GlobalArgs) -> Result<()> {
    let workspace = common::open_workspace(global)?;
    if !global.execute {
        println!("Dry run - no changes will be written (pass --execute to apply)\n");
    }

    match &args.target {
        ImportTarget::All => {
            let ctx = workspace.context(global);
            let report = lm_import::run_all(&ctx)?;
            print!("{report}");

            let path = report_path(global, &report.run_id);
            report
                .save(&path)
                .with_context(|| format!("saving report to {}", path.display()))?;
            println!("Report saved to {}", path.display());

            if report.has_errors() {
                return Err(ExitCode(1).into());
            }
            Ok(())
        }
        ImportTarget::Csr(csr) => {
            let ctx = workspace.context(global);
            let mut reports = Vec::new();
            for csr_type in csr.csr_type.types() {
                reports.push(lm_import::run_stage(&ctx, Stage::Csr(csr_type))?);
            }
            finish(&reports)
        }
        ImportTarget::Addresses(addr) => {
            let ctx = workspace.context(global).with_backfill(addr.backfill);
            run_single(&ctx, Stage::Addresses)
        }
        ImportTarget::GroupTypes => run_single(&workspace.context(global), Stage::GroupTypes),
        ImportTarget::Companies => run_single(&workspace.context(global), Stage::Companies),
        ImportTarget::CompanyTerms => {
            run_single(&workspace.context(global), Stage::CompanyTerms)
        }
        ImportTarget::Users => run_single(&workspace.context(global), Stage::Users),
        ImportTarget::Businesses => run_single(&workspace.context(global), Stage::Businesses),
    }
}

fn run_single(ctx: &RunContext<'_>, stage: Stage) -> Result<()> {
    let report = lm_import::run_stage(ctx, stage)?;
    finish(&[report])
}

/// Print stage summaries; row-level errors make the command exit non-zero
fn finish(reports: &[StageReport]) -> Result<()> {
    for report in reports {
        println!("{report}");
    }
    if reports.iter().any(|r| r.errors > 0) {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

/// Where the aggregated run report lands: `target/loam/<run_id>.json`
fn report_path(global: &GlobalArgs, run_id: &str) -> PathBuf {
    Path::new(&global.project_dir)
        .join("target")
        .join("loam")
        .join(format!("{run_id}.json"))
}
