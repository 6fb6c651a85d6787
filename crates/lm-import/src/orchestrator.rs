//! Stage sequencing.
//!
//! Stages run strictly sequentially in dependency order; any fatal error
//! aborts the whole invocation since later stages would produce
//! meaningless results without their predecessors' mappings.

use crate::context::RunContext;
use crate::error::ImportResult;
use crate::stages;
use crate::stages::businesses::BusinessImporter;
use lm_core::{MigrationReport, Stage, StageReport};

/// Run a single stage.
pub fn run_stage(ctx: &RunContext<'_>, stage: Stage) -> ImportResult<StageReport> {
    match stage {
        Stage::GroupTypes => stages::group_types::run(ctx),
        Stage::Companies => stages::companies::run(ctx),
        Stage::CompanyTerms => stages::company_terms::run(ctx),
        Stage::Users => stages::users::run(ctx),
        Stage::Businesses => stages::businesses::run(ctx),
        Stage::Addresses => stages::addresses::run(ctx),
        Stage::Csr(csr_type) => stages::csr::run(ctx, csr_type),
    }
}

/// Run every stage in dependency order, aggregating per-stage reports.
pub fn run_all(ctx: &RunContext<'_>) -> ImportResult<MigrationReport> {
    let mut report = MigrationReport::new(ctx.mode);
    for stage in Stage::all() {
        log::info!("Running stage {stage} ({})", ctx.mode);
        report.push(run_stage(ctx, stage)?);
    }
    report.finish();
    Ok(report)
}

/// Update-only refresh of derivable business data. Never creates entities.
pub fn sync(ctx: &RunContext<'_>) -> ImportResult<StageReport> {
    BusinessImporter::update_only().run(ctx)
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
