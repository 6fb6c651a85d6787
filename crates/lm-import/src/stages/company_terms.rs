//! Company ↔ group-type link stage: `nmda_companygrouptype` attaches the
//! mapped group-type term to the mapped company. Link rows referencing an
//! unmapped company or group type are skipped with a warning.

use crate::context::RunContext;
use crate::error::ImportResult;
use lm_core::{RowOutcome, Stage, StageReport};

pub const GROUP_TYPE_TAXONOMY: &str = "group_type";

pub fn run(ctx: &RunContext<'_>) -> ImportResult<StageReport> {
    let stage = Stage::CompanyTerms;
    let mut report = StageReport::new(stage);
    let rows = ctx.load_stage_rows(stage, &mut report)?;
    let mappings = ctx.mappings();

    for row in &rows {
        let (Some(company_ref), Some(group_ref)) =
            (row.id_col("CompanyId"), row.id_col("GroupTypeId"))
        else {
            log::warn!("company-terms: link row missing CompanyId or GroupTypeId, skipping");
            report.record(RowOutcome::Skipped);
            continue;
        };

        let Some(company_id) = mappings.get(&company_ref, "company")? else {
            log::warn!("company-terms: company {company_ref} not mapped, skipping link");
            report.warn();
            report.record(RowOutcome::Skipped);
            continue;
        };
        let Some(term_id) = mappings.get(&group_ref, "group_type_term")? else {
            log::warn!("company-terms: group type {group_ref} not mapped, skipping link");
            report.warn();
            report.record(RowOutcome::Skipped);
            continue;
        };

        let Some(term) = ctx.db.entity_title(term_id)? else {
            log::warn!("company-terms: term entity {term_id} has no title, skipping link");
            report.record(RowOutcome::Error);
            continue;
        };

        let existing = ctx.db.entity_terms(company_id, GROUP_TYPE_TAXONOMY)?;
        if existing.contains(&term) {
            report.record(RowOutcome::Skipped);
            continue;
        }

        if !ctx.writes_enabled() {
            log::debug!("dry-run: would attach '{term}' to company {company_id}");
            report.record(RowOutcome::Created);
            continue;
        }

        ctx.db.add_entity_term(company_id, GROUP_TYPE_TAXONOMY, &term)?;
        report.record(RowOutcome::Created);
    }

    report.finish();
    log::info!("{report}");
    Ok(report)
}

#[cfg(test)]
#[path = "company_terms_test.rs"]
mod tests;
