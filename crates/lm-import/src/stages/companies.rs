//! Company stage: `nmda_company` → `company` entities.
//!
//! Contact details go into the entity field set; approval workflow state
//! comes from the legacy Approved/Denied flag pair. Contact fields are
//! never refreshed on re-runs so edits made in the CMS survive.

use crate::context::RunContext;
use crate::error::ImportResult;
use crate::stages::{approval_status, non_blank, try_create_entity};
use lm_core::{RowOutcome, Stage, StageReport};
use lm_store::NewEntity;

const KIND: &str = "company";

pub fn run(ctx: &RunContext<'_>) -> ImportResult<StageReport> {
    let stage = Stage::Companies;
    let mut report = StageReport::new(stage);
    let rows = ctx.load_stage_rows(stage, &mut report)?;
    let mappings = ctx.mappings();

    for row in &rows {
        let Some(legacy_id) = row.id_col("CompanyId") else {
            log::warn!("companies: row without CompanyId, skipping");
            report.record(RowOutcome::Skipped);
            continue;
        };
        let Some(name) = non_blank(row.str_col("Name")) else {
            log::warn!("companies: {legacy_id} has no name, skipping");
            report.record(RowOutcome::Skipped);
            continue;
        };

        if mappings.get(&legacy_id, KIND)?.is_some() {
            report.record(RowOutcome::Updated);
            continue;
        }

        if !ctx.writes_enabled() {
            log::debug!("dry-run: would create company '{name}'");
            report.record(RowOutcome::Created);
            continue;
        }

        let entity = NewEntity {
            kind: KIND,
            title: name,
            status: approval_status(row),
            fields: serde_json::json!({
                "legacy_id": legacy_id,
                "contact_name": non_blank(row.str_col("ContactName")),
                "email": non_blank(row.str_col("Email")),
                "phone": non_blank(row.str_col("Phone")),
                "website": non_blank(row.str_col("Website")),
            }),
        };
        match try_create_entity(ctx, &entity)? {
            Some(entity_id) => {
                mappings.set(&legacy_id, KIND, entity_id)?;
                report.record(RowOutcome::Created);
            }
            None => report.record(RowOutcome::Error),
        }
    }

    report.finish();
    log::info!("{report}");
    Ok(report)
}

#[cfg(test)]
#[path = "companies_test.rs"]
mod tests;
