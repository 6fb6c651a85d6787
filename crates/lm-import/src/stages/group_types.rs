//! Group-type taxonomy stage: `nmda_grouptype` → `group_type_term` entities.

use crate::context::RunContext;
use crate::error::ImportResult;
use crate::stages::{non_blank, try_create_entity};
use lm_core::{RowOutcome, Stage, StageReport};
use lm_store::NewEntity;

const KIND: &str = "group_type_term";

pub fn run(ctx: &RunContext<'_>) -> ImportResult<StageReport> {
    let stage = Stage::GroupTypes;
    let mut report = StageReport::new(stage);
    let rows = ctx.load_stage_rows(stage, &mut report)?;
    let mappings = ctx.mappings();

    for row in &rows {
        let Some(legacy_id) = row.id_col("GroupTypeId") else {
            log::warn!("group-types: row without GroupTypeId, skipping");
            report.record(RowOutcome::Skipped);
            continue;
        };
        let Some(name) = non_blank(row.str_col("Name")) else {
            log::warn!("group-types: {legacy_id} has no name, skipping");
            report.record(RowOutcome::Skipped);
            continue;
        };

        if mappings.get(&legacy_id, KIND)?.is_some() {
            // Terms have no derivable secondary data to refresh
            report.record(RowOutcome::Updated);
            continue;
        }

        if !ctx.writes_enabled() {
            log::debug!("dry-run: would create group-type term '{name}'");
            report.record(RowOutcome::Created);
            continue;
        }

        let entity = NewEntity {
            kind: KIND,
            title: name,
            status: "active",
            fields: serde_json::json!({ "legacy_id": legacy_id }),
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
#[path = "group_types_test.rs"]
mod tests;
