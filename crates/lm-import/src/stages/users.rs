//! User stage: `nmda_user` → `user` entities plus bridge links.
//!
//! The legacy `CompanyId` column on a user row is a historical misnomer:
//! it references the legacy *business* table's primary key. It is carried
//! verbatim into the user's field set as `legacy_company_id` and also
//! recorded as a bridge link so the businesses stage can resolve owners.

use crate::context::RunContext;
use crate::error::ImportResult;
use crate::stages::{non_blank, try_create_entity};
use lm_core::{RowOutcome, Stage, StageReport};
use lm_store::NewEntity;

const KIND: &str = "user";

fn display_title(row: &lm_dump::Row) -> Option<String> {
    if let Some(email) = non_blank(row.str_col("Email")) {
        return Some(email.to_string());
    }
    let first = non_blank(row.str_col("FirstName"));
    let last = non_blank(row.str_col("LastName"));
    match (first, last) {
        (Some(f), Some(l)) => Some(format!("{f} {l}")),
        (Some(f), None) => Some(f.to_string()),
        (None, Some(l)) => Some(l.to_string()),
        (None, None) => None,
    }
}

pub fn run(ctx: &RunContext<'_>) -> ImportResult<StageReport> {
    let stage = Stage::Users;
    let mut report = StageReport::new(stage);
    let rows = ctx.load_stage_rows(stage, &mut report)?;
    let mappings = ctx.mappings();

    for row in &rows {
        let Some(legacy_id) = row.id_col("UserId") else {
            log::warn!("users: row without UserId, skipping");
            report.record(RowOutcome::Skipped);
            continue;
        };
        let Some(title) = display_title(row) else {
            log::warn!("users: {legacy_id} has no email or name, skipping");
            report.record(RowOutcome::Skipped);
            continue;
        };

        let legacy_business = row.id_col("CompanyId");

        if let Some(user_id) = mappings.get(&legacy_id, KIND)? {
            // Bridge links are derivable from the row and safe to refresh
            if let Some(biz_ref) = &legacy_business {
                if ctx.writes_enabled() {
                    let business_id = mappings.get(biz_ref, "business")?;
                    ctx.db.upsert_link(user_id, business_id, biz_ref, "active")?;
                }
            }
            report.record(RowOutcome::Updated);
            continue;
        }

        if !ctx.writes_enabled() {
            log::debug!("dry-run: would create user '{title}'");
            report.record(RowOutcome::Created);
            continue;
        }

        let entity = NewEntity {
            kind: KIND,
            title: &title,
            status: "active",
            fields: serde_json::json!({
                "legacy_id": legacy_id,
                "email": non_blank(row.str_col("Email")),
                "first_name": non_blank(row.str_col("FirstName")),
                "last_name": non_blank(row.str_col("LastName")),
                "legacy_company_id": legacy_business,
            }),
        };
        match try_create_entity(ctx, &entity)? {
            Some(user_id) => {
                mappings.set(&legacy_id, KIND, user_id)?;
                if let Some(biz_ref) = &legacy_business {
                    // The business side is usually still unmapped here
                    let business_id = mappings.get(biz_ref, "business")?;
                    ctx.db.upsert_link(user_id, business_id, biz_ref, "active")?;
                }
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
#[path = "users_test.rs"]
mod tests;
