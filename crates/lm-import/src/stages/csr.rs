//! CSR application stages: `nmda_csr_{advertising,labels,lead}` → rows in
//! the application table, keyed by `(type, legacy id)`.
//!
//! Existence is rechecked against the backing table, not just the mapping,
//! because an interrupted prior run can leave a mapping without its row.
//! Every application ends up attached to a user: the business's recorded
//! owner, else an active bridge link, else the configured fallback user.

use crate::context::RunContext;
use crate::error::ImportResult;
use crate::stages::row_to_json;
use chrono::{Datelike, Utc};
use lm_core::{CsrType, RowOutcome, Stage, StageReport};
use lm_dump::SqlValue;
use lm_store::CsrApplication;

/// Workflow status for an application row. Unlike entities there is no
/// pending state: an unreviewed legacy application is "submitted".
fn application_status(row: &lm_dump::Row) -> &'static str {
    if row.flag_on("Approved") {
        "approved"
    } else if row.flag_on("Denied") {
        "rejected"
    } else {
        "submitted"
    }
}

/// Fiscal year: first four characters of the submission date when present
/// and numeric, else the current calendar year.
fn fiscal_year(submitted: Option<&str>) -> String {
    submitted
        .and_then(|d| d.get(..4))
        .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
        .map(String::from)
        .unwrap_or_else(|| Utc::now().year().to_string())
}

/// Extract a dollar amount from a free-text cost field: strip every
/// non-digit, non-dot character and parse. Non-positive results are
/// absent, not zero.
fn parse_amount(value: Option<&SqlValue>) -> Option<f64> {
    let amount = match value? {
        SqlValue::Null => return None,
        SqlValue::Int(i) => *i as f64,
        SqlValue::Float(f) => *f,
        SqlValue::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            cleaned.parse().ok()?
        }
    };
    (amount > 0.0).then_some(amount)
}

/// Owner → active bridge link → configured fallback user.
fn resolve_user(ctx: &RunContext<'_>, business_id: i64) -> ImportResult<i64> {
    let owner = ctx
        .db
        .entity_fields(business_id)?
        .and_then(|fields| fields.get("owner_user_id").and_then(|v| v.as_i64()));
    if let Some(user_id) = owner {
        return Ok(user_id);
    }
    if let Some(user_id) = ctx.db.link_owner_for_business(business_id)? {
        return Ok(user_id);
    }
    Ok(ctx.config.fallback_user_id)
}

pub fn run(ctx: &RunContext<'_>, csr_type: CsrType) -> ImportResult<StageReport> {
    let stage = Stage::Csr(csr_type);
    let mut report = StageReport::new(stage);
    let rows = ctx.load_stage_rows(stage, &mut report)?;
    let mappings = ctx.mappings();
    let kind = csr_type.entity_kind();

    for row in &rows {
        let Some(legacy_id) = row.id_col(csr_type.key_column()) else {
            log::warn!("csr-{csr_type}: row without {}, skipping", csr_type.key_column());
            report.record(RowOutcome::Skipped);
            continue;
        };

        if let Some(application_id) = mappings.get(&legacy_id, kind)? {
            if ctx.db.application_row_exists(application_id)? {
                report.record(RowOutcome::Updated);
                continue;
            }
            // Mapping without its row: recreate below under a fresh id
            log::warn!(
                "csr-{csr_type}: {legacy_id} mapped to {application_id} but row missing, recreating"
            );
            report.warn();
        }

        let Some(biz_ref) = row.id_col("BusinessId") else {
            log::warn!("csr-{csr_type}: {legacy_id} has no BusinessId, skipping");
            report.record(RowOutcome::Skipped);
            continue;
        };
        let Some(business_id) = mappings.get(&biz_ref, "business")? else {
            log::warn!("csr-{csr_type}: business {biz_ref} not mapped, skipping {legacy_id}");
            report.warn();
            report.record(RowOutcome::Skipped);
            continue;
        };

        if !ctx.writes_enabled() {
            log::debug!("dry-run: would create csr-{csr_type} application {legacy_id}");
            report.record(RowOutcome::Created);
            continue;
        }

        let user_id = resolve_user(ctx, business_id)?;
        let submitted = row.str_col("SubmittedDate").map(String::from);

        let app = CsrApplication {
            legacy_id: legacy_id.clone(),
            app_type: csr_type.as_str().to_string(),
            business_id,
            user_id,
            status: application_status(row).to_string(),
            fiscal_year: fiscal_year(submitted.as_deref()),
            amount_requested: parse_amount(row.get("EstimatedCost")),
            amount_approved: parse_amount(row.get("ApprovedAmount")),
            data: row_to_json(row),
            submitted_at: submitted,
        };

        match ctx.db.insert_application(&app) {
            Ok(application_id) => {
                mappings.set(&legacy_id, kind, application_id)?;
                report.record(RowOutcome::Created);
            }
            Err(err) => {
                log::warn!("csr-{csr_type}: failed to insert {legacy_id}: {err}");
                report.record(RowOutcome::Error);
            }
        }
    }

    report.finish();
    log::info!("{report}");
    Ok(report)
}

#[cfg(test)]
#[path = "csr_test.rs"]
mod tests;
