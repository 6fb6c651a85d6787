//! Address stage: `nmda_address` → rows in the dedicated address table.
//!
//! Exactly one primary address is chosen per legacy business: a type or
//! category containing "primary" wins, else "physical", else the first
//! address encountered for that business. Idempotency rides on the
//! `legacy_id` column of the destination table rather than the mapping
//! store. An opt-in backfill mode creates logged stub businesses for
//! addresses whose business reference was never mapped.

use crate::context::RunContext;
use crate::error::ImportResult;
use crate::stages::{non_blank, try_create_entity};
use lm_core::{RowOutcome, Stage, StageReport};
use lm_dump::Row;
use lm_store::{AddressRecord, NewEntity};
use std::collections::HashMap;

/// Primary-selection preference, lower is better
fn primary_rank(row: &Row) -> usize {
    let mut haystack = row.str_col("Type").unwrap_or("").to_lowercase();
    if let Some(category) = row.str_col("Category") {
        haystack.push(' ');
        haystack.push_str(&category.to_lowercase());
    }
    if haystack.contains("primary") {
        0
    } else if haystack.contains("physical") {
        1
    } else {
        2
    }
}

/// Pick the index of the primary address for each legacy business id.
/// Earlier rows win ties, so the "first seen" fallback is encounter order.
fn choose_primaries(rows: &[Row]) -> HashMap<String, usize> {
    let mut chosen: HashMap<String, (usize, usize)> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        let Some(biz_ref) = row.id_col("BusinessId") else {
            continue;
        };
        let rank = primary_rank(row);
        match chosen.get(&biz_ref) {
            Some((best, _)) if *best <= rank => {}
            _ => {
                chosen.insert(biz_ref, (rank, idx));
            }
        }
    }
    chosen.into_iter().map(|(k, (_, idx))| (k, idx)).collect()
}

/// Create a minimal stub business so the address has something to hang on.
fn backfill_stub(
    ctx: &RunContext<'_>,
    row: &Row,
    biz_ref: &str,
) -> ImportResult<Option<i64>> {
    let title = non_blank(row.str_col("Name"))
        .map(String::from)
        .or_else(|| non_blank(row.str_col("City")).map(|c| format!("{c} business")))
        .unwrap_or_else(|| format!("Business {biz_ref}"));

    log::warn!("addresses: backfilling stub business '{title}' for unmapped id {biz_ref}");

    let entity = NewEntity {
        kind: "business",
        title: &title,
        status: "pending",
        fields: serde_json::json!({ "legacy_id": biz_ref, "stub": true }),
    };
    let Some(business_id) = try_create_entity(ctx, &entity)? else {
        return Ok(None);
    };
    ctx.mappings().set(biz_ref, "business", business_id)?;
    Ok(Some(business_id))
}

pub fn run(ctx: &RunContext<'_>) -> ImportResult<StageReport> {
    let stage = Stage::Addresses;
    let mut report = StageReport::new(stage);
    let rows = ctx.load_stage_rows(stage, &mut report)?;
    let mappings = ctx.mappings();

    let primaries = choose_primaries(&rows);
    let table_columns = ctx.db.address_columns()?;

    for (idx, row) in rows.iter().enumerate() {
        let Some(legacy_id) = row.id_col("AddressId") else {
            log::warn!("addresses: row without AddressId, skipping");
            report.record(RowOutcome::Skipped);
            continue;
        };
        let Some(biz_ref) = row.id_col("BusinessId") else {
            log::warn!("addresses: {legacy_id} has no BusinessId, skipping");
            report.record(RowOutcome::Skipped);
            continue;
        };

        if ctx.db.address_exists(&legacy_id)? {
            report.record(RowOutcome::Skipped);
            continue;
        }

        let mut business_id = mappings.get(&biz_ref, "business")?;
        if business_id.is_none() {
            if !ctx.backfill {
                log::warn!("addresses: business {biz_ref} not mapped, skipping {legacy_id}");
                report.warn();
                report.record(RowOutcome::Skipped);
                continue;
            }
            if ctx.writes_enabled() {
                business_id = backfill_stub(ctx, row, &biz_ref)?;
                if business_id.is_none() {
                    report.record(RowOutcome::Error);
                    continue;
                }
            }
        }

        let is_primary = primaries.get(&biz_ref) == Some(&idx);

        if !ctx.writes_enabled() {
            log::debug!("dry-run: would create address {legacy_id} (primary: {is_primary})");
            report.record(RowOutcome::Created);
            continue;
        }

        let record = AddressRecord {
            legacy_id: Some(legacy_id.clone()),
            // Always Some here: unmapped rows were skipped or backfilled
            business_id: business_id.unwrap_or_default(),
            address_type: non_blank(row.str_col("Type")).map(String::from),
            name: non_blank(row.str_col("Name")).map(String::from),
            line1: non_blank(row.str_col("Address1")).map(String::from),
            line2: non_blank(row.str_col("Address2")).map(String::from),
            city: non_blank(row.str_col("City")).map(String::from),
            state: non_blank(row.str_col("State")).map(String::from),
            zip: non_blank(row.str_col("Zip")).map(String::from),
            phone: non_blank(row.str_col("Phone")).map(String::from),
            email: non_blank(row.str_col("Email")).map(String::from),
            is_primary,
            category: non_blank(row.str_col("Category")).map(String::from),
            other: non_blank(row.str_col("Other")).map(String::from),
            reservation: non_blank(row.str_col("Reservation")).map(String::from),
        };

        match ctx.db.insert_address(&record, &table_columns) {
            Ok(_) => report.record(RowOutcome::Created),
            Err(err) => {
                log::warn!("addresses: failed to insert {legacy_id}: {err}");
                report.record(RowOutcome::Error);
            }
        }
    }

    report.finish();
    log::info!("{report}");
    Ok(report)
}

#[cfg(test)]
#[path = "addresses_test.rs"]
mod tests;
