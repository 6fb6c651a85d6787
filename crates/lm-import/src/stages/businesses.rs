//! Business stage: `nmda_business` → `business` entities.
//!
//! On top of the common stage contract this stage:
//! - tracks legacy ids seen within the current run and skips exact repeats
//!   inside the same dump (distinct from the cross-run mapping check);
//! - resolves the owning user in three steps: active bridge link first,
//!   then a scan of legacy user rows whose `CompanyId` (which actually
//!   references the business table) matches, and for that user's company
//!   reference the business reading is tried before the company reading;
//! - falls back to fuzzy company matching by exact title then shortest
//!   substring match;
//! - derives classification and associate sub-types from the legacy flag
//!   columns via the static rule table;
//! - on update refreshes only derivable data (terms, classification);
//!   names and contact fields are left for the CMS.

use crate::context::RunContext;
use crate::error::ImportResult;
use crate::stages::company_terms::GROUP_TYPE_TAXONOMY;
use crate::stages::{approval_status, non_blank, try_create_entity};
use lm_core::{derive_classification, DerivedClasses, RowOutcome, Stage, StageReport};
use lm_dump::Row;
use lm_store::{MappingStore, NewEntity};
use std::collections::HashSet;

const KIND: &str = "business";
pub const PRODUCT_TYPE_TAXONOMY: &str = "product_type";
pub const CLASSIFICATION_TAXONOMY: &str = "classification";
pub const ASSOCIATE_TYPE_TAXONOMY: &str = "associate_type";

/// Owner resolution outcome: the owning user (if any) and the related
/// company entity (only when the user's company reference resolved as an
/// actual company rather than a business).
#[derive(Debug, Default)]
struct ResolvedOwner {
    user_id: Option<i64>,
    company_id: Option<i64>,
}

/// Businesses importer with its per-run duplicate-tracking state.
pub struct BusinessImporter {
    seen: HashSet<String>,
    update_only: bool,
}

impl BusinessImporter {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            update_only: false,
        }
    }

    /// Update-only variant: refreshes derivable data on already-mapped
    /// businesses and never creates entities.
    pub fn update_only() -> Self {
        Self {
            seen: HashSet::new(),
            update_only: true,
        }
    }

    pub fn run(&mut self, ctx: &RunContext<'_>) -> ImportResult<StageReport> {
        let stage = Stage::Businesses;
        let mut report = StageReport::new(stage);
        let rows = ctx.load_stage_rows(stage, &mut report)?;
        let mappings = ctx.mappings();

        // Legacy user rows back the step-2 owner scan
        let user_rows = ctx
            .source
            .load(&Stage::Users.source_file(), Stage::Users.table())?;

        for row in &rows {
            let Some(legacy_id) = row.id_col("BusinessId") else {
                log::warn!("businesses: row without BusinessId, skipping");
                report.record(RowOutcome::Skipped);
                continue;
            };
            let Some(name) = non_blank(row.str_col("Name")) else {
                log::warn!("businesses: {legacy_id} has no name, skipping");
                report.record(RowOutcome::Skipped);
                continue;
            };

            if !self.seen.insert(legacy_id.clone()) {
                log::warn!("businesses: duplicate BusinessId {legacy_id} within dump, skipping");
                report.warn();
                report.record(RowOutcome::Skipped);
                continue;
            }

            let derived = derive_classification(row.flags());
            let products = product_terms(row);

            if let Some(business_id) = mappings.get(&legacy_id, KIND)? {
                if ctx.writes_enabled() {
                    self.refresh_derived(ctx, business_id, &derived, &products)?;
                }
                report.record(RowOutcome::Updated);
                continue;
            }

            if self.update_only {
                report.record(RowOutcome::Skipped);
                continue;
            }

            let mut owner = resolve_owner(ctx, &mappings, &legacy_id, &user_rows)?;
            if owner.company_id.is_none() {
                owner.company_id = fuzzy_company_match(ctx, name)?;
            }

            if !ctx.writes_enabled() {
                log::debug!("dry-run: would create business '{name}'");
                report.record(RowOutcome::Created);
                continue;
            }

            let entity = NewEntity {
                kind: KIND,
                title: name,
                status: approval_status(row),
                fields: serde_json::json!({
                    "legacy_id": legacy_id,
                    "dba": non_blank(row.str_col("DBA")),
                    "email": non_blank(row.str_col("Email")),
                    "phone": non_blank(row.str_col("Phone")),
                    "website": non_blank(row.str_col("Website")),
                    "facebook": non_blank(row.str_col("Facebook")),
                    "instagram": non_blank(row.str_col("Instagram")),
                    "twitter": non_blank(row.str_col("Twitter")),
                    "owner_user_id": owner.user_id,
                    "company_id": owner.company_id,
                }),
            };
            let Some(business_id) = try_create_entity(ctx, &entity)? else {
                report.record(RowOutcome::Error);
                continue;
            };
            mappings.set(&legacy_id, KIND, business_id)?;

            // Backfill the business side of any links recorded before this
            // business existed, then record the resolved owner's own link.
            ctx.db.attach_business_to_links(&legacy_id, business_id)?;
            if let Some(user_id) = owner.user_id {
                ctx.db
                    .upsert_link(user_id, Some(business_id), &legacy_id, "active")?;
            }

            ctx.db
                .set_entity_terms(business_id, PRODUCT_TYPE_TAXONOMY, &products)?;
            self.apply_classification(ctx, business_id, &derived)?;
            self.mirror_group_terms(ctx, business_id, owner.company_id)?;

            report.record(RowOutcome::Created);
        }

        report.finish();
        log::info!("{report}");
        Ok(report)
    }

    /// Refresh everything re-derivable from the source row on an existing
    /// business. Title, status, and contact fields stay untouched.
    fn refresh_derived(
        &self,
        ctx: &RunContext<'_>,
        business_id: i64,
        derived: &DerivedClasses,
        products: &[String],
    ) -> ImportResult<()> {
        ctx.db
            .set_entity_terms(business_id, PRODUCT_TYPE_TAXONOMY, products)?;
        self.apply_classification(ctx, business_id, derived)?;

        let company_id = ctx
            .db
            .entity_fields(business_id)?
            .and_then(|fields| fields.get("company_id").and_then(|v| v.as_i64()));
        self.mirror_group_terms(ctx, business_id, company_id)?;
        Ok(())
    }

    fn apply_classification(
        &self,
        ctx: &RunContext<'_>,
        business_id: i64,
        derived: &DerivedClasses,
    ) -> ImportResult<()> {
        let classes: Vec<String> = derived
            .classifications
            .iter()
            .map(|c| c.as_str().to_string())
            .collect();
        let assoc: Vec<String> = derived
            .associate_types
            .iter()
            .map(|a| a.as_str().to_string())
            .collect();
        ctx.db
            .set_entity_terms(business_id, CLASSIFICATION_TAXONOMY, &classes)?;
        ctx.db
            .set_entity_terms(business_id, ASSOCIATE_TYPE_TAXONOMY, &assoc)?;
        Ok(())
    }

    /// Mirror the linked company's group-type terms onto the business.
    fn mirror_group_terms(
        &self,
        ctx: &RunContext<'_>,
        business_id: i64,
        company_id: Option<i64>,
    ) -> ImportResult<()> {
        let Some(company_id) = company_id else {
            return Ok(());
        };
        let terms = ctx.db.entity_terms(company_id, GROUP_TYPE_TAXONOMY)?;
        ctx.db
            .set_entity_terms(business_id, GROUP_TYPE_TAXONOMY, &terms)?;
        Ok(())
    }
}

impl Default for BusinessImporter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn run(ctx: &RunContext<'_>) -> ImportResult<StageReport> {
    BusinessImporter::new().run(ctx)
}

/// Three-step owner resolution for one legacy business id.
fn resolve_owner(
    ctx: &RunContext<'_>,
    mappings: &MappingStore<'_>,
    legacy_business_id: &str,
    user_rows: &[Row],
) -> ImportResult<ResolvedOwner> {
    // 1. Active bridge link, earliest-created wins
    if let Some(user_id) = ctx.db.link_owner_for_legacy_business(legacy_business_id)? {
        return Ok(ResolvedOwner {
            user_id: Some(user_id),
            company_id: None,
        });
    }

    // 2. Legacy user rows whose `CompanyId` (really a business reference)
    //    matches this business
    let Some(user_row) = user_rows
        .iter()
        .find(|u| u.id_col("CompanyId").as_deref() == Some(legacy_business_id))
    else {
        return Ok(ResolvedOwner::default());
    };

    let user_id = match user_row.id_col("UserId") {
        Some(legacy_user) => mappings.get(&legacy_user, "user")?,
        None => None,
    };

    // 3. Resolve that user's company reference: the business reading is
    //    the common case, an actual company the rare one
    let mut company_id = None;
    if let Some(company_ref) = user_row.id_col("CompanyId") {
        if mappings.get(&company_ref, "business")?.is_none() {
            company_id = mappings.get(&company_ref, "company")?;
        }
    }

    Ok(ResolvedOwner {
        user_id,
        company_id,
    })
}

/// Exact-title company match, then shortest substring match.
fn fuzzy_company_match(ctx: &RunContext<'_>, name: &str) -> ImportResult<Option<i64>> {
    if let Some(id) = ctx.db.find_by_title("company", name)? {
        return Ok(Some(id));
    }
    Ok(ctx.db.find_by_title_like("company", name)?)
}

/// Product-type terms from the comma-separated legacy column.
fn product_terms(row: &Row) -> Vec<String> {
    row.str_col("ProductTypes")
        .map(|csv| {
            csv.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "businesses_test.rs"]
mod tests;
