//! Referential-integrity and coverage validation.
//!
//! `validate_relationships` is the read-only pre-flight pass: it indexes
//! the raw dumps (never the imported state) and cross-checks every
//! foreign reference. `validate_migration` is the post-run coverage
//! check: every legacy id in the dumps must have a mapping whose backing
//! row still exists.

use crate::context::RunContext;
use crate::error::ImportResult;
use lm_core::{CsrType, Stage};
use lm_dump::Row;
use std::collections::HashSet;

/// Validation finding severity. Hard issues block the migration;
/// warnings mean proceed with caution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Hard,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Hard => write!(f, "ERROR"),
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)
    }
}

/// Per-kind mapping coverage for the post-run check
#[derive(Debug, Clone)]
pub struct KindCoverage {
    pub kind: &'static str,
    pub total: usize,
    pub covered: usize,
    pub missing: usize,
}

/// Collected findings of one validation pass
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub coverage: Vec<KindCoverage>,
}

impl ValidationReport {
    fn hard(&mut self, code: &'static str, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity: Severity::Hard,
            code,
            message: message.into(),
        });
    }

    fn warning(&mut self, code: &'static str, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity: Severity::Warning,
            code,
            message: message.into(),
        });
    }

    pub fn hard_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Hard)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Whether the migration may proceed (no hard issues)
    pub fn passed(&self) -> bool {
        self.hard_count() == 0
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for issue in &self.issues {
            writeln!(f, "{issue}")?;
        }
        for cov in &self.coverage {
            writeln!(
                f,
                "{}: {}/{} legacy ids covered ({} missing)",
                cov.kind, cov.covered, cov.total, cov.missing
            )?;
        }
        write!(
            f,
            "{}: {} errors, {} warnings",
            if self.passed() { "passed" } else { "failed" },
            self.hard_count(),
            self.warning_count()
        )
    }
}

/// Index the primary keys of one dump, reporting empty and duplicate keys
/// as hard issues.
fn index_ids(
    rows: &[Row],
    key: &str,
    label: &str,
    report: &mut ValidationReport,
) -> HashSet<String> {
    let mut ids = HashSet::new();
    for row in rows {
        let Some(id) = row.id_col(key) else {
            report.hard("V001", format!("{label}: row with empty {key}"));
            continue;
        };
        if !ids.insert(id.clone()) {
            report.hard("V002", format!("{label}: duplicate {key} {id}"));
        }
    }
    ids
}

fn check_reference(
    rows: &[Row],
    ref_column: &str,
    targets: &HashSet<String>,
    code: &'static str,
    label: &str,
    target_label: &str,
    report: &mut ValidationReport,
) {
    for row in rows {
        let Some(reference) = row.id_col(ref_column) else {
            continue;
        };
        if !targets.contains(&reference) {
            report.warning(
                code,
                format!("{label}: dangling {target_label} reference {reference}"),
            );
        }
    }
}

/// Cross-check referential integrity across all legacy tables before any
/// writes occur. Never mutates data.
pub fn validate_relationships(ctx: &RunContext<'_>) -> ImportResult<ValidationReport> {
    let mut report = ValidationReport::default();

    let load = |stage: Stage| ctx.source.load(&stage.source_file(), stage.table());

    let group_types = load(Stage::GroupTypes)?;
    let companies = load(Stage::Companies)?;
    let links = load(Stage::CompanyTerms)?;
    let users = load(Stage::Users)?;
    let businesses = load(Stage::Businesses)?;
    let addresses = load(Stage::Addresses)?;

    let group_type_ids = index_ids(&group_types, "GroupTypeId", "group types", &mut report);
    let company_ids = index_ids(&companies, "CompanyId", "companies", &mut report);
    index_ids(&users, "UserId", "users", &mut report);
    let business_ids = index_ids(&businesses, "BusinessId", "businesses", &mut report);

    // The user CompanyId column actually references the business table
    check_reference(
        &users,
        "CompanyId",
        &business_ids,
        "V101",
        "users",
        "business",
        &mut report,
    );
    check_reference(
        &links,
        "CompanyId",
        &company_ids,
        "V102",
        "company-group links",
        "company",
        &mut report,
    );
    check_reference(
        &links,
        "GroupTypeId",
        &group_type_ids,
        "V103",
        "company-group links",
        "group type",
        &mut report,
    );
    check_reference(
        &addresses,
        "BusinessId",
        &business_ids,
        "V104",
        "addresses",
        "business",
        &mut report,
    );

    for csr_type in CsrType::all() {
        let rows = load(Stage::Csr(csr_type))?;
        check_reference(
            &rows,
            "BusinessId",
            &business_ids,
            "V105",
            &format!("csr-{csr_type}"),
            "business",
            &mut report,
        );
    }

    Ok(report)
}

/// Post-run coverage check: every legacy id in the dumps has a mapping
/// AND the mapped row still exists in the backing store.
pub fn validate_migration(ctx: &RunContext<'_>) -> ImportResult<ValidationReport> {
    let mut report = ValidationReport::default();
    let mappings = ctx.mappings();

    for stage in Stage::all() {
        let Some(kind) = stage.entity_kind() else {
            continue;
        };
        let rows = ctx.source.load(&stage.source_file(), stage.table())?;

        let key = match stage {
            Stage::GroupTypes => "GroupTypeId",
            Stage::Companies => "CompanyId",
            Stage::Users => "UserId",
            Stage::Businesses => "BusinessId",
            Stage::Csr(t) => t.key_column(),
            Stage::CompanyTerms | Stage::Addresses => continue,
        };

        let mut total = 0usize;
        let mut covered = 0usize;
        for row in &rows {
            let Some(legacy_id) = row.id_col(key) else {
                continue;
            };
            total += 1;

            let Some(internal_id) = mappings.get(&legacy_id, kind)? else {
                continue;
            };
            let backed = match stage {
                Stage::Csr(_) => ctx.db.application_row_exists(internal_id)?,
                _ => ctx.db.entity_exists(internal_id)?,
            };
            if backed {
                covered += 1;
            }
        }

        let missing = total - covered;
        if missing > 0 {
            report.hard(
                "V201",
                format!("{kind}: {missing} of {total} legacy ids unmapped or missing backing rows"),
            );
        }
        report.coverage.push(KindCoverage {
            kind,
            total,
            covered,
            missing,
        });
    }

    Ok(report)
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
