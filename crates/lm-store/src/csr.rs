//! Cost-share-reimbursement application rows.

use crate::connection::MigrateDb;
use crate::error::{StoreError, StoreResult, StoreResultExt};

/// One CSR application to insert
#[derive(Debug, Clone)]
pub struct CsrApplication {
    pub legacy_id: String,
    pub app_type: String,
    pub business_id: i64,
    pub user_id: i64,
    pub status: String,
    pub fiscal_year: String,
    pub amount_requested: Option<f64>,
    pub amount_approved: Option<f64>,
    pub data: serde_json::Value,
    pub submitted_at: Option<String>,
}

impl MigrateDb {
    /// Insert a CSR application row, returning its internal id.
    pub fn insert_application(&self, app: &CsrApplication) -> StoreResult<i64> {
        let data = serde_json::to_string(&app.data)
            .map_err(|e| StoreError::QueryError(format!("serialize application data: {e}")))?;

        let application_id: i64 = self
            .conn()
            .query_row(
                "INSERT INTO lm_mig.csr_applications
                 (legacy_id, app_type, business_id, user_id, status, fiscal_year,
                  amount_requested, amount_approved, data, submitted_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING application_id",
                duckdb::params![
                    app.legacy_id,
                    app.app_type,
                    app.business_id,
                    app.user_id,
                    app.status,
                    app.fiscal_year,
                    app.amount_requested,
                    app.amount_approved,
                    data,
                    app.submitted_at,
                ],
                |row| row.get(0),
            )
            .query_context(&format!("insert application ({})", app.legacy_id))?;

        Ok(application_id)
    }

    /// Whether a backing application row exists for a previously mapped id.
    ///
    /// The mapping store alone is not trusted here: an interrupted prior
    /// run can leave a mapping without its row.
    pub fn application_row_exists(&self, application_id: i64) -> StoreResult<bool> {
        let count: i64 = self
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM lm_mig.csr_applications WHERE application_id = ?",
                duckdb::params![application_id],
                |row| row.get(0),
            )
            .query_context("application_row_exists")?;
        Ok(count > 0)
    }

    /// Count of applications of one type
    pub fn count_applications(&self, app_type: &str) -> StoreResult<usize> {
        let count: i64 = self
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM lm_mig.csr_applications WHERE app_type = ?",
                duckdb::params![app_type],
                |row| row.get(0),
            )
            .query_context("count_applications")?;
        Ok(count as usize)
    }
}

#[cfg(test)]
#[path = "csr_test.rs"]
mod tests;
