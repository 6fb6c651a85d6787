//! User–business ownership bridge table.

use crate::connection::MigrateDb;
use crate::error::{StoreResult, StoreResultExt};

impl MigrateDb {
    /// Upsert a user → business link, keyed on (user, legacy business id).
    ///
    /// Called whenever an imported user row carries a legacy business
    /// reference; the business side may still be unmapped at that point.
    pub fn upsert_link(
        &self,
        user_id: i64,
        business_id: Option<i64>,
        legacy_business_id: &str,
        status: &str,
    ) -> StoreResult<()> {
        let existing: i64 = self
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM lm_mig.user_business_links
                 WHERE user_id = ? AND legacy_business_id = ?",
                duckdb::params![user_id, legacy_business_id],
                |row| row.get(0),
            )
            .query_context("check link")?;

        if existing > 0 {
            self.conn()
                .execute(
                    "UPDATE lm_mig.user_business_links
                     SET business_id = COALESCE(?, business_id), status = ?, updated_at = now()
                     WHERE user_id = ? AND legacy_business_id = ?",
                    duckdb::params![business_id, status, user_id, legacy_business_id],
                )
                .query_context("update link")?;
        } else {
            self.conn()
                .execute(
                    "INSERT INTO lm_mig.user_business_links
                     (user_id, business_id, legacy_business_id, status)
                     VALUES (?, ?, ?, ?)",
                    duckdb::params![user_id, business_id, legacy_business_id, status],
                )
                .query_context("insert link")?;
        }
        Ok(())
    }

    /// Owner lookup by legacy business id: the user on the earliest-created
    /// active link wins.
    pub fn link_owner_for_legacy_business(
        &self,
        legacy_business_id: &str,
    ) -> StoreResult<Option<i64>> {
        self.first_link_user(
            "SELECT user_id FROM lm_mig.user_business_links
             WHERE legacy_business_id = ? AND status = 'active'
             ORDER BY created_at, link_id LIMIT 1",
            duckdb::params![legacy_business_id],
        )
    }

    /// Owner lookup by internal business id (used for CSR user fallback)
    pub fn link_owner_for_business(&self, business_id: i64) -> StoreResult<Option<i64>> {
        self.first_link_user(
            "SELECT user_id FROM lm_mig.user_business_links
             WHERE business_id = ? AND status = 'active'
             ORDER BY created_at, link_id LIMIT 1",
            duckdb::params![business_id],
        )
    }

    fn first_link_user(
        &self,
        sql: &str,
        params: impl duckdb::Params,
    ) -> StoreResult<Option<i64>> {
        let mut stmt = self.conn().prepare(sql).query_context("prepare link lookup")?;
        let mut rows = stmt
            .query_map(params, |row| row.get::<_, i64>(0))
            .query_context("query link lookup")?;
        match rows.next() {
            Some(row) => Ok(Some(row.query_context("row link lookup")?)),
            None => Ok(None),
        }
    }

    /// Point mapped links at a business entity once the business exists.
    pub fn attach_business_to_links(
        &self,
        legacy_business_id: &str,
        business_id: i64,
    ) -> StoreResult<()> {
        self.conn()
            .execute(
                "UPDATE lm_mig.user_business_links
                 SET business_id = ?, updated_at = now()
                 WHERE legacy_business_id = ? AND business_id IS NULL",
                duckdb::params![business_id, legacy_business_id],
            )
            .query_context("attach business to links")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "links_test.rs"]
mod tests;
