//! Identifier mapping store.
//!
//! The durable `(legacy_id, entity_kind) → internal_id` table every stage
//! reads and writes. `set` is an upsert on the natural key; the value never
//! legitimately changes once written, so replace-on-conflict is safe. All
//! writes are suppressed in dry-run mode while lookups behave identically.

use crate::connection::MigrateDb;
use crate::error::{StoreResult, StoreResultExt};
use lm_core::RunMode;

/// Handle over the id_map table, carrying the run mode
pub struct MappingStore<'a> {
    db: &'a MigrateDb,
    mode: RunMode,
}

impl<'a> MappingStore<'a> {
    pub fn new(db: &'a MigrateDb, mode: RunMode) -> Self {
        Self { db, mode }
    }

    /// Look up the internal id mapped to a legacy id of the given kind
    pub fn get(&self, legacy_id: &str, kind: &str) -> StoreResult<Option<i64>> {
        let mut stmt = self
            .db
            .conn()
            .prepare("SELECT internal_id FROM lm_mig.id_map WHERE legacy_id = ? AND entity_kind = ?")
            .query_context("prepare id_map lookup")?;

        let mut rows = stmt
            .query_map(duckdb::params![legacy_id, kind], |row| {
                row.get::<_, i64>(0)
            })
            .query_context("query id_map lookup")?;

        match rows.next() {
            Some(row) => Ok(Some(row.query_context("row id_map lookup")?)),
            None => Ok(None),
        }
    }

    /// Record a legacy → internal mapping. No-op in dry-run mode.
    pub fn set(&self, legacy_id: &str, kind: &str, internal_id: i64) -> StoreResult<()> {
        if !self.mode.writes_enabled() {
            log::debug!("dry-run: would map {kind} {legacy_id} -> {internal_id}");
            return Ok(());
        }

        self.db
            .conn()
            .execute(
                "INSERT OR REPLACE INTO lm_mig.id_map (legacy_id, entity_kind, internal_id)
                 VALUES (?, ?, ?)",
                duckdb::params![legacy_id, kind, internal_id],
            )
            .query_context("insert id_map")?;
        Ok(())
    }

    /// Number of mappings recorded for a kind (reporting and coverage checks)
    pub fn count_for_kind(&self, kind: &str) -> StoreResult<usize> {
        let count: i64 = self
            .db
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM lm_mig.id_map WHERE entity_kind = ?",
                duckdb::params![kind],
                |row| row.get(0),
            )
            .query_context("count id_map")?;
        Ok(count as usize)
    }
}

#[cfg(test)]
#[path = "mapping_test.rs"]
mod tests;
