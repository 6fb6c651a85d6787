//! CMS entity surface.
//!
//! The importer consumes the CMS only as "create entity of kind K with
//! field set F, returning an opaque id" plus lookups. Field sets are stored
//! as a JSON document; taxonomy assignments live in `entity_terms`.

use crate::connection::MigrateDb;
use crate::error::{StoreError, StoreResult, StoreResultExt};

/// Entity kinds the migration may materialize. Creating any other kind is
/// a fatal error.
pub const ENTITY_KINDS: &[&str] = &[
    "group_type_term",
    "company",
    "user",
    "business",
    "csr_advertising",
    "csr_labels",
    "csr_lead",
];

/// A new entity to create
#[derive(Debug, Clone)]
pub struct NewEntity<'a> {
    pub kind: &'a str,
    pub title: &'a str,
    pub status: &'a str,
    pub fields: serde_json::Value,
}

impl MigrateDb {
    /// Create an entity, returning its opaque internal id.
    pub fn create_entity(&self, entity: &NewEntity<'_>) -> StoreResult<i64> {
        if !ENTITY_KINDS.contains(&entity.kind) {
            return Err(StoreError::UnknownKind(entity.kind.to_string()));
        }

        let fields = serde_json::to_string(&entity.fields)
            .map_err(|e| StoreError::QueryError(format!("serialize entity fields: {e}")))?;

        let entity_id: i64 = self
            .conn()
            .query_row(
                "INSERT INTO lm_mig.entities (kind, title, status, fields)
                 VALUES (?, ?, ?, ?) RETURNING entity_id",
                duckdb::params![entity.kind, entity.title, entity.status, fields],
                |row| row.get(0),
            )
            .query_context(&format!("insert entity ({})", entity.title))?;

        Ok(entity_id)
    }

    /// Whether an entity row exists for this internal id
    pub fn entity_exists(&self, entity_id: i64) -> StoreResult<bool> {
        let count: i64 = self
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM lm_mig.entities WHERE entity_id = ?",
                duckdb::params![entity_id],
                |row| row.get(0),
            )
            .query_context("entity_exists")?;
        Ok(count > 0)
    }

    /// Read an entity's JSON field set
    pub fn entity_fields(&self, entity_id: i64) -> StoreResult<Option<serde_json::Value>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT fields FROM lm_mig.entities WHERE entity_id = ?")
            .query_context("prepare entity_fields")?;

        let mut rows = stmt
            .query_map(duckdb::params![entity_id], |row| row.get::<_, String>(0))
            .query_context("query entity_fields")?;

        match rows.next() {
            Some(raw) => {
                let raw = raw.query_context("row entity_fields")?;
                let value = serde_json::from_str(&raw)
                    .map_err(|e| StoreError::QueryError(format!("parse entity fields: {e}")))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Read an entity's title
    pub fn entity_title(&self, entity_id: i64) -> StoreResult<Option<String>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT title FROM lm_mig.entities WHERE entity_id = ?")
            .query_context("prepare entity_title")?;

        let mut rows = stmt
            .query_map(duckdb::params![entity_id], |row| row.get::<_, String>(0))
            .query_context("query entity_title")?;

        match rows.next() {
            Some(row) => Ok(Some(row.query_context("row entity_title")?)),
            None => Ok(None),
        }
    }

    /// Find an entity of a kind by exact title (earliest id wins)
    pub fn find_by_title(&self, kind: &str, title: &str) -> StoreResult<Option<i64>> {
        self.first_id(
            "SELECT entity_id FROM lm_mig.entities
             WHERE kind = ? AND title = ? ORDER BY entity_id LIMIT 1",
            duckdb::params![kind, title],
        )
    }

    /// Find an entity of a kind whose title contains `needle`, preferring
    /// the shortest title (least likely to be a coincidental superstring).
    pub fn find_by_title_like(&self, kind: &str, needle: &str) -> StoreResult<Option<i64>> {
        self.first_id(
            "SELECT entity_id FROM lm_mig.entities
             WHERE kind = ? AND title LIKE '%' || ? || '%'
             ORDER BY length(title), entity_id LIMIT 1",
            duckdb::params![kind, needle],
        )
    }

    fn first_id(
        &self,
        sql: &str,
        params: impl duckdb::Params,
    ) -> StoreResult<Option<i64>> {
        let mut stmt = self.conn().prepare(sql).query_context("prepare lookup")?;
        let mut rows = stmt
            .query_map(params, |row| row.get::<_, i64>(0))
            .query_context("query lookup")?;
        match rows.next() {
            Some(row) => Ok(Some(row.query_context("row lookup")?)),
            None => Ok(None),
        }
    }

    /// Replace all terms of one taxonomy on an entity (idempotent refresh
    /// used for the safely-recomputable data on update paths).
    pub fn set_entity_terms(
        &self,
        entity_id: i64,
        taxonomy: &str,
        terms: &[String],
    ) -> StoreResult<()> {
        self.conn()
            .execute(
                "DELETE FROM lm_mig.entity_terms WHERE entity_id = ? AND taxonomy = ?",
                duckdb::params![entity_id, taxonomy],
            )
            .query_context("clear entity_terms")?;

        for term in terms {
            self.conn()
                .execute(
                    "INSERT INTO lm_mig.entity_terms (entity_id, taxonomy, term) VALUES (?, ?, ?)",
                    duckdb::params![entity_id, taxonomy, term],
                )
                .query_context("insert entity_terms")?;
        }
        Ok(())
    }

    /// Attach a single term if not already present. Returns true when the
    /// term was newly attached.
    pub fn add_entity_term(
        &self,
        entity_id: i64,
        taxonomy: &str,
        term: &str,
    ) -> StoreResult<bool> {
        let existing: i64 = self
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM lm_mig.entity_terms
                 WHERE entity_id = ? AND taxonomy = ? AND term = ?",
                duckdb::params![entity_id, taxonomy, term],
                |row| row.get(0),
            )
            .query_context("check entity_term")?;

        if existing > 0 {
            return Ok(false);
        }

        self.conn()
            .execute(
                "INSERT INTO lm_mig.entity_terms (entity_id, taxonomy, term) VALUES (?, ?, ?)",
                duckdb::params![entity_id, taxonomy, term],
            )
            .query_context("insert entity_term")?;
        Ok(true)
    }

    /// All terms of one taxonomy attached to an entity, in insertion order
    pub fn entity_terms(&self, entity_id: i64, taxonomy: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT term FROM lm_mig.entity_terms
                 WHERE entity_id = ? AND taxonomy = ? ORDER BY rowid",
            )
            .query_context("prepare entity_terms")?;

        let rows = stmt
            .query_map(duckdb::params![entity_id, taxonomy], |row| {
                row.get::<_, String>(0)
            })
            .query_context("query entity_terms")?;

        rows.into_iter()
            .map(|r| r.query_context("row entity_terms"))
            .collect()
    }

    /// Count of entities of a kind (dry-run parity and coverage checks)
    pub fn count_entities(&self, kind: &str) -> StoreResult<usize> {
        let count: i64 = self
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM lm_mig.entities WHERE kind = ?",
                duckdb::params![kind],
                |row| row.get(0),
            )
            .query_context("count entities")?;
        Ok(count as usize)
    }
}

#[cfg(test)]
#[path = "entities_test.rs"]
mod tests;
