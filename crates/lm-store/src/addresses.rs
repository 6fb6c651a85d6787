//! Business address rows.
//!
//! The destination table grew optional columns (`category`, `other`,
//! `reservation`) after the initial rollout, so inserts probe the actual
//! table shape at runtime and only write the columns that exist.

use crate::connection::MigrateDb;
use crate::error::{StoreResult, StoreResultExt};
use duckdb::types::Value;
use std::collections::HashSet;

/// One destination address row
#[derive(Debug, Clone, Default)]
pub struct AddressRecord {
    pub legacy_id: Option<String>,
    pub business_id: i64,
    pub address_type: Option<String>,
    pub name: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_primary: bool,
    pub category: Option<String>,
    pub other: Option<String>,
    pub reservation: Option<String>,
}

/// Columns only written when the destination table has them
const OPTIONAL_COLUMNS: &[&str] = &["category", "other", "reservation"];

fn text(v: &Option<String>) -> Value {
    match v {
        Some(s) => Value::Text(s.clone()),
        None => Value::Null,
    }
}

impl MigrateDb {
    /// Actual column set of the addresses table
    pub fn address_columns(&self) -> StoreResult<HashSet<String>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT column_name FROM information_schema.columns
                 WHERE table_schema = 'lm_mig' AND table_name = 'addresses'",
            )
            .query_context("prepare address_columns")?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .query_context("query address_columns")?;

        rows.into_iter()
            .map(|r| r.query_context("row address_columns"))
            .collect()
    }

    /// Insert an address row, writing optional columns only when present
    /// in `table_columns`.
    ///
    /// A primary insert first demotes any existing primary for the same
    /// business, so the table never holds two primaries per business even
    /// when rows arrive across separate windowed runs.
    pub fn insert_address(
        &self,
        record: &AddressRecord,
        table_columns: &HashSet<String>,
    ) -> StoreResult<i64> {
        if record.is_primary {
            self.conn()
                .execute(
                    "UPDATE lm_mig.addresses
                     SET is_primary = false, updated_at = now()
                     WHERE business_id = ? AND is_primary",
                    duckdb::params![record.business_id],
                )
                .query_context("demote primary address")?;
        }

        let mut columns = vec![
            "legacy_id",
            "business_id",
            "address_type",
            "name",
            "line1",
            "line2",
            "city",
            "state",
            "zip",
            "phone",
            "email",
            "is_primary",
        ];
        let mut values = vec![
            text(&record.legacy_id),
            Value::BigInt(record.business_id),
            text(&record.address_type),
            text(&record.name),
            text(&record.line1),
            text(&record.line2),
            text(&record.city),
            text(&record.state),
            text(&record.zip),
            text(&record.phone),
            text(&record.email),
            Value::Boolean(record.is_primary),
        ];

        for optional in OPTIONAL_COLUMNS {
            if table_columns.contains(*optional) {
                columns.push(optional);
                values.push(text(match *optional {
                    "category" => &record.category,
                    "other" => &record.other,
                    _ => &record.reservation,
                }));
            }
        }

        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO lm_mig.addresses ({}) VALUES ({placeholders}) RETURNING address_id",
            columns.join(", ")
        );

        let address_id: i64 = self
            .conn()
            .query_row(&sql, duckdb::params_from_iter(values), |row| row.get(0))
            .query_context("insert address")?;

        Ok(address_id)
    }

    /// Whether an address with this legacy id was already imported
    pub fn address_exists(&self, legacy_id: &str) -> StoreResult<bool> {
        let count: i64 = self
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM lm_mig.addresses WHERE legacy_id = ?",
                duckdb::params![legacy_id],
                |row| row.get(0),
            )
            .query_context("address_exists")?;
        Ok(count > 0)
    }

    /// Count of addresses for one business (tests and coverage reporting)
    pub fn count_addresses(&self, business_id: i64) -> StoreResult<usize> {
        let count: i64 = self
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM lm_mig.addresses WHERE business_id = ?",
                duckdb::params![business_id],
                |row| row.get(0),
            )
            .query_context("count_addresses")?;
        Ok(count as usize)
    }
}

#[cfg(test)]
#[path = "addresses_test.rs"]
mod tests;
