//! Stage importer implementations.
//!
//! Shared row-handling helpers live here; each stage module implements the
//! common contract: parse, window, map-or-create, count.

pub mod addresses;
pub mod businesses;
pub mod companies;
pub mod company_terms;
pub mod csr;
pub mod group_types;
pub mod users;

use crate::context::RunContext;
use crate::error::ImportResult;
use lm_dump::{Row, SqlValue};
use lm_store::{NewEntity, StoreError};

/// A non-empty trimmed string, or None
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Approval workflow state from the legacy Approved/Denied flag pair
pub(crate) fn approval_status(row: &Row) -> &'static str {
    if row.flag_on("Approved") {
        "approved"
    } else if row.flag_on("Denied") {
        "rejected"
    } else {
        "pending"
    }
}

/// Create an entity, degrading recoverable store failures to a logged
/// `None` so the row is counted as an error and the stage continues.
/// An unregistered entity kind stays fatal.
pub(crate) fn try_create_entity(
    ctx: &RunContext<'_>,
    entity: &NewEntity<'_>,
) -> ImportResult<Option<i64>> {
    match ctx.db.create_entity(entity) {
        Ok(id) => Ok(Some(id)),
        Err(err @ StoreError::UnknownKind(_)) => Err(err.into()),
        Err(err) => {
            log::warn!("Failed to create {} '{}': {err}", entity.kind, entity.title);
            Ok(None)
        }
    }
}

/// Serialize a full parsed row into a JSON object, preserving column order
/// semantics by last-write-wins on duplicate names.
pub(crate) fn row_to_json(row: &Row) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (column, value) in row.columns().iter().zip(row.values()) {
        let json = match value {
            SqlValue::Null => serde_json::Value::Null,
            SqlValue::Int(i) => serde_json::Value::from(*i),
            SqlValue::Float(f) => serde_json::Value::from(*f),
            SqlValue::Text(s) => serde_json::Value::from(s.clone()),
        };
        map.insert(column.clone(), json);
    }
    serde_json::Value::Object(map)
}
