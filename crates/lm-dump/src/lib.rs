//! lm-dump - SQL dump parsing layer for Loam
//!
//! Extracts per-table row records from raw `mysqldump`-style text:
//! `INSERT INTO ... VALUES (...),(...);` statements in both column-list and
//! bare-VALUES form, with column order recovered from `CREATE TABLE` when
//! the insert carries no column list. All splitting is quote- and
//! escape-aware so delimiters inside string literals are never honored.

pub mod error;
pub mod reader;
pub mod scan;
pub mod value;

pub use error::{DumpError, DumpResult};
pub use reader::{rows_for_table, DumpSource, Row};
pub use value::SqlValue;
