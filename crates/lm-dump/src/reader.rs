//! Row extraction for one legacy table from dump text.

use crate::error::{DumpError, DumpResult};
use crate::scan::{create_table_columns, parse_insert, split_statements};
use crate::value::SqlValue;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One parsed legacy row: an ordered column → value mapping.
///
/// The column header is shared across all rows of a statement.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<Vec<String>>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Look up a value by column name (case-insensitive)
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .map(|i| &self.values[i])
    }

    /// String content of a text column
    pub fn str_col(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(|v| v.as_str())
    }

    /// Integer content of a column, parsing text if needed
    pub fn int_col(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(|v| v.as_i64())
    }

    /// Column rendered as an opaque legacy identifier, None when null/blank
    pub fn id_col(&self, column: &str) -> Option<String> {
        self.get(column).and_then(|v| v.as_id())
    }

    /// Whether a legacy boolean flag column is on (value is exactly integer 1)
    pub fn flag_on(&self, column: &str) -> bool {
        matches!(self.get(column), Some(SqlValue::Int(1)))
    }

    /// Ordered `(column, on)` view over every column, for flag-table scans
    pub fn flags(&self) -> impl Iterator<Item = (&str, bool)> {
        self.columns
            .iter()
            .zip(&self.values)
            .map(|(c, v)| (c.as_str(), matches!(v, SqlValue::Int(1))))
    }

    /// All column names in declaration order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All values in column order
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }
}

/// Extract the ordered rows for `table` from raw dump text.
///
/// Handles both `INSERT INTO t (cols) VALUES ...` and bare
/// `INSERT INTO t VALUES ...`; the bare form takes its column order from
/// the table's `CREATE TABLE` statement, falling back to positional
/// `col_N` names when no CREATE TABLE is present.
pub fn rows_for_table(text: &str, table: &str) -> DumpResult<Vec<Row>> {
    let statements = split_statements(text);

    let mut declared_columns: Option<Arc<Vec<String>>> = None;
    for stmt in &statements {
        if let Some(cols) = create_table_columns(stmt, table) {
            declared_columns = Some(Arc::new(cols));
            break;
        }
    }

    let mut rows = Vec::new();
    for stmt in &statements {
        let Some(insert) = parse_insert(stmt)? else {
            continue;
        };
        if !insert.table.eq_ignore_ascii_case(table) {
            continue;
        }

        let header: Arc<Vec<String>> = match &insert.columns {
            Some(cols) => Arc::new(cols.clone()),
            None => match &declared_columns {
                Some(cols) => Arc::clone(cols),
                None => {
                    let width = insert.tuples.first().map(|t| t.len()).unwrap_or(0);
                    Arc::new((0..width).map(|i| format!("col_{i}")).collect())
                }
            },
        };

        for tuple in &insert.tuples {
            if tuple.len() != header.len() {
                log::warn!(
                    "Skipping {table} tuple with {} values (expected {})",
                    tuple.len(),
                    header.len()
                );
                continue;
            }
            rows.push(Row {
                columns: Arc::clone(&header),
                values: tuple.iter().map(|raw| SqlValue::decode(raw)).collect(),
            });
        }
    }

    Ok(rows)
}

/// A directory of per-table dump files
#[derive(Debug, Clone)]
pub struct DumpSource {
    dir: PathBuf,
}

impl DumpSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the rows for `table` from `file_name` inside the dump directory.
    ///
    /// A missing or empty file is "nothing to import": logged as a warning
    /// and returned as an empty row set. A present, non-empty file that
    /// yields zero rows is a hard error (format or table-name mismatch).
    pub fn load(&self, file_name: &str, table: &str) -> DumpResult<Vec<Row>> {
        let path = self.dir.join(file_name);

        if !path.exists() {
            log::warn!("Dump file {} not found, nothing to import", path.display());
            return Ok(Vec::new());
        }

        let text = std::fs::read_to_string(&path).map_err(|source| DumpError::Io {
            path: path.display().to_string(),
            source,
        })?;

        if text.trim().is_empty() {
            log::warn!("Dump file {} is empty, nothing to import", path.display());
            return Ok(Vec::new());
        }

        let rows = rows_for_table(&text, table)?;
        if rows.is_empty() {
            return Err(DumpError::NoRows {
                path: path.display().to_string(),
                table: table.to_string(),
            });
        }

        log::info!("Parsed {} rows for {table} from {file_name}", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "reader_test.rs"]
mod tests;
