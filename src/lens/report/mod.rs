//! Report lens
//!
//! Reads the full contents of a table by name and renders it. The reporter
//! never writes to the database; column order and storage types are kept
//! exactly as the storage engine returns them.

use anyhow::{anyhow, Result};
use rusqlite::types::ValueRef;
use rusqlite::ToSql;
use serde::Serialize;
use std::fmt;
use std::io::Write;

use crate::database::{quote_identifier, ShopDatabase};
use crate::lens::utils::OutputFormat;

/// A single stored value, tagged with its storage class
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Real(r) => write!(f, "{}", r),
            SqlValue::Text(t) => write!(f, "{}", t),
            SqlValue::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Every row of one table at the time it was read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl TableSnapshot {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Value at `row` in the named column
    pub fn value(&self, row: usize, column: &str) -> Option<&SqlValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    fn json_rows(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().map(|v| serde_json::to_value(v).unwrap_or_default()))
                    .collect()
            })
            .collect()
    }

    /// Render the snapshot in the given format
    ///
    /// Note: Table and Markdown formats require the `display` feature. Without
    /// it, they fall back to pretty JSON output.
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table | OutputFormat::Markdown => {
                #[cfg(feature = "display")]
                {
                    use tabled::builder::Builder;
                    use tabled::settings::Style;

                    let mut builder = Builder::default();
                    builder.push_record(self.columns.iter().cloned());
                    for row in &self.rows {
                        builder.push_record(row.iter().map(|v| v.to_string()));
                    }

                    let mut table = builder.build();
                    if format == OutputFormat::Markdown {
                        table.with(Style::markdown());
                    } else {
                        table.with(Style::rounded());
                    }
                    table.to_string()
                }
                #[cfg(not(feature = "display"))]
                {
                    serde_json::to_string_pretty(&self.json_rows()).unwrap_or_default()
                }
            }
            OutputFormat::Psv => {
                let mut lines = vec![self.columns.join("|")];
                for row in &self.rows {
                    lines.push(
                        row.iter()
                            .map(|v| v.to_string())
                            .collect::<Vec<_>>()
                            .join("|"),
                    );
                }
                lines.join("\n")
            }
            OutputFormat::Json => serde_json::to_string(&self.json_rows()).unwrap_or_default(),
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(&self.json_rows()).unwrap_or_default()
            }
        }
    }
}

/// Report lens over a borrowed shop database
pub struct ReportLens<'a> {
    db: &'a ShopDatabase,
}

impl<'a> ReportLens<'a> {
    pub fn new(db: &'a ShopDatabase) -> Self {
        Self { db }
    }

    /// Read every row of `table`
    ///
    /// An unknown table name surfaces the storage engine's error.
    pub fn snapshot(&self, table: &str) -> Result<TableSnapshot> {
        let sql = format!("SELECT * FROM {}", quote_identifier(table));
        self.read(table, &sql, &[])
    }

    /// Read the rows of `table` whose `column` equals `value`
    pub fn snapshot_where<V: ToSql>(
        &self,
        table: &str,
        column: &str,
        value: V,
    ) -> Result<TableSnapshot> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1",
            quote_identifier(table),
            quote_identifier(column)
        );
        self.read(table, &sql, &[&value])
    }

    fn read(&self, table: &str, sql: &str, params: &[&dyn ToSql]) -> Result<TableSnapshot> {
        let conn = &self.db.connection().conn;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| anyhow!("Failed to read table '{}': {}", table, e))?;

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let column_count = columns.len();

        let mut rows = stmt
            .query(params)
            .map_err(|e| anyhow!("Failed to query table '{}': {}", table, e))?;

        let mut values = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| anyhow!("Failed to read row of '{}': {}", table, e))?
        {
            let mut record = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                record.push(SqlValue::from(row.get_ref(idx)?));
            }
            values.push(record);
        }

        Ok(TableSnapshot {
            table: table.to_string(),
            columns,
            rows: values,
        })
    }

    /// Read `table` and write it to `out` under a `{table} contents:` heading
    pub fn report(
        &self,
        table: &str,
        format: OutputFormat,
        out: &mut dyn Write,
    ) -> Result<TableSnapshot> {
        let snapshot = self.snapshot(table)?;
        writeln!(out, "\n{} contents:", table)?;
        writeln!(out, "{}", snapshot.render(format))?;
        Ok(snapshot)
    }
}
