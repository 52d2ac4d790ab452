//! Mutate lens
//!
//! The two write operations of the lifecycle after seeding: a full update
//! of one customer by identifier, and a delete of every row whose column
//! equals a value. Both commit as soon as the statement succeeds. Matching
//! nothing is not an error.

use anyhow::{anyhow, Result};
use rusqlite::{params, ToSql};
use tracing::{info, warn};

use crate::database::{quote_identifier, CustomerFields, ShopDatabase};

pub struct MutateLens<'a> {
    db: &'a ShopDatabase,
}

impl<'a> MutateLens<'a> {
    pub fn new(db: &'a ShopDatabase) -> Self {
        Self { db }
    }

    /// Replace the mutable fields of the customer with `customer_id`
    ///
    /// Returns the number of rows changed (0 or 1).
    pub fn update_customer(&self, customer_id: i64, fields: &CustomerFields) -> Result<usize> {
        let changed = self.db.customers().update(customer_id, fields)?;
        info!(customer_id, changed, "updated customer");
        Ok(changed)
    }

    /// Delete every row of `table` where `column` equals `value`
    ///
    /// The column does not have to be unique; all matching rows are removed.
    /// Returns the number of rows deleted.
    pub fn delete_where<V: ToSql>(&self, table: &str, column: &str, value: V) -> Result<usize> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            quote_identifier(table),
            quote_identifier(column)
        );

        let deleted = self
            .db
            .connection()
            .conn
            .execute(&sql, params![value])
            .map_err(|e| anyhow!("Failed to delete from '{}' by {}: {}", table, column, e))?;

        if deleted == 0 {
            warn!(table, column, "delete matched no rows");
        } else {
            info!(table, column, deleted, "deleted rows");
        }
        Ok(deleted)
    }
}
