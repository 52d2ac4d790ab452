//! Order detail repository
//!
//! Detail lines have no identifier of their own; each one references an
//! order and a product.

use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::info;

pub struct OrderDetailRepository<'a> {
    conn: &'a Connection,
}

/// A single order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetailRecord {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity_ordered: Option<i64>,
    pub price_at_order: Option<f64>,
    pub subtotal: Option<f64>,
}

impl OrderDetailRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(OrderDetailRecord {
            order_id: row.get(0)?,
            product_id: row.get(1)?,
            quantity_ordered: row.get(2)?,
            price_at_order: row.get(3)?,
            subtotal: row.get(4)?,
        })
    }
}

impl<'a> OrderDetailRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a batch of detail lines in one transaction, returning the number inserted
    pub fn insert_many(&self, details: &[OrderDetailRecord]) -> Result<usize> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| anyhow!("Failed to begin transaction: {}", e))?;

        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO order_detail_table (order_id, product_id, quantity_ordered, price_at_order, subtotal)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .map_err(|e| anyhow!("Failed to prepare statement: {}", e))?;

            for detail in details {
                stmt.execute(params![
                    detail.order_id,
                    detail.product_id,
                    detail.quantity_ordered,
                    detail.price_at_order,
                    detail.subtotal,
                ])
                .map_err(|e| {
                    anyhow!(
                        "Failed to insert detail for order {}: {}",
                        detail.order_id,
                        e
                    )
                })?;
            }
        } // stmt is dropped here

        tx.commit()
            .map_err(|e| anyhow!("Failed to commit order details: {}", e))?;
        info!("inserted {} order details", details.len());
        Ok(details.len())
    }

    pub fn list(&self) -> Result<Vec<OrderDetailRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT order_id, product_id, quantity_ordered, price_at_order, subtotal
             FROM order_detail_table ORDER BY rowid",
        )?;

        let rows = stmt
            .query_map([], OrderDetailRecord::from_row)
            .map_err(|e| anyhow!("Failed to list order details: {}", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| anyhow!("Failed to read order detail row: {}", e))
    }

    pub fn count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM order_detail_table", [], |row| {
                row.get(0)
            })
            .map_err(|e| anyhow!("Failed to get order detail count: {}", e))
    }
}
