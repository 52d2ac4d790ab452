//! Order repository
//!
//! Every order references a customer through `customer_id`.

use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub struct OrderRepository<'a> {
    conn: &'a Connection,
}

/// Caller-supplied order values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFields {
    pub customer_id: i64,
    pub description: Option<String>,
    pub price: f64,
    pub qty_available: Option<i64>,
}

/// A stored order row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: i64,
    pub customer_id: i64,
    pub description: Option<String>,
    pub price: f64,
    pub qty_available: Option<i64>,
}

impl OrderRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(OrderRecord {
            order_id: row.get(0)?,
            customer_id: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            qty_available: row.get(4)?,
        })
    }
}

impl<'a> OrderRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert one order and return its assigned identifier
    pub fn insert(&self, order: &OrderFields) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO order_table (customer_id, description, price, qty_available)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    order.customer_id,
                    order.description,
                    order.price,
                    order.qty_available,
                ],
            )
            .map_err(|e| {
                anyhow!(
                    "Failed to insert order for customer {}: {}",
                    order.customer_id,
                    e
                )
            })?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a batch of orders in one transaction, returning their identifiers
    pub fn insert_many(&self, orders: &[OrderFields]) -> Result<Vec<i64>> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| anyhow!("Failed to begin transaction: {}", e))?;

        let mut ids = Vec::with_capacity(orders.len());
        for order in orders {
            let id = self.insert(order)?;
            debug!(order_id = id, customer_id = order.customer_id, "inserted order");
            ids.push(id);
        }

        tx.commit()
            .map_err(|e| anyhow!("Failed to commit orders: {}", e))?;
        info!("inserted {} orders", ids.len());
        Ok(ids)
    }

    pub fn list(&self) -> Result<Vec<OrderRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT order_id, customer_id, description, price, qty_available
             FROM order_table ORDER BY order_id",
        )?;

        let rows = stmt
            .query_map([], OrderRecord::from_row)
            .map_err(|e| anyhow!("Failed to list orders: {}", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| anyhow!("Failed to read order row: {}", e))
    }

    pub fn count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM order_table", [], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to get order count: {}", e))
    }
}
