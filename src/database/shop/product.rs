//! Product repository

use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub struct ProductRepository<'a> {
    conn: &'a Connection,
}

/// Caller-supplied product values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub qty_available: Option<i64>,
}

/// A stored product row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub qty_available: Option<i64>,
}

impl ProductRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ProductRecord {
            product_id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            qty_available: row.get(4)?,
        })
    }
}

impl<'a> ProductRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert one product and return its assigned identifier
    pub fn insert(&self, product: &ProductFields) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO product_table (name, description, price, qty_available)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    product.name,
                    product.description,
                    product.price,
                    product.qty_available,
                ],
            )
            .map_err(|e| anyhow!("Failed to insert product '{}': {}", product.name, e))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a batch of products in one transaction, returning their identifiers
    pub fn insert_many(&self, products: &[ProductFields]) -> Result<Vec<i64>> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| anyhow!("Failed to begin transaction: {}", e))?;

        let mut ids = Vec::with_capacity(products.len());
        for product in products {
            let id = self.insert(product)?;
            debug!(product_id = id, name = %product.name, "inserted product");
            ids.push(id);
        }

        tx.commit()
            .map_err(|e| anyhow!("Failed to commit products: {}", e))?;
        info!("inserted {} products", ids.len());
        Ok(ids)
    }

    pub fn get(&self, product_id: i64) -> Result<Option<ProductRecord>> {
        let result = self.conn.query_row(
            "SELECT product_id, name, description, price, qty_available
             FROM product_table WHERE product_id = ?1",
            [product_id],
            ProductRecord::from_row,
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow!("Failed to get product {}: {}", product_id, e)),
        }
    }

    pub fn list(&self) -> Result<Vec<ProductRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT product_id, name, description, price, qty_available
             FROM product_table ORDER BY product_id",
        )?;

        let rows = stmt
            .query_map([], ProductRecord::from_row)
            .map_err(|e| anyhow!("Failed to list products: {}", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| anyhow!("Failed to read product row: {}", e))
    }

    pub fn count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM product_table", [], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to get product count: {}", e))
    }
}
