//! Customer repository
//!
//! Customers are the only entity the lifecycle mutates: one update by
//! identifier and one delete by name (see `lens::mutate`).

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Repository for customer rows
pub struct CustomerRepository<'a> {
    conn: &'a Connection,
}

/// Caller-supplied customer values
///
/// Used both for inserts and as the full replacement set for an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerFields {
    pub name: String,
    pub business_name: Option<String>,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
}

/// A stored customer row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: i64,
    pub name: String,
    pub business_name: Option<String>,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    pub register_date: Option<NaiveDateTime>,
}

impl CustomerRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(CustomerRecord {
            customer_id: row.get(0)?,
            name: row.get(1)?,
            business_name: row.get(2)?,
            email: row.get(3)?,
            birthday: row.get(4)?,
            shipping_address: row.get(5)?,
            billing_address: row.get(6)?,
            register_date: row.get(7)?,
        })
    }

    /// The mutable part of this record
    pub fn fields(&self) -> CustomerFields {
        CustomerFields {
            name: self.name.clone(),
            business_name: self.business_name.clone(),
            email: self.email.clone(),
            birthday: self.birthday,
            shipping_address: self.shipping_address.clone(),
            billing_address: self.billing_address.clone(),
        }
    }
}

const SELECT_COLUMNS: &str = "SELECT customer_id, name, business_name, email, birthday,
     shipping_address, billing_address, register_date
     FROM customer_table";

impl<'a> CustomerRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert one customer and return the identifier the storage engine assigned
    pub fn insert(&self, customer: &CustomerFields) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO customer_table (name, business_name, email, birthday, shipping_address, billing_address)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    customer.name,
                    customer.business_name,
                    customer.email,
                    customer.birthday,
                    customer.shipping_address,
                    customer.billing_address,
                ],
            )
            .map_err(|e| anyhow!("Failed to insert customer '{}': {}", customer.name, e))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a batch of customers in one transaction
    ///
    /// Returns the assigned identifiers in input order.
    pub fn insert_many(&self, customers: &[CustomerFields]) -> Result<Vec<i64>> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| anyhow!("Failed to begin transaction: {}", e))?;

        let mut ids = Vec::with_capacity(customers.len());
        for customer in customers {
            let id = self.insert(customer)?;
            debug!(customer_id = id, name = %customer.name, "inserted customer");
            ids.push(id);
        }

        tx.commit()
            .map_err(|e| anyhow!("Failed to commit customers: {}", e))?;
        info!("inserted {} customers", ids.len());
        Ok(ids)
    }

    /// Get a customer by identifier
    pub fn get(&self, customer_id: i64) -> Result<Option<CustomerRecord>> {
        let result = self.conn.query_row(
            &format!("{} WHERE customer_id = ?1", SELECT_COLUMNS),
            [customer_id],
            CustomerRecord::from_row,
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow!("Failed to get customer {}: {}", customer_id, e)),
        }
    }

    /// List all customers ordered by identifier
    pub fn list(&self) -> Result<Vec<CustomerRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY customer_id", SELECT_COLUMNS))?;

        let rows = stmt
            .query_map([], CustomerRecord::from_row)
            .map_err(|e| anyhow!("Failed to list customers: {}", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| anyhow!("Failed to read customer row: {}", e))
    }

    /// Get the count of customers
    pub fn count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM customer_table", [], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to get customer count: {}", e))
    }

    /// Replace the mutable fields of one customer
    ///
    /// Returns the number of rows changed; an unknown identifier changes nothing.
    pub fn update(&self, customer_id: i64, fields: &CustomerFields) -> Result<usize> {
        let changed = self
            .conn
            .execute(
                "UPDATE customer_table
                 SET name = ?1,
                     business_name = ?2,
                     email = ?3,
                     birthday = ?4,
                     shipping_address = ?5,
                     billing_address = ?6
                 WHERE customer_id = ?7",
                params![
                    fields.name,
                    fields.business_name,
                    fields.email,
                    fields.birthday,
                    fields.shipping_address,
                    fields.billing_address,
                    customer_id,
                ],
            )
            .map_err(|e| anyhow!("Failed to update customer {}: {}", customer_id, e))?;

        if changed == 0 {
            warn!(customer_id, "update matched no customer");
        }
        Ok(changed)
    }
}
