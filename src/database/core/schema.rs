//! Database schema management
//!
//! This module provides the table definitions for the shop database and the
//! manager that creates them. Every statement uses `IF NOT EXISTS`, so
//! initializing an existing file is a no-op.

use anyhow::{anyhow, Result};
use rusqlite::Connection;
use tracing::info;

/// Customer table name
pub const CUSTOMER_TABLE: &str = "customer_table";
/// Product table name
pub const PRODUCT_TABLE: &str = "product_table";
/// Order table name
pub const ORDER_TABLE: &str = "order_table";
/// Order detail table name
pub const ORDER_DETAIL_TABLE: &str = "order_detail_table";

/// All shop tables, parents before children
pub const ALL_TABLES: [&str; 4] = [CUSTOMER_TABLE, PRODUCT_TABLE, ORDER_TABLE, ORDER_DETAIL_TABLE];

/// Schema definitions for all tables in the shop database
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    pub const CUSTOMER_TABLE_SQL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS customer_table (
            customer_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            business_name TEXT,
            email TEXT NOT NULL,
            birthday DATE,
            shipping_address TEXT,
            billing_address TEXT,
            register_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
    "#;

    pub const PRODUCT_TABLE_SQL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS product_table (
            product_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            price REAL NOT NULL,
            qty_available INT
        );
    "#;

    pub const ORDER_TABLE_SQL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS order_table (
            order_id INTEGER PRIMARY KEY,
            customer_id INT NOT NULL,
            description TEXT,
            price REAL NOT NULL,
            qty_available INT,
            FOREIGN KEY (customer_id) REFERENCES customer_table (customer_id)
        );
    "#;

    pub const ORDER_DETAIL_TABLE_SQL: &'static str = r#"
        CREATE TABLE IF NOT EXISTS order_detail_table (
            order_id INTEGER NOT NULL,
            product_id INTEGER NOT NULL,
            quantity_ordered INTEGER,
            price_at_order REAL,
            subtotal REAL,
            FOREIGN KEY (order_id) REFERENCES order_table (order_id),
            FOREIGN KEY (product_id) REFERENCES product_table (product_id)
        );
    "#;

    /// Table creation statements paired with their table names, in creation order
    pub fn tables() -> [(&'static str, &'static str); 4] {
        [
            (CUSTOMER_TABLE, Self::CUSTOMER_TABLE_SQL),
            (PRODUCT_TABLE, Self::PRODUCT_TABLE_SQL),
            (ORDER_TABLE, Self::ORDER_TABLE_SQL),
            (ORDER_DETAIL_TABLE, Self::ORDER_DETAIL_TABLE_SQL),
        ]
    }
}

/// Schema manager for the shop database
pub struct SchemaManager<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaManager<'a> {
    /// Create a new schema manager for the given connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create all four tables if they don't exist
    pub fn initialize(&self) -> Result<()> {
        for (name, sql) in SchemaDefinitions::tables() {
            self.conn
                .execute(sql, [])
                .map_err(|e| anyhow!("Failed to create {} table: {}", name, e))?;
        }
        info!("shop schema initialized");
        Ok(())
    }

    /// Check the current schema status
    pub fn check_status(&self) -> Result<SchemaStatus> {
        let mut missing = Vec::new();
        for table in ALL_TABLES {
            let exists: i32 = self
                .conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .map_err(|e| anyhow!("Failed to check table existence: {}", e))?;

            if exists == 0 {
                missing.push(table.to_string());
            }
        }

        if missing.is_empty() {
            Ok(SchemaStatus::Current)
        } else if missing.len() == ALL_TABLES.len() {
            Ok(SchemaStatus::NotInitialized)
        } else {
            Ok(SchemaStatus::Incomplete { missing })
        }
    }
}

/// Status of the database schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// None of the shop tables exist (fresh database)
    NotInitialized,

    /// All shop tables exist
    Current,

    /// Some shop tables are missing
    Incomplete { missing: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn count_tables(conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table'",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_schema_not_initialized() {
        let conn = Connection::open_in_memory().unwrap();
        let manager = SchemaManager::new(&conn);

        assert_eq!(
            manager.check_status().unwrap(),
            SchemaStatus::NotInitialized
        );
    }

    #[test]
    fn test_schema_initialize() {
        let conn = Connection::open_in_memory().unwrap();
        let manager = SchemaManager::new(&conn);

        manager.initialize().unwrap();

        assert_eq!(manager.check_status().unwrap(), SchemaStatus::Current);
        assert_eq!(count_tables(&conn), 4);
    }

    #[test]
    fn test_schema_initialize_twice() {
        let conn = Connection::open_in_memory().unwrap();
        let manager = SchemaManager::new(&conn);

        manager.initialize().unwrap();
        manager.initialize().unwrap();

        assert_eq!(manager.check_status().unwrap(), SchemaStatus::Current);
        assert_eq!(count_tables(&conn), 4);
    }

    #[test]
    fn test_schema_incomplete() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(SchemaDefinitions::CUSTOMER_TABLE_SQL, []).unwrap();
        let manager = SchemaManager::new(&conn);

        assert_eq!(
            manager.check_status().unwrap(),
            SchemaStatus::Incomplete {
                missing: vec![
                    PRODUCT_TABLE.to_string(),
                    ORDER_TABLE.to_string(),
                    ORDER_DETAIL_TABLE.to_string(),
                ]
            }
        );
    }

    #[test]
    fn test_tables_accept_documented_columns() {
        let conn = Connection::open_in_memory().unwrap();
        SchemaManager::new(&conn).initialize().unwrap();

        conn.execute(
            "INSERT INTO customer_table (name, business_name, email, birthday, shipping_address, billing_address)
             VALUES ('a', 'b', 'c@d', '2000-01-01', 's', 'b')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO product_table (name, description, price, qty_available) VALUES ('p', 'd', 1.5, 3)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO order_table (customer_id, description, price, qty_available) VALUES (1, 'o', 1.5, 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO order_detail_table (order_id, product_id, quantity_ordered, price_at_order, subtotal)
             VALUES (1, 1, 2, 1.5, 3.0)",
            [],
        )
        .unwrap();

        let register_date: Option<String> = conn
            .query_row(
                "SELECT register_date FROM customer_table WHERE customer_id = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(register_date.is_some());
    }

    #[test]
    fn test_required_columns_rejected_when_null() {
        let conn = Connection::open_in_memory().unwrap();
        SchemaManager::new(&conn).initialize().unwrap();

        let result = conn.execute(
            "INSERT INTO customer_table (name, email) VALUES ('no email', NULL)",
            [],
        );
        assert!(result.is_err());

        let result = conn.execute("INSERT INTO product_table (name) VALUES ('no price')", []);
        assert!(result.is_err());
    }
}
