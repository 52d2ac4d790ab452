//! Shop database storage
//!
//! This module provides the storage file used for one run of the shop
//! lifecycle. It holds four tables:
//! - Customers
//! - Products
//! - Orders (reference customers)
//! - Order details (reference orders and products)

mod customer;
mod order;
mod order_detail;
mod product;

pub use customer::{CustomerFields, CustomerRecord, CustomerRepository};
pub use order::{OrderFields, OrderRecord, OrderRepository};
pub use order_detail::{OrderDetailRecord, OrderDetailRepository};
pub use product::{ProductFields, ProductRecord, ProductRepository};

use crate::database::core::{DatabaseConn, SchemaManager, SchemaStatus};
use anyhow::Result;
use tracing::info;

/// Shop database (SQLite backend)
///
/// `ShopDatabase` owns the single connection of a run. Components borrow
/// it through the repository accessors; [`ShopDatabase::close`] releases it.
pub struct ShopDatabase {
    db: DatabaseConn,
}

impl ShopDatabase {
    /// Open the shop database at the specified path
    ///
    /// The file is created if it does not exist, and any missing tables are
    /// created. Existing tables and rows are left untouched.
    pub fn open(path: &str, enforce_foreign_keys: bool) -> Result<Self> {
        let db = DatabaseConn::open(Some(path), enforce_foreign_keys)?;
        Self::ensure_schema(db)
    }

    /// Create an in-memory shop database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let db = DatabaseConn::open_in_memory()?;
        Self::ensure_schema(db)
    }

    fn ensure_schema(db: DatabaseConn) -> Result<Self> {
        let schema = SchemaManager::new(&db.conn);

        match schema.check_status()? {
            SchemaStatus::Current => {
                info!("shop database schema is current");
            }
            SchemaStatus::NotInitialized => {
                info!("initializing shop database schema");
                schema.initialize()?;
            }
            SchemaStatus::Incomplete { missing } => {
                info!("shop database is missing tables {:?}, creating them", missing);
                schema.initialize()?;
            }
        }

        Ok(Self { db })
    }

    /// Get the underlying connection handle
    pub fn connection(&self) -> &DatabaseConn {
        &self.db
    }

    pub fn customers(&self) -> CustomerRepository<'_> {
        CustomerRepository::new(&self.db.conn)
    }

    pub fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(&self.db.conn)
    }

    pub fn orders(&self) -> OrderRepository<'_> {
        OrderRepository::new(&self.db.conn)
    }

    pub fn order_details(&self) -> OrderDetailRepository<'_> {
        OrderDetailRepository::new(&self.db.conn)
    }

    /// Release the connection
    pub fn close(self) -> Result<()> {
        self.db.close()?;
        info!("shop database closed");
        Ok(())
    }
}
