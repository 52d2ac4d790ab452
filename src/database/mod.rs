//! Database module
//!
//! This module provides all database functionality, organized into:
//!
//! - **core**: Connection handle and schema management
//! - **shop**: The shop database and one repository per table
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/             # Foundation
//! │   ├── connection    # SQLite DatabaseConn wrapper
//! │   └── schema        # Table definitions and SchemaManager
//! │
//! └── shop/             # Per-run storage file
//!     ├── customer      # Customers (updated and deleted by the lifecycle)
//!     ├── product       # Products
//!     ├── order         # Orders -> customers
//!     └── order_detail  # Order lines -> orders, products
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use shopcrud::database::ShopDatabase;
//!
//! let db = ShopDatabase::open("3f2a9c1e-7.db", false)?;
//! let customers = db.customers().list()?;
//! db.close()?;
//! ```

pub mod core;
pub mod shop;

// Connection and schema management
pub use core::{
    quote_identifier, DatabaseConn, SchemaDefinitions, SchemaManager, SchemaStatus, ALL_TABLES,
    CUSTOMER_TABLE, ORDER_DETAIL_TABLE, ORDER_TABLE, PRODUCT_TABLE,
};

// Shop database (main entry point)
pub use shop::ShopDatabase;

// Repositories and row types
pub use shop::{
    CustomerFields, CustomerRecord, CustomerRepository, OrderDetailRecord, OrderDetailRepository,
    OrderFields, OrderRecord, OrderRepository, ProductFields, ProductRecord, ProductRepository,
};
