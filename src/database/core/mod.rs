//! Core database infrastructure
//!
//! This module provides the foundational database components:
//! - `DatabaseConn`: SQLite connection handle with configuration
//! - `SchemaManager`: Schema initialization and status checks
//! - `SchemaStatus`: Schema state enumeration

mod connection;
mod schema;

pub use connection::{quote_identifier, DatabaseConn};
pub use schema::{
    SchemaDefinitions, SchemaManager, SchemaStatus, ALL_TABLES, CUSTOMER_TABLE,
    ORDER_DETAIL_TABLE, ORDER_TABLE, PRODUCT_TABLE,
};
