#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! shopcrud - a shop database walked through insert, read, update and delete
//!
//! Each run creates a new SQLite file with a random name, creates four
//! tables (customers, products, orders, order details), seeds them with
//! fixed sample rows, prints them, updates one customer, deletes it again by
//! name, and prints the customer table after each change.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | The `shopcrud` binary | `display` + `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`database`]**: Connection handle, schema, and one repository per table
//! - **[`lens`]**: Seed loader, reporter and mutator on top of the database
//! - **[`lifecycle`]**: The fixed sequence of steps for one run
//! - **[`config`]**: Configuration and storage file naming
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use shopcrud::{lifecycle, ShopConfig};
//!
//! let config = ShopConfig::default();
//! let report = lifecycle::run(&config, &mut std::io::stdout())?;
//! println!("deleted {} rows from {:?}", report.deleted_rows, report.db_path);
//! ```
//!
//! ## Using the lenses directly
//!
//! ```rust,ignore
//! use shopcrud::database::{ShopDatabase, CUSTOMER_TABLE};
//! use shopcrud::lens::{report::ReportLens, seed::SeedLens};
//! use shopcrud::OutputFormat;
//!
//! let db = ShopDatabase::open_in_memory()?;
//! let summary = SeedLens::new(&db).seed_all()?;
//! let customers = ReportLens::new(&db).snapshot(CUSTOMER_TABLE)?;
//! println!("{}", customers.render(OutputFormat::Markdown));
//! ```

pub mod config;
pub mod database;
pub mod lens;
pub mod lifecycle;

pub use config::{generate_db_file_name, ShopConfig};

pub use database::{
    CustomerFields, CustomerRecord, DatabaseConn, OrderDetailRecord, OrderFields, OrderRecord,
    ProductFields, ProductRecord, SchemaManager, SchemaStatus, ShopDatabase,
};

pub use lens::mutate::MutateLens;
pub use lens::report::{ReportLens, SqlValue, TableSnapshot};
pub use lens::seed::{SeedLens, SeedSummary};
pub use lens::utils::OutputFormat;

pub use lifecycle::LifecycleReport;
