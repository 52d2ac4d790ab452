//! Lens module
//!
//! Lenses hold the operations of the shop lifecycle on top of the database
//! layer. Each lens borrows a [`ShopDatabase`](crate::database::ShopDatabase);
//! none of them owns a connection.
//!
//! - `seed`: insert the fixed sample rows, capturing assigned identifiers
//! - `report`: read and render full table contents
//! - `mutate`: update one customer, delete rows by column value
//! - `utils`: output formats

pub mod mutate;
pub mod report;
pub mod seed;
pub mod utils;
