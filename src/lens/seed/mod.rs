//! Seed lens
//!
//! Inserts the fixed sample rows into each table. Parents are inserted
//! before children, and every foreign key is taken from the identifiers
//! the storage engine assigned to the parent rows at insertion time.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::database::{
    CustomerFields, OrderDetailRecord, OrderFields, ProductFields, ShopDatabase,
};

/// Identifiers captured while seeding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub customer_ids: Vec<i64>,
    pub product_ids: Vec<i64>,
    pub order_ids: Vec<i64>,
    pub order_detail_count: usize,
}

impl SeedSummary {
    /// Identifier of the `idx`-th seeded customer
    pub fn customer_id(&self, idx: usize) -> Result<i64> {
        resolve(&self.customer_ids, idx, "customer").copied()
    }
}

/// A product identifier with the price it was inserted at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeededProduct {
    pub product_id: i64,
    pub price: f64,
}

/// Seed lens over a borrowed shop database
pub struct SeedLens<'a> {
    db: &'a ShopDatabase,
}

impl<'a> SeedLens<'a> {
    pub fn new(db: &'a ShopDatabase) -> Self {
        Self { db }
    }

    /// Seed all four tables, parents first
    pub fn seed_all(&self) -> Result<SeedSummary> {
        let customer_ids = self.seed_customers()?;
        let products = self.seed_products()?;
        let order_ids = self.seed_orders(&customer_ids, &products)?;
        let product_ids: Vec<i64> = products.iter().map(|p| p.product_id).collect();
        let order_detail_count = self.seed_order_details(&order_ids, &product_ids)?;

        let dangling = self.db.connection().foreign_key_violations()?;
        if dangling > 0 {
            return Err(anyhow!(
                "lookup failed: seeded rows hold {} dangling foreign key reference(s)",
                dangling
            ));
        }

        info!(
            "seeded {} customers, {} products, {} orders, {} order details",
            customer_ids.len(),
            product_ids.len(),
            order_ids.len(),
            order_detail_count
        );

        Ok(SeedSummary {
            customer_ids,
            product_ids,
            order_ids,
            order_detail_count,
        })
    }

    pub fn seed_customers(&self) -> Result<Vec<i64>> {
        self.db.customers().insert_many(&seed_customers())
    }

    pub fn seed_products(&self) -> Result<Vec<SeededProduct>> {
        let products = seed_products();
        let ids = self.db.products().insert_many(&products)?;
        Ok(ids
            .into_iter()
            .zip(products)
            .map(|(product_id, product)| SeededProduct {
                product_id,
                price: product.price,
            })
            .collect())
    }

    /// Insert one order per seeded customer, priced at the matching product
    pub fn seed_orders(&self, customer_ids: &[i64], products: &[SeededProduct]) -> Result<Vec<i64>> {
        let mut orders = Vec::with_capacity(ORDER_QUANTITIES.len());
        for (idx, qty) in ORDER_QUANTITIES.iter().enumerate() {
            let customer_id = *resolve(customer_ids, idx, "customer")?;
            let product = resolve(products, idx, "product")?;
            orders.push(OrderFields {
                customer_id,
                description: Some("First order".to_string()),
                price: product.price,
                qty_available: Some(*qty),
            });
        }
        self.db.orders().insert_many(&orders)
    }

    pub fn seed_order_details(&self, order_ids: &[i64], product_ids: &[i64]) -> Result<usize> {
        let mut details = Vec::with_capacity(ORDER_DETAIL_LINES.len());
        for line in ORDER_DETAIL_LINES {
            details.push(OrderDetailRecord {
                order_id: *resolve(order_ids, line.order_idx, "order")?,
                product_id: *resolve(product_ids, line.product_idx, "product")?,
                quantity_ordered: Some(line.quantity),
                price_at_order: Some(line.price_at_order),
                subtotal: Some(line.subtotal),
            });
        }
        self.db.order_details().insert_many(&details)
    }
}

/// Pick the identifier captured for the `idx`-th parent row
fn resolve<'t, T>(captured: &'t [T], idx: usize, entity: &str) -> Result<&'t T> {
    captured.get(idx).ok_or_else(|| {
        anyhow!(
            "lookup failed: no {} captured at position {} ({} inserted)",
            entity,
            idx,
            captured.len()
        )
    })
}

/// Quantities of the three seeded orders
const ORDER_QUANTITIES: [i64; 3] = [3, 2, 1];

struct DetailLine {
    order_idx: usize,
    product_idx: usize,
    quantity: i64,
    price_at_order: f64,
    subtotal: f64,
}

const ORDER_DETAIL_LINES: [DetailLine; 3] = [
    DetailLine {
        order_idx: 0,
        product_idx: 0,
        quantity: 2,
        price_at_order: 19.99,
        subtotal: 39.98,
    },
    DetailLine {
        order_idx: 0,
        product_idx: 1,
        quantity: 1,
        price_at_order: 29.99,
        subtotal: 29.99,
    },
    DetailLine {
        order_idx: 1,
        product_idx: 2,
        quantity: 1,
        price_at_order: 19.99,
        subtotal: 19.99,
    },
];

/// The three sample customers
pub fn seed_customers() -> Vec<CustomerFields> {
    [
        (
            "Nicole Goncalves",
            "RRC",
            "nicole@example.com",
            (1992, 5, 15),
            "123 Elm St",
            "456 Oak St",
        ),
        (
            "Renan Cruz",
            "Westland",
            "renan@example.com",
            (1991, 6, 20),
            "789 Pine St",
            "101 Maple St",
        ),
        (
            "Vinicius Leonardo",
            "Element",
            "vini@example.com",
            (2001, 11, 30),
            "111 Birch St",
            "222 Cedar St",
        ),
    ]
    .into_iter()
    .map(
        |(name, business, email, (y, m, d), shipping, billing)| CustomerFields {
            name: name.to_string(),
            business_name: Some(business.to_string()),
            email: email.to_string(),
            birthday: NaiveDate::from_ymd_opt(y, m, d),
            shipping_address: Some(shipping.to_string()),
            billing_address: Some(billing.to_string()),
        },
    )
    .collect()
}

/// The three sample products
pub fn seed_products() -> Vec<ProductFields> {
    [
        ("Honey 250ml", "Raw Honey 250ml Squeeze Bottle", 19.99, 100),
        ("Honey 500ml", "Raw Honey 500ml Squeeze Bottle", 29.99, 50),
        ("Honey 1L", "Raw Honey 1 liter Squeeze Bottle", 39.99, 25),
    ]
    .into_iter()
    .map(|(name, description, price, qty)| ProductFields {
        name: name.to_string(),
        description: Some(description.to_string()),
        price,
        qty_available: Some(qty),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_all_counts() {
        let db = ShopDatabase::open_in_memory().unwrap();
        let summary = SeedLens::new(&db).seed_all().unwrap();

        assert_eq!(summary.customer_ids.len(), 3);
        assert_eq!(summary.product_ids.len(), 3);
        assert_eq!(summary.order_ids.len(), 3);
        assert_eq!(summary.order_detail_count, 3);
        assert_eq!(db.customers().count().unwrap(), 3);
        assert_eq!(db.products().count().unwrap(), 3);
        assert_eq!(db.orders().count().unwrap(), 3);
        assert_eq!(db.order_details().count().unwrap(), 3);
    }

    #[test]
    fn test_seed_foreign_keys_resolve() {
        let db = ShopDatabase::open_in_memory().unwrap();
        let summary = SeedLens::new(&db).seed_all().unwrap();

        assert_eq!(db.connection().foreign_key_violations().unwrap(), 0);

        let orders = db.orders().list().unwrap();
        let order_customers: Vec<i64> = orders.iter().map(|o| o.customer_id).collect();
        assert_eq!(order_customers, summary.customer_ids);

        let details = db.order_details().list().unwrap();
        assert_eq!(details[0].order_id, summary.order_ids[0]);
        assert_eq!(details[1].product_id, summary.product_ids[1]);
        assert_eq!(details[2].order_id, summary.order_ids[1]);
        assert_eq!(details[2].product_id, summary.product_ids[2]);
    }

    #[test]
    fn test_seed_all_rejects_dangling_references() {
        let db = ShopDatabase::open_in_memory().unwrap();
        db.connection()
            .execute("INSERT INTO order_table (customer_id, price) VALUES (999, 1.0)")
            .unwrap();

        let err = SeedLens::new(&db).seed_all().unwrap_err();
        assert!(err.to_string().starts_with("lookup failed:"));
        assert!(err.to_string().contains("1 dangling"));
    }

    #[test]
    fn test_seed_with_enforced_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strict.db");
        let db = ShopDatabase::open(path.to_str().unwrap(), true).unwrap();

        SeedLens::new(&db).seed_all().unwrap();
        assert_eq!(db.orders().count().unwrap(), 3);
    }

    #[test]
    fn test_orders_priced_from_products() {
        let db = ShopDatabase::open_in_memory().unwrap();
        SeedLens::new(&db).seed_all().unwrap();

        let prices: Vec<f64> = db.orders().list().unwrap().iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![19.99, 29.99, 39.99]);
        let qtys: Vec<Option<i64>> = db
            .orders()
            .list()
            .unwrap()
            .iter()
            .map(|o| o.qty_available)
            .collect();
        assert_eq!(qtys, vec![Some(3), Some(2), Some(1)]);
    }

    #[test]
    fn test_ids_are_captured_not_assumed() {
        let db = ShopDatabase::open_in_memory().unwrap();
        // push the rowid counter away from 1
        db.connection()
            .execute("INSERT INTO customer_table (customer_id, name, email) VALUES (40, 'x', 'x@x')")
            .unwrap();

        let summary = SeedLens::new(&db).seed_all().unwrap();
        assert_eq!(summary.customer_ids, vec![41, 42, 43]);
        assert_eq!(db.customers().count().unwrap(), 4);
        assert_eq!(db.orders().list().unwrap()[0].customer_id, 41);
    }

    #[test]
    fn test_lookup_error_when_parents_missing() {
        let db = ShopDatabase::open_in_memory().unwrap();
        let lens = SeedLens::new(&db);
        let products = lens.seed_products().unwrap();

        let err = lens.seed_orders(&[1, 2], &products).unwrap_err();
        assert!(err.to_string().starts_with("lookup failed:"));
        assert_eq!(db.orders().count().unwrap(), 0);

        let err = lens.seed_order_details(&[], &[1, 2, 3]).unwrap_err();
        assert!(err.to_string().contains("no order captured at position 0"));
    }

    #[test]
    fn test_summary_customer_lookup() {
        let db = ShopDatabase::open_in_memory().unwrap();
        let summary = SeedLens::new(&db).seed_all().unwrap();

        assert_eq!(summary.customer_id(1).unwrap(), summary.customer_ids[1]);
        assert!(summary.customer_id(3).is_err());
    }

    #[test]
    fn test_seed_literals() {
        let customers = seed_customers();
        assert_eq!(customers[1].name, "Renan Cruz");
        assert_eq!(customers[2].birthday, NaiveDate::from_ymd_opt(2001, 11, 30));

        let products = seed_products();
        assert_eq!(products[2].name, "Honey 1L");
        assert_eq!(products[0].qty_available, Some(100));
    }
}
