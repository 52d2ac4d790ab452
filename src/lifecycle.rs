//! Lifecycle driver
//!
//! Runs the fixed sequence against a fresh storage file:
//! create schema, seed, print, update, print, delete, print, close.
//! Each step runs only if the previous one succeeded; the first error is
//! returned to the caller. The connection is closed on the success path.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::ShopConfig;
use crate::database::{CustomerFields, ShopDatabase, ALL_TABLES, CUSTOMER_TABLE};
use crate::lens::mutate::MutateLens;
use crate::lens::report::ReportLens;
use crate::lens::seed::{SeedLens, SeedSummary};

/// Name the delete step matches on
pub const DELETE_MATCH_NAME: &str = "Ana Nunes";

/// What a completed run did
#[derive(Debug, Clone, Serialize)]
pub struct LifecycleReport {
    pub db_path: PathBuf,
    pub seed: SeedSummary,
    pub updated_customer_id: i64,
    pub updated_rows: usize,
    pub deleted_rows: usize,
}

/// Replacement values applied to the second seeded customer
pub fn updated_customer() -> CustomerFields {
    CustomerFields {
        name: DELETE_MATCH_NAME.to_string(),
        business_name: Some("HoneyBee".to_string()),
        email: "ana@honeybee.com".to_string(),
        birthday: NaiveDate::from_ymd_opt(1989, 1, 1),
        shipping_address: Some("390 Tyson Trail".to_string()),
        billing_address: Some("395 Tyson Trail".to_string()),
    }
}

/// Run the whole lifecycle against a newly named storage file in `config.data_dir`
pub fn run(config: &ShopConfig, out: &mut dyn Write) -> Result<LifecycleReport> {
    let db_path = config.new_db_path();
    let path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow!("Storage path is not valid UTF-8: {:?}", db_path))?;

    info!("configuration:\n{}", config.summary());
    info!("creating shop database at {}", path_str);
    let db = ShopDatabase::open(path_str, config.enforce_foreign_keys)?;

    let report = run_on(&db, config, &db_path, out)?;
    db.close()?;
    Ok(report)
}

/// Run every step after the schema exists, without closing the connection
fn run_on(
    db: &ShopDatabase,
    config: &ShopConfig,
    db_path: &Path,
    out: &mut dyn Write,
) -> Result<LifecycleReport> {
    let format = config.output_format;
    let reporter = ReportLens::new(db);
    let mutator = MutateLens::new(db);

    let seed = SeedLens::new(db).seed_all()?;

    let file_name = db_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    writeln!(out, "This data base name is: {}", file_name)?;
    for table in ALL_TABLES {
        reporter.report(table, format, out)?;
    }

    let updated_customer_id = seed.customer_id(1)?;
    let updated_rows = mutator.update_customer(updated_customer_id, &updated_customer())?;

    let updated_row = reporter.snapshot_where(CUSTOMER_TABLE, "customer_id", updated_customer_id)?;
    writeln!(out, "\nUpdated row on the {} data:", CUSTOMER_TABLE)?;
    writeln!(out, "{}", updated_row.render(format))?;

    writeln!(out, "\nCustomer Table with updated row:")?;
    reporter.report(CUSTOMER_TABLE, format, out)?;

    let deleted_rows = mutator.delete_where(CUSTOMER_TABLE, "name", DELETE_MATCH_NAME)?;

    writeln!(out, "\nUpdated Table with deleted row:")?;
    reporter.report(CUSTOMER_TABLE, format, out)?;
    out.flush()?;

    Ok(LifecycleReport {
        db_path: db_path.to_path_buf(),
        seed,
        updated_customer_id,
        updated_rows,
        deleted_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{ORDER_DETAIL_TABLE, ORDER_TABLE, PRODUCT_TABLE};
    use crate::lens::utils::OutputFormat;

    fn config_in(dir: &tempfile::TempDir) -> ShopConfig {
        ShopConfig {
            data_dir: dir.path().to_str().unwrap().to_string(),
            output_format: OutputFormat::Psv,
            ..Default::default()
        }
    }

    #[test]
    fn test_run_creates_file_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();

        let report = run(&config_in(&dir), &mut out).unwrap();

        assert!(report.db_path.exists());
        assert_eq!(report.db_path.parent(), Some(dir.path()));
        assert_eq!(report.updated_rows, 1);
        assert_eq!(report.deleted_rows, 1);
        assert_eq!(report.updated_customer_id, report.seed.customer_ids[1]);

        let text = String::from_utf8(out).unwrap();
        let file_name = report.db_path.file_name().unwrap().to_str().unwrap();
        assert!(text.starts_with(&format!("This data base name is: {}\n", file_name)));
        for table in [CUSTOMER_TABLE, PRODUCT_TABLE, ORDER_TABLE, ORDER_DETAIL_TABLE] {
            assert!(text.contains(&format!("\n{} contents:\n", table)));
        }
        // customer table: once after seeding, once after update, once after delete
        assert_eq!(text.matches("customer_table contents:").count(), 3);
        assert!(text.contains("Updated row on the customer_table data:"));
        assert!(text.contains("Customer Table with updated row:"));
        assert!(text.contains("Updated Table with deleted row:"));
    }

    #[test]
    fn test_run_leaves_expected_rows_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let report = run(&config_in(&dir), &mut std::io::sink()).unwrap();

        let db = ShopDatabase::open(report.db_path.to_str().unwrap(), false).unwrap();
        let names: Vec<String> = db
            .customers()
            .list()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Nicole Goncalves", "Vinicius Leonardo"]);
        assert_eq!(db.products().count().unwrap(), 3);
        assert_eq!(db.orders().count().unwrap(), 3);
        assert_eq!(db.order_details().count().unwrap(), 3);
    }

    #[test]
    fn test_updated_row_printed_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        run(&config_in(&dir), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let section = text
            .split("Updated row on the customer_table data:\n")
            .nth(1)
            .unwrap();
        let block: Vec<&str> = section.lines().take_while(|l| !l.is_empty()).collect();
        assert_eq!(block.len(), 2);
        assert!(block[1].contains("Ana Nunes|HoneyBee|ana@honeybee.com|1989-01-01"));
    }

    #[test]
    fn test_each_run_uses_a_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let first = run(&config, &mut std::io::sink()).unwrap();
        let second = run(&config, &mut std::io::sink()).unwrap();
        assert_ne!(first.db_path, second.db_path);
    }

    #[test]
    fn test_run_fails_fast_on_bad_data_dir() {
        let config = ShopConfig {
            data_dir: "/nonexistent/shopcrud/dir".to_string(),
            ..Default::default()
        };
        let mut out = Vec::new();
        assert!(run(&config, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_with_enforced_foreign_keys_stops_at_delete() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShopConfig {
            enforce_foreign_keys: true,
            ..config_in(&dir)
        };
        let mut out = Vec::new();

        let err = run(&config, &mut out).unwrap_err();
        assert!(err.to_string().contains("FOREIGN KEY"));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Customer Table with updated row:"));
        assert!(!text.contains("Updated Table with deleted row:"));
    }
}
