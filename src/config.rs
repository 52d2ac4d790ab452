use anyhow::{anyhow, Result};
use config::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::lens::utils::OutputFormat;

/// Number of UUID characters kept in a generated storage file name
const DB_NAME_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Directory the storage file is created in
    pub data_dir: String,

    /// Extension appended to the generated storage file name
    pub file_extension: String,

    /// Format used when rendering table contents
    pub output_format: OutputFormat,

    /// Turn on `PRAGMA foreign_keys` for the connection
    pub enforce_foreign_keys: bool,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            file_extension: "db".to_string(),
            output_format: OutputFormat::Table,
            enforce_foreign_keys: false,
        }
    }
}

impl ShopConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing keys
    pub fn from_file(path: &str) -> Result<ShopConfig> {
        if !Path::new(path).exists() {
            return Err(anyhow!("Config file '{}' does not exist", path));
        }

        let settings = Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        settings
            .try_deserialize::<ShopConfig>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))
    }

    /// Build a path for a fresh storage file inside `data_dir`
    pub fn new_db_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(generate_db_file_name(&self.file_extension))
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("Data Directory:       {}", self.data_dir),
            format!("File Extension:       {}", self.file_extension),
            format!("Output Format:        {}", self.output_format),
            format!("Enforce Foreign Keys: {}", self.enforce_foreign_keys),
        ]
        .join("\n")
    }
}

/// Generate a storage file name from the first characters of a random v4 UUID
pub fn generate_db_file_name(extension: &str) -> String {
    let token = uuid::Uuid::new_v4().to_string();
    let prefix: String = token.chars().take(DB_NAME_LEN).collect();
    format!("{}.{}", prefix, extension.trim_start_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_generated_name_shape() {
        let name = generate_db_file_name("db");
        assert_eq!(name.len(), DB_NAME_LEN + 3);
        assert!(name.ends_with(".db"));
        // first 10 chars of a hyphenated uuid include the first hyphen at index 8
        assert_eq!(name.chars().nth(8), Some('-'));
    }

    #[test]
    fn test_generated_names_differ() {
        assert_ne!(generate_db_file_name("db"), generate_db_file_name("db"));
    }

    #[test]
    fn test_extension_dot_is_not_doubled() {
        assert!(generate_db_file_name(".sqlite3").ends_with(".sqlite3"));
        assert!(!generate_db_file_name(".sqlite3").contains(".."));
    }

    #[test]
    fn test_new_db_path_in_data_dir() {
        let config = ShopConfig {
            data_dir: "/tmp/shop".to_string(),
            ..Default::default()
        };
        let path = config.new_db_path();
        assert_eq!(path.parent(), Some(Path::new("/tmp/shop")));
    }

    #[test]
    fn test_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "output_format = \"markdown\"").unwrap();
        writeln!(file, "enforce_foreign_keys = true").unwrap();

        let config = ShopConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.output_format, OutputFormat::Markdown);
        assert!(config.enforce_foreign_keys);
        assert_eq!(config.data_dir, ".");
        assert_eq!(config.file_extension, "db");
    }

    #[test]
    fn test_summary_lists_settings() {
        let config = ShopConfig {
            output_format: OutputFormat::JsonPretty,
            ..Default::default()
        };
        let summary = config.summary();
        assert!(summary.contains("Output Format:        json-pretty"));
        assert!(summary.contains("Enforce Foreign Keys: false"));
    }

    #[test]
    fn test_from_file_missing() {
        assert!(ShopConfig::from_file("/nonexistent/shopcrud.toml").is_err());
    }
}
