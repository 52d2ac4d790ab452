//! Common utility types for lens modules

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output format for rendered table contents
///
/// Text formats show SQL `NULL` as `NULL`; JSON formats emit `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty table with borders (default)
    #[default]
    Table,
    /// Markdown table format
    Markdown,
    /// Compact JSON (one array of row objects)
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
    /// Pipe-separated values with header
    Psv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
            Self::Psv => write!(f, "psv"),
        }
    }
}
