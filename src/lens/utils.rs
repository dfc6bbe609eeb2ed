//! Common utility functions for lens modules
//!
//! This module provides shared output helpers: the [`OutputFormat`] enum every
//! command accepts and the renderers that turn query results into text.

use crate::database::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::Tabled;

/// Default maximum length for name display in tables
pub const DEFAULT_NAME_MAX_LEN: usize = 20;

/// Unified output format for all lens commands
///
/// This enum provides a consistent set of output formats that can be used
/// across all foodshare commands. Commands that don't support a particular
/// format should return an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty table with borders (default)
    #[default]
    Table,
    /// Markdown table format
    Markdown,
    /// Compact JSON (single line per object)
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
    /// JSON Lines format (one JSON object per line, for streaming)
    JsonLine,
    /// Pipe-separated values with header
    Psv,
}

impl OutputFormat {
    /// Check if this is a JSON variant
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }

    /// Check if this is a table variant
    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table | Self::Markdown)
    }

    /// Get a list of all format names for help text
    pub fn all_names() -> &'static [&'static str] {
        &[
            "table",
            "markdown",
            "json",
            "json-pretty",
            "json-line",
            "psv",
        ]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
            Self::JsonLine => write!(f, "json-line"),
            Self::Psv => write!(f, "psv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            "json-line" | "jsonline" | "jsonl" | "ndjson" => Ok(Self::JsonLine),
            "psv" | "pipe" => Ok(Self::Psv),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}

/// Truncate a string to the specified length, adding "..." if truncated
///
/// This is useful for displaying long names (provider names, addresses, etc.)
/// in table output without breaking the table layout.
///
/// # Arguments
///
/// * `name` - The string to truncate
/// * `max_len` - Maximum length of the output string (including "..." if truncated)
///
/// # Examples
///
/// ```
/// use foodshare::lens::utils::truncate_name;
///
/// // Short name - no truncation
/// assert_eq!(truncate_name("Short", 20), "Short");
///
/// // Long name - truncated with ...
/// assert_eq!(truncate_name("This is a very long name", 20), "This is a very lo...");
/// ```
pub fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else {
        let truncated: String = name.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn render_rows(headers: Vec<String>, rows: Vec<Vec<String>>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Psv => {
            let mut lines = vec![headers.join("|")];
            lines.extend(rows.into_iter().map(|row| row.join("|")));
            lines.join("\n")
        }
        _ => {
            let mut builder = Builder::default();
            builder.push_record(headers);
            for row in rows {
                builder.push_record(row);
            }
            let mut table = builder.build();
            match format {
                OutputFormat::Markdown => table.with(Style::markdown()),
                _ => table.with(Style::rounded()),
            };
            table.to_string()
        }
    }
}

fn render_json(records: Vec<serde_json::Value>, format: OutputFormat) -> String {
    match format {
        OutputFormat::JsonLine => records
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::JsonPretty => format!("{:#}", serde_json::Value::Array(records)),
        _ => serde_json::Value::Array(records).to_string(),
    }
}

/// Render a query result in the requested format
///
/// Long text cells are truncated in table formats when `truncate` is set;
/// JSON and PSV always carry the full values.
pub fn render_table(table: &Table, format: OutputFormat, truncate: bool) -> String {
    if format.is_json() {
        let records = table
            .to_json_records()
            .into_iter()
            .map(serde_json::Value::Object)
            .collect();
        return render_json(records, format);
    }

    let truncate = truncate && format.is_table();
    let rows = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|value| {
                    let text = value.to_string();
                    if truncate {
                        truncate_name(&text, DEFAULT_NAME_MAX_LEN)
                    } else {
                        text
                    }
                })
                .collect()
        })
        .collect();
    render_rows(table.columns.clone(), rows, format)
}

/// Render typed records in the requested format
pub fn render_records<T: Tabled + Serialize>(records: &[T], format: OutputFormat) -> String {
    if format.is_json() {
        let records = records
            .iter()
            .map(|r| serde_json::to_value(r).unwrap_or(serde_json::Value::Null))
            .collect();
        return render_json(records, format);
    }

    let headers = T::headers().into_iter().map(|h| h.to_string()).collect();
    let rows = records
        .iter()
        .map(|r| r.fields().into_iter().map(|f| f.to_string()).collect())
        .collect();
    render_rows(headers, rows, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Value;

    fn sample_table() -> Table {
        let mut table = Table::new(vec!["food_id".to_string(), "food_name".to_string()]);
        table.rows.push(vec![Value::Integer(2), Value::from("Vegetable Soup With Extra Barley")]);
        table.rows.push(vec![Value::Integer(1), Value::Null]);
        table
    }

    #[derive(Tabled, Serialize)]
    struct Row {
        name: &'static str,
        quantity: i64,
    }

    #[test]
    fn test_render_table_psv() {
        let out = render_table(&sample_table(), OutputFormat::Psv, true);
        assert_eq!(
            out,
            "food_id|food_name\n2|Vegetable Soup With Extra Barley\n1|"
        );
    }

    #[test]
    fn test_render_table_truncates_in_table_formats() {
        let out = render_table(&sample_table(), OutputFormat::Markdown, true);
        assert!(out.contains("Vegetable Soup Wi..."));
        assert!(out.contains("food_name"));

        let full = render_table(&sample_table(), OutputFormat::Table, false);
        assert!(full.contains("Vegetable Soup With Extra Barley"));
    }

    #[test]
    fn test_render_table_json() {
        let out = render_table(&sample_table(), OutputFormat::Json, true);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["food_id"], 2);
        assert!(parsed[1]["food_name"].is_null());

        let lines = render_table(&sample_table(), OutputFormat::JsonLine, true);
        assert_eq!(lines.lines().count(), 2);
    }

    #[test]
    fn test_render_records() {
        let rows = [Row { name: "Bread", quantity: 4 }];
        assert_eq!(render_records(&rows, OutputFormat::Psv), "name|quantity\nBread|4");

        let json = render_records(&rows, OutputFormat::JsonPretty);
        assert!(json.contains("\"quantity\": 4"));
    }

    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Short", 20), "Short");
    }

    #[test]
    fn test_truncate_name_exact_limit() {
        assert_eq!(
            truncate_name("12345678901234567890", 20),
            "12345678901234567890"
        );
    }

    #[test]
    fn test_truncate_name_over_limit() {
        assert_eq!(
            truncate_name("This is a very long organization name", 20),
            "This is a very lo..."
        );
    }

    #[test]
    fn test_truncate_name_empty() {
        assert_eq!(truncate_name("", 20), "");
    }

    #[test]
    fn test_truncate_name_unicode() {
        // Unicode characters should be counted properly (by char, not bytes)
        // "日本語テスト名前これは長い" is 12 chars, truncated to 10 should be 7 chars + "..."
        assert_eq!(
            truncate_name("日本語テスト名前これは長い", 10),
            "日本語テスト名..."
        );
    }

    #[test]
    fn test_truncate_name_small_max() {
        // Edge case: very small max_len
        assert_eq!(truncate_name("Hello", 3), "...");
        assert_eq!(truncate_name("Hi", 3), "Hi");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(
            OutputFormat::from_str("table").unwrap(),
            OutputFormat::Table
        );
        assert_eq!(
            OutputFormat::from_str("pretty").unwrap(),
            OutputFormat::Table
        );
        assert_eq!(
            OutputFormat::from_str("markdown").unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!(
            OutputFormat::from_str("md").unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str("json-pretty").unwrap(),
            OutputFormat::JsonPretty
        );
        assert_eq!(
            OutputFormat::from_str("json-line").unwrap(),
            OutputFormat::JsonLine
        );
        assert_eq!(
            OutputFormat::from_str("jsonl").unwrap(),
            OutputFormat::JsonLine
        );
        assert_eq!(OutputFormat::from_str("psv").unwrap(), OutputFormat::Psv);
        assert!(OutputFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::JsonPretty.to_string(), "json-pretty");
        assert_eq!(OutputFormat::JsonLine.to_string(), "json-line");
        assert_eq!(OutputFormat::Psv.to_string(), "psv");
    }

    #[test]
    fn test_output_format_is_json() {
        assert!(!OutputFormat::Table.is_json());
        assert!(!OutputFormat::Markdown.is_json());
        assert!(OutputFormat::Json.is_json());
        assert!(OutputFormat::JsonPretty.is_json());
        assert!(OutputFormat::JsonLine.is_json());
        assert!(!OutputFormat::Psv.is_json());
    }

    #[test]
    fn test_output_format_is_table() {
        assert!(OutputFormat::Table.is_table());
        assert!(OutputFormat::Markdown.is_table());
        assert!(!OutputFormat::Json.is_table());
        assert!(!OutputFormat::JsonPretty.is_table());
        assert!(!OutputFormat::JsonLine.is_table());
        assert!(!OutputFormat::Psv.is_table());
    }
}
