//! Natural-language query results: cell formatting, chart detection, CSV
//!
//! The SQL returned by the server is display-only and never executed here.

use crate::error::CoreError;
use crate::export::csv::{write_row, UTF8_BOM};
use crate::export::write_atomic;
use crate::format::{format_currency, format_number};
use crate::models::{AiQueryResponse, QueryRow};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Numbers above this are shown as currency
const CURRENCY_THRESHOLD: f64 = 1000.0;

/// How a result set is best shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visualization {
    Table,
    Chart,
}

/// Columns of the first row whose value is numeric
pub fn numeric_columns(rows: &[QueryRow]) -> Vec<&str> {
    rows.first()
        .map(|row| {
            row.iter()
                .filter(|(_, v)| v.is_number())
                .map(|(k, _)| k.as_str())
                .collect()
        })
        .unwrap_or_default()
}

/// Chart when there is more than one row and a numeric column
pub fn detect_visualization(rows: &[QueryRow]) -> Visualization {
    if rows.len() > 1 && !numeric_columns(rows).is_empty() {
        Visualization::Chart
    } else {
        Visualization::Table
    }
}

/// Display text of one result cell
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Number(n) => {
            let v = n.as_f64().unwrap_or_default();
            if v > CURRENCY_THRESHOLD {
                format_currency(v)
            } else {
                format_number(v)
            }
        }
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn raw_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `ai_query_<millis>.csv`
pub fn csv_filename(timestamp_millis: i64) -> String {
    format!("ai_query_{}.csv", timestamp_millis)
}

/// Write the rows as CSV, columns taken from the first row
///
/// Values are written raw (not display-formatted) so the file can be
/// re-imported.
pub fn write_rows_csv<W: Write>(writer: &mut W, rows: &[QueryRow]) -> io::Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let columns: Vec<&str> = first.keys().map(String::as_str).collect();

    write!(writer, "{}", UTF8_BOM)?;
    write_row(writer, &columns)?;
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| row.get(*c).map(raw_cell).unwrap_or_default())
            .collect();
        write_row(writer, &cells)?;
    }
    writer.flush()
}

/// Save a query result to `<dir>/ai_query_<millis>.csv`
///
/// Returns None when there are no rows to save.
pub fn save_csv(
    dir: &Path,
    response: &AiQueryResponse,
    timestamp_millis: i64,
) -> Result<Option<PathBuf>, CoreError> {
    if response.data.is_empty() {
        return Ok(None);
    }
    let path = dir.join(csv_filename(timestamp_millis));
    write_atomic(&path, |w| write_rows_csv(w, &response.data))?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn rows(value: Value) -> Vec<QueryRow> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_detect_visualization() {
        let chartable = rows(json!([
            {"store": "Centro", "total": 1500.5},
            {"store": "Norte", "total": 900}
        ]));
        assert_eq!(detect_visualization(&chartable), Visualization::Chart);
        assert_eq!(numeric_columns(&chartable), vec!["total"]);

        assert_eq!(
            detect_visualization(&chartable[..1]),
            Visualization::Table
        );
        let text_only = rows(json!([{"name": "a"}, {"name": "b"}]));
        assert_eq!(detect_visualization(&text_only), Visualization::Table);
        assert_eq!(detect_visualization(&[]), Visualization::Table);
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&json!(1500.5)), "R$ 1.500,50");
        assert_eq!(format_cell(&json!(1000)), "1.000");
        assert_eq!(format_cell(&json!(2.5)), "2,5");
        assert_eq!(format_cell(&json!("Centro")), "Centro");
        assert_eq!(format_cell(&Value::Null), "");
        assert_eq!(format_cell(&json!(true)), "true");
    }

    #[test]
    fn test_rows_csv() {
        let data = rows(json!([
            {"store": "Centro, SP", "total": 1500.5, "note": null},
            {"store": "Say \"hi\"", "total": 2, "note": "ok"}
        ]));
        let mut out = Vec::new();
        write_rows_csv(&mut out, &data).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert_eq!(
            csv,
            "\u{FEFF}store,total,note\n\"Centro, SP\",1500.5,\n\"Say \"\"hi\"\"\",2,ok\n"
        );
    }

    #[test]
    fn test_save_csv() {
        let dir = TempDir::new().unwrap();
        let response = AiQueryResponse {
            data: rows(json!([{"a": 1}])),
            ..AiQueryResponse::default()
        };
        let path = save_csv(dir.path(), &response, 1700000000000).unwrap().unwrap();
        assert_eq!(path.file_name().unwrap(), "ai_query_1700000000000.csv");
        assert!(path.exists());

        assert!(save_csv(dir.path(), &AiQueryResponse::default(), 1).unwrap().is_none());
    }
}
