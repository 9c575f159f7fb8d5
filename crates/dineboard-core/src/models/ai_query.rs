//! AI query response (`POST /ai-query`)

use super::lenient::{string_opt, u64_or_zero, vec_or_empty};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One result row, columns in server order
pub type QueryRow = Map<String, Value>;

/// Server answer to a natural-language question
///
/// Successful answers carry `sql` and `data`; rejections carry `error`,
/// optionally `message` and `blockedKeyword`. Both shapes decode here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiQueryResponse {
    #[serde(default, deserialize_with = "string_opt")]
    pub sql: Option<String>,
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub data: Vec<QueryRow>,
    #[serde(rename = "rowCount", default, deserialize_with = "u64_or_zero")]
    pub row_count: u64,
    #[serde(default, deserialize_with = "string_opt")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "string_opt")]
    pub message: Option<String>,
    #[serde(rename = "blockedKeyword", default, deserialize_with = "string_opt")]
    pub blocked_keyword: Option<String>,
}

impl AiQueryResponse {
    /// Column names of the first row
    pub fn columns(&self) -> Vec<&str> {
        self.data
            .first()
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Rows reported by the server, falling back to the rows received
    pub fn rows(&self) -> u64 {
        if self.row_count > 0 {
            self.row_count
        } else {
            self.data.len() as u64
        }
    }
}
