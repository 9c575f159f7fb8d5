//! Error types for dineboard-core
//!
//! A single thiserror hierarchy for transport, decode, export and config
//! failures, plus a report type that records degraded (optional) fetches
//! so a partial result can still be produced.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dineboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Transport Errors
    // ===================
    #[error("Network error requesting {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}: {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Invalid API base URL: {url}")]
    InvalidBaseUrl { url: String },

    // ===================
    // Decode Errors
    // ===================
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    // ===================
    // AI Query Errors
    // ===================
    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("Query rejected by server: {}", rejection_text(.error, .message))]
    QueryRejected {
        status: u16,
        error: String,
        message: Option<String>,
        blocked_keyword: Option<String>,
    },

    // ===================
    // Export Errors
    // ===================
    #[error("Required endpoint {endpoint} failed: {source}")]
    RequiredEndpoint {
        endpoint: &'static str,
        #[source]
        source: Box<CoreError>,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

fn rejection_text<'a>(error: &'a str, message: &'a Option<String>) -> &'a str {
    message.as_deref().unwrap_or(error)
}

impl CoreError {
    /// URL the failing request was sent to, when known
    pub fn url(&self) -> Option<&str> {
        match self {
            CoreError::Network { url, .. }
            | CoreError::HttpStatus { url, .. }
            | CoreError::Decode { url, .. } => Some(url),
            CoreError::RequiredEndpoint { source, .. } => source.url(),
            _ => None,
        }
    }
}

/// Individual issue entry in a fetch report
#[derive(Debug, Clone)]
pub struct FetchIssue {
    pub endpoint: String,
    pub message: String,
    /// Actionable suggestion for the user (optional)
    pub suggestion: Option<String>,
}

impl FetchIssue {
    /// Build a degraded-fetch warning from a CoreError with a context-aware suggestion
    pub fn from_core_error(endpoint: impl Into<String>, error: &CoreError) -> Self {
        let suggestion = match error {
            CoreError::Network { url, .. } => {
                Some(format!("Check the API is reachable: curl -i '{}'", url))
            }
            CoreError::HttpStatus { status, .. } if *status >= 500 => {
                Some("Inspect the API server logs for this endpoint".to_string())
            }
            CoreError::HttpStatus { status: 404, .. } => {
                Some("The API may not expose this endpoint; verify --api-url".to_string())
            }
            CoreError::Decode { url, .. } => {
                Some(format!("Validate the payload shape with: curl -s '{}' | jq .", url))
            }
            _ => None,
        };

        Self {
            endpoint: endpoint.into(),
            message: error.to_string(),
            suggestion,
        }
    }
}

/// Report of issues encountered while fetching a batch of endpoints
///
/// Lets an export degrade gracefully: optional sections that failed are
/// recorded here instead of aborting the whole batch.
#[derive(Debug, Default, Clone)]
pub struct FetchReport {
    pub issues: Vec<FetchIssue>,
    pub endpoints_requested: usize,
    pub endpoints_failed: usize,
}

impl FetchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&mut self, issue: FetchIssue) {
        self.endpoints_failed += 1;
        self.issues.push(issue);
    }

    /// Returns true if anything was degraded
    pub fn is_degraded(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Endpoints that were skipped
    pub fn degraded_endpoints(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.endpoint.as_str()).collect()
    }
}
