//! dineboard-core - Core library for dineboard
//!
//! Provides the analytics API client, the per-session fetch cache and
//! slots, panel view logic, value formatting and report export.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod fetch;
pub mod filters;
pub mod format;
pub mod models;
pub mod views;

pub use cache::FetchCache;
pub use client::{ApiClient, Endpoint};
pub use config::DashboardConfig;
pub use error::{CoreError, FetchIssue, FetchReport};
pub use event::{ExportEvent, ExportStage, ProgressBus};
pub use export::{ExportFormat, ExportOutcome, ExportPipeline};
pub use fetch::{DashboardSession, FetchSlot, FetchState};
pub use filters::{FilterState, QueryParams};
