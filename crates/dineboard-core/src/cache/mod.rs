//! Caching layer for dineboard-core
//!
//! Provides the per-session, time-expiring response cache shared by all
//! fetch slots.

pub mod fetch_cache;

pub use fetch_cache::{FetchCache, DEFAULT_TTL};
