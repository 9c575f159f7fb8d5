//! Panel view logic
//!
//! Each panel turns the shared `FilterState` into request URLs and the
//! decoded payloads into display-ready values. Rendering is left to the
//! caller.

pub mod ai_query;
pub mod customers;
pub mod delivery;
pub mod kpi;
pub mod operational;
pub mod revenue;

pub use ai_query::{detect_visualization, format_cell, Visualization};
pub use customers::{customer_urls, CustomerTab, CustomerUrls, PaymentSplit};
pub use delivery::{delivery_tab_url, DeliveryTab, PerformanceTier};
pub use kpi::{kpi_panel, kpi_url, KpiCard, KpiPanel};
pub use operational::{operational_urls, shift_summaries, OperationalTab, ShiftSummary};
pub use revenue::{revenue_url, ChartKind, RevenueMode, RevenueStats};
