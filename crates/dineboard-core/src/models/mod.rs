//! Typed API payloads
//!
//! Field names are English; the API's wire names are kept through serde
//! renames. Every field is defaulted so a missing or malformed value
//! degrades to zero/empty instead of failing the whole panel.

pub mod ai_query;
pub mod customers;
pub mod delivery;
pub mod lenient;
pub mod operational;
pub mod sales;

pub use ai_query::{AiQueryResponse, QueryRow};
pub use customers::{CustomerMetrics, CustomerSegment, TopCustomer};
pub use delivery::{
    DeliveryOverview, DeliveryPlatform, DeliveryRegion, DeliveryTiming, HourlyTiming, StatusCount,
    TimingPoint, TypeCount,
};
pub use operational::{
    CancellationMetrics, CancellationReason, HourlyCancellation, HourlyLoad, OperationalMetrics,
};
pub use sales::{
    ChannelShare, CouponPerformance, Growth, HourlySales, Metrics, PaymentMethod, RevenuePoint,
    StorePerformance, TopItem, TopProduct,
};
