//! Delivery payloads: overview, regions, platforms and timing

use super::lenient::{f64_opt, f64_or_zero, string_opt, string_or_empty, u64_or_zero, vec_or_empty};
use serde::{Deserialize, Serialize};

/// Delivery headline figures (`/delivery-overview`)
///
/// Rates are fractions (0.42 = 42 %); times are seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryOverview {
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub total_deliveries: u64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub delivery_rate: f64,
    #[serde(rename = "avg_delivery_time", default, deserialize_with = "f64_or_zero")]
    pub avg_delivery_secs: f64,
    #[serde(rename = "avg_production_time", default, deserialize_with = "f64_or_zero")]
    pub avg_production_secs: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub success_rate: f64,
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub delivered_count: u64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_delivery_fee: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub total_delivery_fees: f64,
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub status_distribution: Vec<StatusCount>,
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub delivery_types: Vec<TypeCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "type", default, deserialize_with = "string_or_empty")]
    pub kind: String,
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub count: u64,
}

/// Per-neighborhood delivery figures (`/delivery-regions`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRegion {
    #[serde(default, deserialize_with = "string_opt")]
    pub neighborhood: Option<String>,
    #[serde(default, deserialize_with = "string_opt")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "string_opt")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub total_deliveries: u64,
    #[serde(rename = "avg_delivery_time", default, deserialize_with = "f64_or_zero")]
    pub avg_delivery_secs: f64,
    #[serde(rename = "avg_production_time", default, deserialize_with = "f64_or_zero")]
    pub avg_production_secs: f64,
    /// Kilometres
    #[serde(default, deserialize_with = "f64_opt")]
    pub avg_distance: Option<f64>,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_delivery_fee: f64,
    /// 0-100
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub efficiency_score: f64,
}

impl DeliveryRegion {
    /// Neighborhood, else city, else "Unknown region"
    pub fn display_name(&self) -> &str {
        self.neighborhood
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.city.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Unknown region")
    }
}

/// Per-platform delivery figures (`/delivery-platforms`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPlatform {
    #[serde(rename = "platform_name", default, deserialize_with = "string_opt")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub total_orders: u64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub total_revenue: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_ticket: f64,
    #[serde(rename = "avg_delivery_time", default, deserialize_with = "f64_or_zero")]
    pub avg_delivery_secs: f64,
    #[serde(rename = "avg_production_time", default, deserialize_with = "f64_or_zero")]
    pub avg_production_secs: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_delivery_fee: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_courier_fee: f64,
    /// Fraction of all delivery orders
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub market_share: f64,
}

impl DeliveryPlatform {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown platform")
    }
}

/// Delivery timing series (`/delivery-timing`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTiming {
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub timeline: Vec<TimingPoint>,
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub hourly: Vec<HourlyTiming>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingPoint {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub date: String,
    #[serde(rename = "avg_delivery_time", default, deserialize_with = "f64_or_zero")]
    pub avg_delivery_secs: f64,
    #[serde(rename = "avg_production_time", default, deserialize_with = "f64_or_zero")]
    pub avg_production_secs: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyTiming {
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub hour: u64,
    #[serde(rename = "avg_time", default, deserialize_with = "f64_or_zero")]
    pub avg_secs: f64,
}
