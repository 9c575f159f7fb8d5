//! Operational payloads: efficiency metrics, hourly load and cancellations

use super::lenient::{f64_or_zero, string_opt, u64_or_zero, vec_or_empty};
use serde::{Deserialize, Serialize};

/// Operational headline figures (`/operational-metrics`)
///
/// Rates are fractions; times are seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationalMetrics {
    #[serde(rename = "eficiencia_geral", default, deserialize_with = "f64_or_zero")]
    pub overall_efficiency: f64,
    #[serde(rename = "pedidos_por_hora", default, deserialize_with = "f64_or_zero")]
    pub orders_per_hour: f64,
    #[serde(rename = "taxa_cancelamento", default, deserialize_with = "f64_or_zero")]
    pub cancellation_rate: f64,
    #[serde(rename = "tempo_medio_entrega", default, deserialize_with = "f64_or_zero")]
    pub avg_delivery_secs: f64,
    #[serde(rename = "tempo_medio_producao", default, deserialize_with = "f64_or_zero")]
    pub avg_production_secs: f64,
    #[serde(rename = "total_cancelamentos", default, deserialize_with = "u64_or_zero")]
    pub total_cancellations: u64,
}

/// Orders and preparation time for one hour (`/operational-by-hour`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyLoad {
    #[serde(rename = "hora", default, deserialize_with = "u64_or_zero")]
    pub hour: u64,
    #[serde(rename = "total_pedidos", default, deserialize_with = "u64_or_zero")]
    pub orders: u64,
    #[serde(rename = "tempo_medio_producao", default, deserialize_with = "f64_or_zero")]
    pub avg_production_secs: f64,
}

/// Cancellation breakdown (`/cancellation-metrics`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CancellationMetrics {
    #[serde(rename = "taxa_cancelamento_geral", default, deserialize_with = "f64_or_zero")]
    pub overall_rate: f64,
    #[serde(rename = "total_cancelamentos", default, deserialize_with = "u64_or_zero")]
    pub total_cancellations: u64,
    #[serde(rename = "total_pedidos", default, deserialize_with = "u64_or_zero")]
    pub total_orders: u64,
    #[serde(rename = "cancelamentos_por_motivo", default, deserialize_with = "vec_or_empty")]
    pub by_reason: Vec<CancellationReason>,
    #[serde(rename = "cancelamentos_por_hora", default, deserialize_with = "vec_or_empty")]
    pub by_hour: Vec<HourlyCancellation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CancellationReason {
    #[serde(rename = "motivo", default, deserialize_with = "string_opt")]
    pub reason: Option<String>,
    #[serde(rename = "quantidade", default, deserialize_with = "u64_or_zero")]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyCancellation {
    #[serde(rename = "hora", default, deserialize_with = "u64_or_zero")]
    pub hour: u64,
    #[serde(rename = "taxa_cancelamento", default, deserialize_with = "f64_or_zero")]
    pub rate: f64,
}
