//! Customer payloads: base metrics, top customers and segmentation

use super::lenient::{bool_lenient, f64_or_zero, string_opt, string_or_empty, u64_or_zero};
use serde::{Deserialize, Serialize};

/// Customer base metrics (`/customer-metrics`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerMetrics {
    #[serde(rename = "total_clientes", default, deserialize_with = "u64_or_zero")]
    pub total: u64,
    /// Bought within the last 30 days
    #[serde(rename = "clientes_ativos", default, deserialize_with = "u64_or_zero")]
    pub active: u64,
    #[serde(rename = "clientes_inativos", default, deserialize_with = "u64_or_zero")]
    pub inactive: u64,
    #[serde(rename = "clientes_ativos_7d", default, deserialize_with = "u64_or_zero")]
    pub active_7d: u64,
    #[serde(rename = "clientes_ativos_15d", default, deserialize_with = "u64_or_zero")]
    pub active_15d: u64,
    #[serde(rename = "clientes_ativos_30d", default, deserialize_with = "u64_or_zero")]
    pub active_30d: u64,
    #[serde(rename = "clientes_ativos_90d", default, deserialize_with = "u64_or_zero")]
    pub active_90d: u64,
    #[serde(rename = "compraram_30d", default, deserialize_with = "u64_or_zero")]
    pub bought_30d: u64,
    #[serde(rename = "compraram_90d", default, deserialize_with = "u64_or_zero")]
    pub bought_90d: u64,
    #[serde(rename = "inativos_90d", default, deserialize_with = "u64_or_zero")]
    pub inactive_90d: u64,
    /// Orders per customer; often serialized as a string
    #[serde(rename = "frequencia_media", default, deserialize_with = "f64_or_zero")]
    pub average_frequency: f64,
    #[serde(rename = "ticket_medio_geral", default, deserialize_with = "f64_or_zero")]
    pub average_ticket: f64,
}

/// Top customer row (`/top-customers`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopCustomer {
    #[serde(default, deserialize_with = "string_opt")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "string_opt")]
    pub email: Option<String>,
    #[serde(rename = "totalPedidos", default, deserialize_with = "u64_or_zero")]
    pub total_orders: u64,
    #[serde(rename = "totalGasto", default, deserialize_with = "f64_or_zero")]
    pub total_spent: f64,
    #[serde(rename = "ticketMedio", default, deserialize_with = "f64_or_zero")]
    pub average_ticket: f64,
    #[serde(rename = "diasDesdeUltimaCompra", default, deserialize_with = "u64_or_zero")]
    pub days_since_last_order: u64,
}

/// Segmentation row (`/customer-segmentation`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerSegment {
    /// Segment label as sent by the API ("VIP", "Novo", ...)
    #[serde(rename = "segmento", default, deserialize_with = "string_or_empty")]
    pub segment: String,
    #[serde(rename = "status_ativo", default, deserialize_with = "bool_lenient")]
    pub active: bool,
    #[serde(rename = "quantidade_clientes", default, deserialize_with = "u64_or_zero")]
    pub customers: u64,
    #[serde(rename = "ticket_medio_segmento", default, deserialize_with = "f64_or_zero")]
    pub average_ticket: f64,
    #[serde(rename = "media_gasto", default, deserialize_with = "f64_or_zero")]
    pub average_spent: f64,
}
