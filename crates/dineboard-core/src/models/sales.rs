//! Sales payloads: headline metrics, revenue series, products, channels,
//! stores, hourly sales, payment methods and coupons

use super::lenient::{bool_lenient, f64_opt, f64_or_zero, string_opt, string_or_empty, u64_or_zero};
use serde::{Deserialize, Serialize};

/// Headline metrics (`/metrics`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(rename = "faturamento", default, deserialize_with = "f64_or_zero")]
    pub revenue: f64,
    #[serde(rename = "pedidos", default, deserialize_with = "u64_or_zero")]
    pub orders: u64,
    #[serde(rename = "ticketMedio", default, deserialize_with = "f64_or_zero")]
    pub average_ticket: f64,
    #[serde(rename = "clientes", default, deserialize_with = "u64_or_zero")]
    pub customers: u64,
    /// Seconds
    #[serde(rename = "tempoMedioProducao", default, deserialize_with = "f64_or_zero")]
    pub avg_production_secs: f64,
    /// Seconds
    #[serde(rename = "tempoMedioEntrega", default, deserialize_with = "f64_or_zero")]
    pub avg_delivery_secs: f64,
    #[serde(rename = "descontos", default, deserialize_with = "f64_or_zero")]
    pub discounts: f64,
    #[serde(rename = "crescimento", default)]
    pub growth: Option<Growth>,
}

impl Metrics {
    /// Orders per unique customer (0 when there are no customers)
    pub fn orders_per_customer(&self) -> f64 {
        if self.customers == 0 {
            return 0.0;
        }
        self.orders as f64 / self.customers as f64
    }

    pub fn revenue_growth(&self) -> Option<f64> {
        self.growth.as_ref().and_then(|g| g.revenue)
    }

    pub fn orders_growth(&self) -> Option<f64> {
        self.growth.as_ref().and_then(|g| g.orders)
    }
}

/// Growth vs the previous period, in percent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    #[serde(rename = "faturamento", default, deserialize_with = "f64_opt")]
    pub revenue: Option<f64>,
    #[serde(rename = "pedidos", default, deserialize_with = "f64_opt")]
    pub orders: Option<f64>,
}

/// One day of the revenue timeline (`/revenue-timeline`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub date: String,
    #[serde(rename = "value", default, deserialize_with = "f64_or_zero")]
    pub revenue: f64,
    #[serde(rename = "pedidos", default, deserialize_with = "u64_or_zero")]
    pub orders: u64,
}

/// Product ranking row (`/top-products`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(rename = "categoria", default, deserialize_with = "string_opt")]
    pub category: Option<String>,
    #[serde(rename = "vendas", default, deserialize_with = "u64_or_zero")]
    pub sales: u64,
    #[serde(rename = "quantidade", default, deserialize_with = "f64_or_zero")]
    pub quantity: f64,
    #[serde(rename = "receita", default, deserialize_with = "f64_or_zero")]
    pub revenue: f64,
    #[serde(rename = "precoMedio", default, deserialize_with = "f64_or_zero")]
    pub average_price: f64,
}

/// Add-on / extra item ranking row (`/top-items`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopItem {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(rename = "grupo", default, deserialize_with = "string_opt")]
    pub group: Option<String>,
    #[serde(rename = "vezesAdicionado", default, deserialize_with = "u64_or_zero")]
    pub times_added: u64,
    #[serde(rename = "quantidade", default, deserialize_with = "f64_or_zero")]
    pub quantity: f64,
    #[serde(rename = "receita", default, deserialize_with = "f64_or_zero")]
    pub revenue: f64,
}

/// Sales channel row (`/channel-distribution`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelShare {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "string_or_empty")]
    pub kind: String,
    #[serde(rename = "pedidos", default, deserialize_with = "u64_or_zero")]
    pub orders: u64,
    #[serde(rename = "receita", default, deserialize_with = "f64_or_zero")]
    pub revenue: f64,
    #[serde(rename = "ticketMedio", default, deserialize_with = "f64_or_zero")]
    pub average_ticket: f64,
    /// Percent of total, as computed by the server
    #[serde(rename = "percentual", default, deserialize_with = "f64_or_zero")]
    pub percent: f64,
}

/// Store performance row (`/store-performance`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorePerformance {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "string_opt")]
    pub city: Option<String>,
    #[serde(rename = "pedidos", default, deserialize_with = "u64_or_zero")]
    pub orders: u64,
    #[serde(rename = "receita", default, deserialize_with = "f64_or_zero")]
    pub revenue: f64,
    #[serde(rename = "ticketMedio", default, deserialize_with = "f64_or_zero")]
    pub average_ticket: f64,
    /// Seconds
    #[serde(rename = "tempoMedioProducao", default, deserialize_with = "f64_or_zero")]
    pub avg_production_secs: f64,
}

/// Sales for one hour of the day (`/sales-by-hour`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySales {
    #[serde(alias = "hora", default, deserialize_with = "u64_or_zero")]
    pub hour: u64,
    #[serde(alias = "pedidos", default, deserialize_with = "u64_or_zero")]
    pub orders: u64,
    #[serde(alias = "receita", alias = "faturamento", default, deserialize_with = "f64_or_zero")]
    pub revenue: f64,
}

/// Payment method row (`/payment-methods`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(rename = "metodo", default, deserialize_with = "string_or_empty")]
    pub method: String,
    #[serde(default, deserialize_with = "bool_lenient")]
    pub online: bool,
    #[serde(rename = "transacoes", default, deserialize_with = "u64_or_zero")]
    pub transactions: u64,
    #[serde(rename = "valor", default, deserialize_with = "f64_or_zero")]
    pub amount: f64,
}

impl PaymentMethod {
    /// Average amount per transaction (0 with no transactions)
    pub fn average_ticket(&self) -> f64 {
        if self.transactions == 0 {
            return 0.0;
        }
        self.amount / self.transactions as f64
    }
}

/// Coupon usage row (`/coupon-performance`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CouponPerformance {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub code: String,
    #[serde(rename = "tipo", default, deserialize_with = "string_or_empty")]
    pub kind: String,
    #[serde(rename = "usos", default, deserialize_with = "u64_or_zero")]
    pub uses: u64,
    #[serde(rename = "descontoTotal", default, deserialize_with = "f64_or_zero")]
    pub total_discount: f64,
    #[serde(rename = "ticketMedio", default, deserialize_with = "f64_or_zero")]
    pub average_ticket: f64,
}

impl CouponPerformance {
    /// Average discount granted per use
    pub fn discount_per_use(&self) -> f64 {
        if self.uses == 0 {
            return 0.0;
        }
        self.total_discount / self.uses as f64
    }
}
