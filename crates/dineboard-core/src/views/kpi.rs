//! Headline KPI cards

use crate::client::{ApiClient, Endpoint};
use crate::filters::FilterState;
use crate::format::{format_count, format_currency, format_growth, format_minutes};
use crate::models::Metrics;
use serde::Serialize;

/// One KPI card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: String,
    /// Growth vs the previous period, in percent
    pub change: Option<f64>,
    pub description: &'static str,
}

impl KpiCard {
    fn new(label: &'static str, value: String, description: &'static str) -> Self {
        Self {
            label,
            value,
            change: None,
            description,
        }
    }

    fn with_change(mut self, change: Option<f64>) -> Self {
        self.change = change;
        self
    }

    /// `↑ 5.2%` / `↓ 3.0%`, when a comparison exists
    pub fn change_text(&self) -> Option<String> {
        self.change.map(format_growth)
    }

    pub fn is_growth(&self) -> bool {
        self.change.is_some_and(|c| c >= 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiPanel {
    pub primary: Vec<KpiCard>,
    /// Only cards whose figure is positive
    pub secondary: Vec<KpiCard>,
}

/// Request URL for the KPI slot
pub fn kpi_url(client: &ApiClient, filters: &FilterState) -> String {
    client.url(Endpoint::Metrics, &filters.metrics_params())
}

pub fn kpi_panel(metrics: &Metrics) -> KpiPanel {
    let primary = vec![
        KpiCard::new("Revenue", format_currency(metrics.revenue), "Total revenue")
            .with_change(metrics.revenue_growth()),
        KpiCard::new("Orders", format_count(metrics.orders), "Total sales")
            .with_change(metrics.orders_growth()),
        KpiCard::new(
            "Average ticket",
            format_currency(metrics.average_ticket),
            "Average value per order",
        ),
        KpiCard::new("Customers", format_count(metrics.customers), "Unique customers"),
    ];

    let mut secondary = Vec::new();
    if metrics.avg_production_secs > 0.0 {
        secondary.push(KpiCard::new(
            "Production time",
            format_minutes(metrics.avg_production_secs),
            "Average preparation time",
        ));
    }
    if metrics.avg_delivery_secs > 0.0 {
        secondary.push(KpiCard::new(
            "Delivery time",
            format_minutes(metrics.avg_delivery_secs),
            "Average delivery time",
        ));
    }
    if metrics.discounts > 0.0 {
        secondary.push(KpiCard::new(
            "Discounts",
            format_currency(metrics.discounts),
            "Total discounts granted",
        ));
    }

    KpiPanel { primary, secondary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Growth;

    #[test]
    fn test_primary_cards_and_growth() {
        let metrics = Metrics {
            revenue: 15230.5,
            orders: 310,
            average_ticket: 49.13,
            customers: 124,
            growth: Some(Growth {
                revenue: Some(12.4),
                orders: Some(-3.0),
            }),
            ..Metrics::default()
        };
        let panel = kpi_panel(&metrics);

        assert_eq!(panel.primary.len(), 4);
        assert_eq!(panel.primary[0].value, "R$ 15.230,50");
        assert_eq!(panel.primary[0].change_text().as_deref(), Some("↑ 12.4%"));
        assert!(!panel.primary[1].is_growth());
        assert!(panel.primary[2].change.is_none());
        assert!(panel.secondary.is_empty());
    }

    #[test]
    fn test_secondary_cards_only_when_positive() {
        let metrics = Metrics {
            avg_production_secs: 1260.0,
            discounts: 80.0,
            ..Metrics::default()
        };
        let labels: Vec<_> = kpi_panel(&metrics).secondary.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Production time", "Discounts"]);
    }

    #[test]
    fn test_kpi_url_drops_sentinels() {
        let client = ApiClient::local().unwrap();
        let filters = FilterState {
            period: Some("30".into()),
            channel: Some("todos".into()),
            ..FilterState::default()
        };
        assert_eq!(
            kpi_url(&client, &filters),
            "http://localhost:3001/api/metrics?period=30"
        );
    }
}
