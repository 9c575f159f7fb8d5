//! Revenue timeline: summary statistics and chart series

use crate::client::{ApiClient, Endpoint};
use crate::filters::FilterState;
use crate::format::{format_axis_thousands, format_count, format_currency_whole, format_number};
use crate::models::RevenuePoint;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Chart sub-type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Area,
    Bar,
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "area" => Ok(Self::Area),
            "bar" => Ok(Self::Bar),
            other => Err(format!("unknown chart type '{}' (line, area, bar)", other)),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Bar => "bar",
        })
    }
}

/// Which series are plotted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevenueMode {
    #[default]
    Revenue,
    Orders,
    Both,
}

impl RevenueMode {
    pub fn shows_revenue(&self) -> bool {
        matches!(self, RevenueMode::Revenue | RevenueMode::Both)
    }

    pub fn shows_orders(&self) -> bool {
        matches!(self, RevenueMode::Orders | RevenueMode::Both)
    }
}

impl FromStr for RevenueMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "revenue" => Ok(Self::Revenue),
            "orders" => Ok(Self::Orders),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown view mode '{}' (revenue, orders, both)", other)),
        }
    }
}

/// Request URL for the revenue timeline slot
pub fn revenue_url(client: &ApiClient, filters: &FilterState) -> String {
    client.url(Endpoint::RevenueTimeline, &filters.query_params())
}

/// Summary of a revenue series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueStats {
    pub total: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub total_orders: u64,
    pub days: usize,
}

impl RevenueStats {
    /// None for an empty series
    pub fn from_series(points: &[RevenuePoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let total: f64 = points.iter().map(|p| p.revenue).sum();
        let max = points.iter().map(|p| p.revenue).fold(f64::MIN, f64::max);
        let min = points.iter().map(|p| p.revenue).fold(f64::MAX, f64::min);
        Some(Self {
            total,
            average: total / points.len() as f64,
            max,
            min,
            total_orders: points.iter().map(|p| p.orders).sum(),
            days: points.len(),
        })
    }

    /// Orders per day, rounded
    pub fn average_orders(&self) -> u64 {
        (self.total_orders as f64 / self.days.max(1) as f64).round() as u64
    }

    /// `Total: ... • Average: ...` for the selected mode
    pub fn summary(&self, mode: RevenueMode) -> String {
        if mode == RevenueMode::Orders {
            format!(
                "Total: {} • Average: {}",
                format_count(self.total_orders),
                format_count(self.average_orders())
            )
        } else {
            format!(
                "Total: {} • Average: {}",
                format_currency_whole(self.total),
                format_currency_whole(self.average)
            )
        }
    }
}

/// Y-axis label for the selected mode
pub fn axis_label(value: f64, mode: RevenueMode) -> String {
    match mode {
        RevenueMode::Orders => format_number(value),
        _ => format_axis_thousands(value),
    }
}

/// Terminal rendering of one chart row scaled to `width` cells
pub fn chart_cells(kind: ChartKind, value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 || width == 0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round().clamp(1.0, width as f64) as usize;
    match kind {
        ChartKind::Bar => "█".repeat(filled),
        ChartKind::Area => "▒".repeat(filled),
        ChartKind::Line => format!("{}●", " ".repeat(filled - 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, revenue: f64, orders: u64) -> RevenuePoint {
        RevenuePoint {
            date: date.into(),
            revenue,
            orders,
        }
    }

    #[test]
    fn test_stats_over_series() {
        let series = vec![
            point("2024-01-01", 1000.0, 20),
            point("2024-01-02", 3000.0, 45),
            point("2024-01-03", 2000.0, 30),
        ];
        let stats = RevenueStats::from_series(&series).unwrap();
        assert_eq!(stats.total, 6000.0);
        assert_eq!(stats.average, 2000.0);
        assert_eq!(stats.max, 3000.0);
        assert_eq!(stats.min, 1000.0);
        assert_eq!(stats.total_orders, 95);
        assert_eq!(stats.average_orders(), 32);
        assert_eq!(stats.summary(RevenueMode::Revenue), "Total: R$ 6.000 • Average: R$ 2.000");
        assert_eq!(stats.summary(RevenueMode::Orders), "Total: 95 • Average: 32");
    }

    #[test]
    fn test_empty_series_has_no_stats() {
        assert!(RevenueStats::from_series(&[]).is_none());
    }

    #[test]
    fn test_mode_and_kind_parsing() {
        assert_eq!("BAR".parse::<ChartKind>(), Ok(ChartKind::Bar));
        assert!("pie".parse::<ChartKind>().is_err());
        let both: RevenueMode = "both".parse().unwrap();
        assert!(both.shows_revenue() && both.shows_orders());
        assert!(!RevenueMode::Orders.shows_revenue());
    }

    #[test]
    fn test_axis_labels() {
        assert_eq!(axis_label(12500.0, RevenueMode::Revenue), "13k");
        assert_eq!(axis_label(1500.0, RevenueMode::Orders), "1.500");
    }

    #[test]
    fn test_chart_cells() {
        assert_eq!(chart_cells(ChartKind::Bar, 50.0, 100.0, 10).chars().count(), 5);
        assert_eq!(chart_cells(ChartKind::Line, 100.0, 100.0, 4), "   ●");
        assert_eq!(chart_cells(ChartKind::Area, 0.0, 100.0, 10), "");
    }
}
