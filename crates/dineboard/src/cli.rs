//! Terminal rendering for dashboard panels
//!
//! Every formatter returns a String: a comfy-table for humans, or pretty
//! JSON when `json` is set.

use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use dineboard_core::client::Endpoint;
use dineboard_core::export::ExportOutcome;
use dineboard_core::CoreError;
use dineboard_core::format::{
    format_count, format_currency, format_decimal, format_minutes, format_number, format_percent,
};
use dineboard_core::models::{
    AiQueryResponse, CancellationMetrics, CustomerMetrics, CustomerSegment, DeliveryOverview,
    DeliveryPlatform, DeliveryRegion, DeliveryTiming, HourlyLoad, OperationalMetrics,
    PaymentMethod, RevenuePoint, TopCustomer,
};
use dineboard_core::views::ai_query::{detect_visualization, format_cell, Visualization};
use dineboard_core::views::customers::{
    activity_windows, inactivity_breakdown, payment_shares, segment_summary, top_customers_total,
    CustomerShares, CustomerTab, PaymentSplit,
};
use dineboard_core::views::delivery::{status_shares, DeliveryTab, PerformanceTier};
use dineboard_core::views::operational::{shift_summaries, top_cancellation_reasons, OperationalTab};
use dineboard_core::views::revenue::{axis_label, chart_cells, ChartKind, RevenueMode, RevenueStats};
use dineboard_core::views::KpiPanel;
use serde::Serialize;

/// Width of terminal chart bars
const CHART_WIDTH: usize = 40;

// ============================================================================
// Table helpers
// ============================================================================

fn table(headers: &[&str], no_color: bool) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
    table
}

fn growth_cell(text: Option<String>, up: bool, no_color: bool) -> Cell {
    let text = text.unwrap_or_else(|| "-".to_string());
    if no_color || text == "-" {
        Cell::new(text)
    } else if up {
        Cell::new(text).fg(Color::Green)
    } else {
        Cell::new(text).fg(Color::Red)
    }
}

fn tier_cell(text: String, tier: PerformanceTier, no_color: bool) -> Cell {
    if no_color {
        return Cell::new(text);
    }
    let color = match tier {
        PerformanceTier::Good => Color::Green,
        PerformanceTier::Warning => Color::Yellow,
        PerformanceTier::Critical => Color::Red,
    };
    Cell::new(text).fg(color)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    }
}

// ============================================================================
// Panels
// ============================================================================

pub fn format_kpi(panel: &KpiPanel, json: bool, no_color: bool) -> String {
    if json {
        return to_json(panel);
    }

    let mut t = table(&["Metric", "Value", "Change", "Description"], no_color);
    for card in panel.primary.iter().chain(panel.secondary.iter()) {
        t.add_row(Row::from(vec![
            Cell::new(card.label),
            Cell::new(&card.value),
            growth_cell(card.change_text(), card.is_growth(), no_color),
            Cell::new(card.description),
        ]));
    }
    t.to_string()
}

pub fn format_revenue(
    points: &[RevenuePoint],
    mode: RevenueMode,
    kind: ChartKind,
    json: bool,
    no_color: bool,
) -> String {
    let stats = RevenueStats::from_series(points);
    if json {
        return to_json(&serde_json::json!({ "series": points, "stats": stats }));
    }
    let Some(stats) = stats else {
        return "No data available for the selected period.".to_string();
    };

    let mut headers = vec!["Date"];
    if mode.shows_revenue() {
        headers.push("Revenue");
    }
    if mode.shows_orders() {
        headers.push("Orders");
    }
    headers.push("Chart");

    let max_orders = points.iter().map(|p| p.orders).max().unwrap_or(0) as f64;
    let mut t = table(&headers, no_color);
    for p in points {
        let mut row = vec![Cell::new(&p.date)];
        if mode.shows_revenue() {
            row.push(Cell::new(format_currency(p.revenue)));
        }
        if mode.shows_orders() {
            row.push(Cell::new(format_count(p.orders)));
        }
        let bar = if mode == RevenueMode::Orders {
            chart_cells(kind, p.orders as f64, max_orders, CHART_WIDTH)
        } else {
            chart_cells(kind, p.revenue, stats.max, CHART_WIDTH)
        };
        row.push(Cell::new(bar));
        t.add_row(Row::from(row));
    }

    let peak = if mode == RevenueMode::Orders {
        axis_label(max_orders, mode)
    } else {
        axis_label(stats.max, mode)
    };
    format!(
        "{}\n{} • Peak: {} • Days: {}",
        t,
        stats.summary(mode),
        peak,
        stats.days
    )
}

/// Payloads behind the customer panel
#[derive(Debug, Default, Serialize)]
pub struct CustomerData {
    pub metrics: CustomerMetrics,
    pub top_customers: Vec<TopCustomer>,
    pub segments: Vec<CustomerSegment>,
    pub payment_methods: Vec<PaymentMethod>,
}

pub fn format_customers(data: &CustomerData, tab: CustomerTab, json: bool, no_color: bool) -> String {
    if json {
        return to_json(data);
    }

    match tab {
        CustomerTab::Overview => {
            let m = &data.metrics;
            let shares = CustomerShares::from_metrics(m);
            let mut t = table(&["Metric", "Value", "Share"], no_color);
            t.add_row(vec!["Total customers".to_string(), format_count(m.total), String::new()]);
            t.add_row(vec![
                "Active".to_string(),
                format_count(m.active),
                format_percent(shares.active_pct),
            ]);
            t.add_row(vec![
                "Inactive".to_string(),
                format_count(m.inactive),
                format_percent(shares.inactive_pct),
            ]);
            for bucket in activity_windows(m) {
                t.add_row(vec![
                    format!("Active: {}", bucket.label),
                    format_count(bucket.customers),
                    String::new(),
                ]);
            }
            for bucket in inactivity_breakdown(m) {
                t.add_row(vec![
                    bucket.label.to_string(),
                    format_count(bucket.customers),
                    String::new(),
                ]);
            }
            t.add_row(vec![
                "Average frequency".to_string(),
                format_number(m.average_frequency),
                String::new(),
            ]);
            t.add_row(vec![
                "Average ticket".to_string(),
                format_currency(m.average_ticket),
                String::new(),
            ]);
            t.to_string()
        }
        CustomerTab::Segmentation => {
            if data.segments.is_empty() {
                return "No segmentation data.".to_string();
            }
            let mut t = table(
                &["Segment", "Active", "Customers", "Average ticket", "Average spent"],
                no_color,
            );
            for s in &data.segments {
                t.add_row(vec![
                    s.segment.clone(),
                    if s.active { "Yes" } else { "No" }.to_string(),
                    format_count(s.customers),
                    format_currency(s.average_ticket),
                    format_currency(s.average_spent),
                ]);
            }
            let vip = segment_summary(&data.segments, "VIP");
            let new = segment_summary(&data.segments, "Novo");
            format!(
                "{}\nVIP: {} customers, ticket {} • New: {} customers, ticket {}",
                t,
                format_count(vip.customers),
                format_currency(vip.average_ticket),
                format_count(new.customers),
                format_currency(new.average_ticket)
            )
        }
        CustomerTab::Top => {
            if data.top_customers.is_empty() {
                return "No customers found.".to_string();
            }
            let mut t = table(
                &["#", "Customer", "Orders", "Total spent", "Average ticket", "Last order"],
                no_color,
            );
            for (i, c) in data.top_customers.iter().enumerate() {
                t.add_row(vec![
                    (i + 1).to_string(),
                    truncate(&c.name, 30),
                    format_count(c.total_orders),
                    format_currency(c.total_spent),
                    format_currency(c.average_ticket),
                    format!("{} days ago", c.days_since_last_order),
                ]);
            }
            format!(
                "{}\nCombined spend: {}",
                t,
                format_currency(top_customers_total(&data.top_customers))
            )
        }
        CustomerTab::Payments => {
            if data.payment_methods.is_empty() {
                return "No payment data.".to_string();
            }
            let mut t = table(
                &["Method", "Type", "Transactions", "Total", "Share"],
                no_color,
            );
            for p in payment_shares(&data.payment_methods) {
                t.add_row(vec![
                    p.method,
                    if p.online { "Online" } else { "In-person" }.to_string(),
                    format_count(p.transactions),
                    format_currency(p.amount),
                    format_percent(p.share_pct),
                ]);
            }
            let split = PaymentSplit::from_methods(&data.payment_methods);
            format!(
                "{}\nOnline {} (ticket {}) • In-person {} (ticket {})\n{}",
                t,
                format_percent(split.online_pct()),
                format_currency(split.online_ticket()),
                format_percent(split.in_person_pct()),
                format_currency(split.in_person_ticket()),
                split.insight().message()
            )
        }
    }
}

/// Payload of the one delivery tab that was fetched
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DeliveryData {
    Overview(DeliveryOverview),
    Regions(Vec<DeliveryRegion>),
    Platforms(Vec<DeliveryPlatform>),
    Timing(DeliveryTiming),
}

impl DeliveryData {
    pub fn tab(&self) -> DeliveryTab {
        match self {
            DeliveryData::Overview(_) => DeliveryTab::Overview,
            DeliveryData::Regions(_) => DeliveryTab::Regions,
            DeliveryData::Platforms(_) => DeliveryTab::Platforms,
            DeliveryData::Timing(_) => DeliveryTab::Timing,
        }
    }
}

pub fn format_delivery(data: &DeliveryData, json: bool, no_color: bool) -> String {
    if json {
        return to_json(data);
    }

    match data {
        DeliveryData::Overview(o) => {
            let tier = PerformanceTier::from_delivery_secs(o.avg_delivery_secs);
            let mut t = table(&["Metric", "Value"], no_color);
            t.add_row(vec!["Total deliveries".to_string(), format_count(o.total_deliveries)]);
            t.add_row(vec!["Delivery rate".to_string(), format_percent(o.delivery_rate)]);
            t.add_row(Row::from(vec![
                Cell::new("Average delivery time"),
                tier_cell(format_minutes(o.avg_delivery_secs), tier, no_color),
            ]));
            t.add_row(vec![
                "Average production time".to_string(),
                format_minutes(o.avg_production_secs),
            ]);
            t.add_row(vec!["Success rate".to_string(), format_percent(o.success_rate)]);
            t.add_row(vec!["Delivered".to_string(), format_count(o.delivered_count)]);
            t.add_row(vec![
                "Average delivery fee".to_string(),
                format_currency(o.avg_delivery_fee),
            ]);
            t.add_row(vec![
                "Total delivery fees".to_string(),
                format_currency(o.total_delivery_fees),
            ]);

            let shares = status_shares(o);
            if shares.is_empty() {
                return t.to_string();
            }
            let mut s = table(&["Status", "Deliveries", "Share"], no_color);
            for share in shares {
                s.add_row(vec![
                    share.status,
                    format_count(share.count),
                    format_percent(share.share_pct),
                ]);
            }
            format!("{}\n{}", t, s)
        }
        DeliveryData::Regions(regions) => {
            if regions.is_empty() {
                return "No region data.".to_string();
            }
            let mut t = table(
                &["Region", "Deliveries", "Delivery time", "Distance", "Fee", "Efficiency"],
                no_color,
            );
            for r in regions {
                t.add_row(Row::from(vec![
                    Cell::new(truncate(r.display_name(), 30)),
                    Cell::new(format_count(r.total_deliveries)),
                    tier_cell(
                        format_minutes(r.avg_delivery_secs),
                        PerformanceTier::from_delivery_secs(r.avg_delivery_secs),
                        no_color,
                    ),
                    Cell::new(
                        r.avg_distance
                            .map(|d| format!("{} km", format_decimal(d, 1)))
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    Cell::new(format_currency(r.avg_delivery_fee)),
                    tier_cell(
                        format_decimal(r.efficiency_score, 0),
                        PerformanceTier::from_efficiency(r.efficiency_score),
                        no_color,
                    ),
                ]));
            }
            t.to_string()
        }
        DeliveryData::Platforms(platforms) => {
            if platforms.is_empty() {
                return "No platform data.".to_string();
            }
            let mut t = table(
                &[
                    "Platform",
                    "Orders",
                    "Revenue",
                    "Ticket",
                    "Delivery time",
                    "Courier fee",
                    "Market share",
                ],
                no_color,
            );
            for p in platforms {
                t.add_row(vec![
                    p.display_name().to_string(),
                    format_count(p.total_orders),
                    format_currency(p.total_revenue),
                    format_currency(p.avg_ticket),
                    format_minutes(p.avg_delivery_secs),
                    format_currency(p.avg_courier_fee),
                    format_percent(p.market_share),
                ]);
            }
            t.to_string()
        }
        DeliveryData::Timing(timing) => {
            if timing.timeline.is_empty() && timing.hourly.is_empty() {
                return "No timing data.".to_string();
            }
            let mut t = table(&["Date", "Delivery time", "Production time"], no_color);
            for p in &timing.timeline {
                t.add_row(vec![
                    p.date.clone(),
                    format_minutes(p.avg_delivery_secs),
                    format_minutes(p.avg_production_secs),
                ]);
            }
            let mut h = table(&["Hour", "Average time"], no_color);
            for p in &timing.hourly {
                h.add_row(vec![format!("{}h", p.hour), format_minutes(p.avg_secs)]);
            }
            format!("{}\n{}", t, h)
        }
    }
}

/// Payloads behind the operational panel
#[derive(Debug, Default, Serialize)]
pub struct OperationalData {
    pub metrics: OperationalMetrics,
    pub hourly: Vec<HourlyLoad>,
    pub cancellations: CancellationMetrics,
}

pub fn format_operational(
    data: &OperationalData,
    tab: OperationalTab,
    json: bool,
    no_color: bool,
) -> String {
    if json {
        return to_json(data);
    }

    match tab {
        OperationalTab::Overview => {
            let m = &data.metrics;
            let mut t = table(&["Metric", "Value"], no_color);
            t.add_row(Row::from(vec![
                Cell::new("Overall efficiency"),
                tier_cell(
                    format_percent(m.overall_efficiency),
                    PerformanceTier::from_efficiency(m.overall_efficiency),
                    no_color,
                ),
            ]));
            t.add_row(vec!["Orders per hour".to_string(), format_number(m.orders_per_hour)]);
            t.add_row(vec![
                "Cancellation rate".to_string(),
                format_percent(m.cancellation_rate),
            ]);
            t.add_row(vec![
                "Average production time".to_string(),
                format_minutes(m.avg_production_secs),
            ]);
            t.add_row(vec![
                "Average delivery time".to_string(),
                format_minutes(m.avg_delivery_secs),
            ]);
            t.add_row(vec![
                "Cancellations".to_string(),
                format_count(m.total_cancellations),
            ]);
            t.to_string()
        }
        OperationalTab::Shifts => {
            let mut t = table(
                &["Shift", "Orders", "Avg prep time", "Efficiency", "Recommendations"],
                no_color,
            );
            for s in shift_summaries(&data.hourly) {
                let recommendations: Vec<&str> =
                    s.recommendations().iter().map(|r| r.message()).collect();
                t.add_row(Row::from(vec![
                    Cell::new(s.label),
                    Cell::new(format_count(s.total_orders)),
                    Cell::new(format_minutes(s.avg_prep_secs)),
                    tier_cell(
                        format_decimal(s.efficiency, 0),
                        PerformanceTier::from_efficiency(s.efficiency),
                        no_color,
                    ),
                    Cell::new(if recommendations.is_empty() {
                        "-".to_string()
                    } else {
                        recommendations.join("; ")
                    }),
                ]));
            }
            t.to_string()
        }
        OperationalTab::Cancellations => {
            let c = &data.cancellations;
            let mut t = table(&["Reason", "Cancellations"], no_color);
            for (reason, count) in top_cancellation_reasons(c) {
                t.add_row(vec![reason, format_count(count)]);
            }
            format!(
                "{}\nRate: {} • {} of {} orders cancelled",
                t,
                format_percent(c.overall_rate),
                format_count(c.total_cancellations),
                format_count(c.total_orders)
            )
        }
    }
}

pub fn format_ai_query(response: &AiQueryResponse, json: bool, no_color: bool) -> String {
    if json {
        return to_json(response);
    }

    let mut out = String::new();
    if let Some(sql) = &response.sql {
        out.push_str(&format!("SQL: {}\n", sql));
    }
    if response.data.is_empty() {
        out.push_str("No rows returned.");
        return out;
    }

    let columns = response.columns();
    let mut t = table(&columns, no_color);
    for row in &response.data {
        t.add_row(
            columns
                .iter()
                .map(|c| row.get(*c).map(format_cell).unwrap_or_default())
                .collect::<Vec<_>>(),
        );
    }
    let view = match detect_visualization(&response.data) {
        Visualization::Chart => "chart",
        Visualization::Table => "table",
    };
    out.push_str(&format!(
        "{}\n{} rows • suggested view: {}",
        t,
        response.rows(),
        view
    ));
    out
}

pub fn format_endpoints(base_url: &str, no_color: bool) -> String {
    let mut t = table(&["Method", "Endpoint", "URL"], no_color);
    for endpoint in Endpoint::ALL {
        t.add_row(vec![
            endpoint.method().to_string(),
            endpoint.path().to_string(),
            format!("{}/{}", base_url.trim_end_matches('/'), endpoint.path()),
        ]);
    }
    t.to_string()
}

pub fn format_export_summary(outcome: &ExportOutcome, json: bool) -> String {
    if json {
        return to_json(&serde_json::json!({
            "path": outcome.path,
            "bytes": outcome.bytes,
            "format": outcome.format.to_string(),
            "degraded": outcome.report.degraded_endpoints(),
        }));
    }

    let mut lines = vec![format!(
        "✓ Exported {} ({} bytes)",
        outcome.path.display(),
        outcome.bytes
    )];
    for issue in &outcome.report.issues {
        lines.push(format!("  ⚠ {} skipped: {}", issue.endpoint, issue.message));
        if let Some(suggestion) = &issue.suggestion {
            lines.push(format!("    → {}", suggestion));
        }
    }
    lines.join("\n")
}

/// Error line of an aborted export, with the failing URL when known
pub fn format_export_failure(error: &CoreError) -> String {
    let mut lines = vec![format!("✗ {}", error)];
    if let Some(url) = error.url() {
        lines.push(format!("  → Check the endpoint: curl -i '{}'", url));
    }
    lines.join("\n")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dineboard_core::models::{Metrics, StatusCount};
    use dineboard_core::views::kpi_panel;
    use serde_json::json;

    #[test]
    fn test_kpi_table_and_json() {
        let panel = kpi_panel(&Metrics {
            revenue: 1234.5,
            orders: 10,
            ..Metrics::default()
        });
        let table = format_kpi(&panel, false, true);
        assert!(table.contains("R$ 1.234,50"));
        assert!(table.contains("Average ticket"));

        let json = format_kpi(&panel, true, true);
        assert!(json.starts_with('{'));
        assert!(json.contains("\"primary\""));
    }

    #[test]
    fn test_revenue_empty_series() {
        let out = format_revenue(&[], RevenueMode::Revenue, ChartKind::Bar, false, true);
        assert!(out.contains("No data available"));
    }

    #[test]
    fn test_revenue_orders_mode_hides_revenue() {
        let points = vec![RevenuePoint {
            date: "2024-01-01".into(),
            revenue: 500.0,
            orders: 12,
        }];
        let out = format_revenue(&points, RevenueMode::Orders, ChartKind::Bar, false, true);
        assert!(!out.contains("R$ 500,00"));
        assert!(out.contains("Total: 12"));
    }

    #[test]
    fn test_delivery_overview_statuses() {
        let data = DeliveryData::Overview(DeliveryOverview {
            total_deliveries: 100,
            status_distribution: vec![StatusCount {
                status: "CONCLUDED".into(),
                count: 100,
            }],
            ..DeliveryOverview::default()
        });
        assert_eq!(data.tab(), DeliveryTab::Overview);
        let out = format_delivery(&data, false, true);
        assert!(out.contains("CONCLUDED"));
        assert!(out.contains("100.0%"));
    }

    #[test]
    fn test_ai_query_table() {
        let response: AiQueryResponse = serde_json::from_value(json!({
            "sql": "SELECT store, total FROM t",
            "data": [{"store": "Centro", "total": 1500.5}, {"store": "Norte", "total": 12}]
        }))
        .unwrap();
        let out = format_ai_query(&response, false, true);
        assert!(out.starts_with("SQL: SELECT"));
        assert!(out.contains("R$ 1.500,50"));
        assert!(out.contains("suggested view: chart"));
    }

    #[test]
    fn test_endpoints_lists_all() {
        let out = format_endpoints("http://localhost:3001/api/", true);
        assert!(out.contains("http://localhost:3001/api/ai-query"));
        assert!(out.contains("POST"));
    }

    #[test]
    fn test_truncate_unicode() {
        assert_eq!(truncate("São Paulo", 20), "São Paulo");
        assert_eq!(truncate("São Paulo", 4), "São…");
    }

    #[test]
    fn test_export_failure_names_url() {
        let error = CoreError::RequiredEndpoint {
            endpoint: "metrics",
            source: Box::new(CoreError::HttpStatus {
                url: "http://localhost:3001/api/metrics?period=30".into(),
                status: 500,
                message: "boom".into(),
            }),
        };
        let out = format_export_failure(&error);
        assert!(out.starts_with("✗ "));
        assert!(out.contains("curl -i 'http://localhost:3001/api/metrics?period=30'"));

        let out = format_export_failure(&CoreError::EmptyQuestion);
        assert_eq!(out.lines().count(), 1);
    }
}
