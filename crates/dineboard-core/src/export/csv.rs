//! CSV report writer
//!
//! The file is a sequence of titled blocks separated by blank lines, each
//! block a header row plus data rows. The detailed variant prepends a
//! report header and adds derived columns (product share of revenue,
//! ticket per payment method, discount per coupon use, share of orders
//! per channel). Output starts with a UTF-8 BOM so spreadsheet apps pick
//! the right encoding.

use super::bundle::ReportBundle;
use std::io::{self, Write};

/// Byte order mark written at the start of every CSV file
pub const UTF8_BOM: &str = "\u{FEFF}";

/// Quote a cell when it contains a comma, quote or newline
pub fn escape_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Write one escaped row
pub fn write_row<W, S>(writer: &mut W, cells: &[S]) -> io::Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    let line: Vec<String> = cells.iter().map(|c| escape_cell(c.as_ref())).collect();
    writeln!(writer, "{}", line.join(","))
}

fn write_block<W: Write>(
    writer: &mut W,
    title: &str,
    headers: &[&str],
    rows: &[Vec<String>],
) -> io::Result<()> {
    writeln!(writer, "{}", escape_cell(title))?;
    write_row(writer, headers)?;
    for row in rows {
        write_row(writer, row)?;
    }
    writeln!(writer)
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

fn minutes(secs: f64) -> String {
    format!("{}", (secs / 60.0).floor().max(0.0) as u64)
}

fn growth(value: Option<f64>) -> String {
    value.map(|g| format!("{}%", g)).unwrap_or_default()
}

/// Write the report as CSV; `detailed` selects the rich variant
pub fn write_report<W: Write>(
    writer: &mut W,
    bundle: &ReportBundle,
    detailed: bool,
) -> io::Result<()> {
    write!(writer, "{}", UTF8_BOM)?;

    if detailed {
        writeln!(writer, "DINEBOARD FULL REPORT")?;
        write_row(writer, &["Period", &bundle.period_text()])?;
        write_row(
            writer,
            &[
                "Generated at",
                &bundle
                    .generated_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            ],
        )?;
        for (label, value) in bundle.filters.describe() {
            write_row(writer, &[label, value.as_str()])?;
        }
        writeln!(writer)?;
    }

    let m = &bundle.metrics;
    write_block(
        writer,
        "GENERAL METRICS",
        &["Metric", "Value", "Growth"],
        &[
            vec!["Revenue (R$)".into(), money(m.revenue), growth(m.revenue_growth())],
            vec!["Orders".into(), m.orders.to_string(), growth(m.orders_growth())],
            vec!["Average ticket (R$)".into(), money(m.average_ticket), String::new()],
            vec!["Customers".into(), m.customers.to_string(), String::new()],
            vec![
                "Avg production time (min)".into(),
                minutes(m.avg_production_secs),
                String::new(),
            ],
            vec![
                "Avg delivery time (min)".into(),
                minutes(m.avg_delivery_secs),
                String::new(),
            ],
        ],
    )?;

    let mut product_headers = vec![
        "Ranking",
        "Product",
        "Category",
        "Sales",
        "Quantity",
        "Revenue (R$)",
        "Average price (R$)",
    ];
    if detailed {
        product_headers.push("Share of revenue (%)");
    }
    let products: Vec<Vec<String>> = bundle
        .products
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut row = vec![
                (i + 1).to_string(),
                p.name.clone(),
                p.category.clone().unwrap_or_else(|| "-".into()),
                p.sales.to_string(),
                p.quantity.to_string(),
                money(p.revenue),
                money(p.average_price),
            ];
            if detailed {
                row.push(format!("{:.2}", bundle.product_share(p)));
            }
            row
        })
        .collect();
    write_block(writer, "TOP PRODUCTS", &product_headers, &products)?;

    if !bundle.top_items.is_empty() {
        let items: Vec<Vec<String>> = bundle
            .top_items
            .iter()
            .map(|item| {
                vec![
                    item.name.clone(),
                    item.group.clone().unwrap_or_else(|| "-".into()),
                    item.times_added.to_string(),
                    item.quantity.to_string(),
                    money(item.revenue),
                ]
            })
            .collect();
        write_block(
            writer,
            "TOP ITEMS",
            &["Item", "Group", "Times added", "Quantity", "Revenue (R$)"],
            &items,
        )?;
    }

    let mut channel_headers = vec![
        "Channel",
        "Type",
        "Orders",
        "Revenue (R$)",
        "Average ticket (R$)",
        "Share",
    ];
    if detailed {
        channel_headers.push("Share of orders (%)");
    }
    let channels: Vec<Vec<String>> = bundle
        .channels
        .iter()
        .map(|c| {
            let mut row = vec![
                c.name.clone(),
                c.kind.clone(),
                c.orders.to_string(),
                money(c.revenue),
                money(c.average_ticket),
                format!("{}%", c.percent),
            ];
            if detailed {
                row.push(format!("{:.2}", bundle.channel_order_share(c)));
            }
            row
        })
        .collect();
    write_block(writer, "CHANNEL DISTRIBUTION", &channel_headers, &channels)?;

    let stores: Vec<Vec<String>> = bundle
        .stores
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.city.clone().unwrap_or_default(),
                s.orders.to_string(),
                money(s.revenue),
                money(s.average_ticket),
                minutes(s.avg_production_secs),
            ]
        })
        .collect();
    write_block(
        writer,
        "STORE PERFORMANCE",
        &[
            "Store",
            "City",
            "Orders",
            "Revenue (R$)",
            "Average ticket (R$)",
            "Production time (min)",
        ],
        &stores,
    )?;

    let hourly: Vec<Vec<String>> = bundle
        .hourly
        .iter()
        .map(|h| vec![format!("{}h", h.hour), h.orders.to_string(), money(h.revenue)])
        .collect();
    write_block(
        writer,
        "SALES BY HOUR",
        &["Hour", "Orders", "Revenue (R$)"],
        &hourly,
    )?;

    if !bundle.payment_methods.is_empty() {
        let mut headers = vec!["Method", "Online", "Transactions", "Total (R$)"];
        if detailed {
            headers.push("Average ticket (R$)");
        }
        let rows: Vec<Vec<String>> = bundle
            .payment_methods
            .iter()
            .map(|p| {
                let mut row = vec![
                    p.method.clone(),
                    if p.online { "Yes" } else { "No" }.to_string(),
                    p.transactions.to_string(),
                    money(p.amount),
                ];
                if detailed {
                    row.push(money(p.average_ticket()));
                }
                row
            })
            .collect();
        write_block(writer, "PAYMENT METHODS", &headers, &rows)?;
    }

    if !bundle.coupons.is_empty() {
        let mut headers = vec![
            "Code",
            "Type",
            "Uses",
            "Total discount (R$)",
            "Average ticket with coupon (R$)",
        ];
        if detailed {
            headers.push("Discount per use (R$)");
        }
        let rows: Vec<Vec<String>> = bundle
            .coupons
            .iter()
            .map(|c| {
                let mut row = vec![
                    c.code.clone(),
                    c.kind.clone(),
                    c.uses.to_string(),
                    money(c.total_discount),
                    money(c.average_ticket),
                ];
                if detailed {
                    row.push(money(c.discount_per_use()));
                }
                row
            })
            .collect();
        write_block(writer, "COUPON PERFORMANCE", &headers, &rows)?;
    }

    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterState;
    use crate::models::{ChannelShare, Metrics, PaymentMethod, TopProduct};
    use chrono::Utc;

    fn render(bundle: &ReportBundle, detailed: bool) -> String {
        let mut out = Vec::new();
        write_report(&mut out, bundle, detailed).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample() -> ReportBundle {
        let mut bundle = ReportBundle::empty(FilterState::for_period("7"), Utc::now());
        bundle.metrics = Metrics {
            revenue: 15230.5,
            orders: 320,
            average_ticket: 47.6,
            customers: 210,
            avg_production_secs: 1290.0,
            ..Metrics::default()
        };
        bundle.products = vec![TopProduct {
            name: "Burger, double".into(),
            sales: 40,
            quantity: 52.0,
            revenue: 1800.0,
            average_price: 34.6,
            ..TopProduct::default()
        }];
        bundle.channels = vec![ChannelShare {
            name: "iFood".into(),
            kind: "D".into(),
            orders: 120,
            revenue: 6000.0,
            average_ticket: 50.0,
            percent: 37.5,
        }];
        bundle
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("plain"), "plain");
        assert_eq!(escape_cell("a,b"), "\"a,b\"");
        assert_eq!(escape_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_cell("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_basic_report_sections() {
        let csv = render(&sample(), false);
        assert!(csv.starts_with(UTF8_BOM));
        assert!(csv.contains("GENERAL METRICS\nMetric,Value,Growth\nRevenue (R$),15230.50,\n"));
        assert!(csv.contains("Avg production time (min),21,"));
        assert!(csv.contains("1,\"Burger, double\",-,40,52,1800.00,34.60\n"));
        assert!(csv.contains("iFood,D,120,6000.00,50.00,37.5%\n"));
        assert!(csv.contains("STORE PERFORMANCE"));
        assert!(csv.contains("SALES BY HOUR"));
        // Optional sections are left out when empty
        assert!(!csv.contains("TOP ITEMS"));
        assert!(!csv.contains("PAYMENT METHODS"));
        assert!(!csv.contains("COUPON PERFORMANCE"));
        assert!(!csv.contains("DINEBOARD FULL REPORT"));
    }

    #[test]
    fn test_detailed_report_adds_header_and_columns() {
        let mut bundle = sample();
        bundle.filters.channel = Some("iFood".into());
        bundle.payment_methods = vec![PaymentMethod {
            method: "Pix".into(),
            online: true,
            transactions: 4,
            amount: 200.0,
        }];
        let csv = render(&bundle, true);
        assert!(csv.contains("DINEBOARD FULL REPORT\nPeriod,7 days\n"));
        assert!(csv.contains("Channel,iFood\n"));
        assert!(csv.contains("Share of revenue (%)"));
        assert!(csv.contains(",1800.00,34.60,100.00\n"));
        assert!(csv.contains("Pix,Yes,4,200.00,50.00\n"));
        assert!(csv.contains("iFood,D,120,6000.00,50.00,37.5%,100.00\n"));
    }
}
