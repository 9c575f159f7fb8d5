//! Printable HTML report
//!
//! A single self-contained page: header, headline cards, insight summary,
//! product/item/channel/store tables, payment and coupon tables when
//! present, and a timing section. Every text value coming from the API is
//! HTML-escaped.

use super::bundle::ReportBundle;
use crate::format::{
    format_count, format_currency, format_decimal, format_growth, format_minutes, format_number,
};
use chrono::Local;
use std::io::{self, Write};

/// Products listed in the HTML report
pub const HTML_PRODUCTS: usize = 15;
/// Add-on items listed in the HTML report
pub const HTML_ITEMS: usize = 10;

/// HTML escape for safe output
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn rank_class(index: usize) -> &'static str {
    match index {
        0 => "rank gold",
        1 => "rank silver",
        2 => "rank bronze",
        _ => "rank",
    }
}

const STYLE: &[&str] = &[
    "body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; max-width: 1100px; margin: 40px auto; padding: 20px; color: #1f2937; }",
    ".header { border-bottom: 3px solid #2563eb; padding-bottom: 20px; margin-bottom: 30px; }",
    ".header h1 { margin: 0 0 12px 0; font-size: 28px; }",
    ".header-info { color: #6b7280; line-height: 1.8; }",
    ".cards { display: grid; grid-template-columns: repeat(4, 1fr); gap: 16px; margin-bottom: 30px; }",
    ".card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 16px; }",
    ".card .label { color: #6b7280; font-size: 13px; }",
    ".card .value { font-size: 22px; font-weight: 700; margin-top: 6px; }",
    ".card .sub { font-size: 12px; color: #6b7280; margin-top: 4px; }",
    ".up { color: #059669; } .down { color: #dc2626; }",
    ".summary { background: #eff6ff; border-left: 4px solid #2563eb; padding: 16px; margin-bottom: 30px; line-height: 1.7; }",
    "h2 { font-size: 20px; margin: 32px 0 12px 0; }",
    "table { width: 100%; border-collapse: collapse; font-size: 14px; }",
    "th { background: #f3f4f6; text-align: left; padding: 8px; }",
    "td { border-bottom: 1px solid #e5e7eb; padding: 8px; }",
    "td.num, th.num { text-align: right; }",
    ".rank { font-weight: 700; } .gold { color: #d97706; } .silver { color: #6b7280; } .bronze { color: #b45309; }",
    ".footer { margin-top: 40px; color: #9ca3af; font-size: 12px; text-align: center; }",
    "@media print { body { margin: 0; } .card { break-inside: avoid; } }",
];

fn write_table_head<W: Write>(writer: &mut W, title: &str, headers: &[(&str, bool)]) -> io::Result<()> {
    writeln!(writer, "    <h2>{}</h2>", html_escape(title))?;
    writeln!(writer, "    <table>")?;
    write!(writer, "        <tr>")?;
    for (header, numeric) in headers {
        if *numeric {
            write!(writer, "<th class=\"num\">{}</th>", html_escape(header))?;
        } else {
            write!(writer, "<th>{}</th>", html_escape(header))?;
        }
    }
    writeln!(writer, "</tr>")
}

fn write_card<W: Write>(
    writer: &mut W,
    label: &str,
    value: &str,
    sub: Option<(&str, &str)>,
) -> io::Result<()> {
    writeln!(writer, "        <div class=\"card\">")?;
    writeln!(writer, "            <div class=\"label\">{}</div>", html_escape(label))?;
    writeln!(writer, "            <div class=\"value\">{}</div>", html_escape(value))?;
    if let Some((class, text)) = sub {
        writeln!(
            writer,
            "            <div class=\"sub {}\">{}</div>",
            class,
            html_escape(text)
        )?;
    }
    writeln!(writer, "        </div>")
}

fn growth_sub(growth: Option<f64>) -> Option<(&'static str, String)> {
    growth.map(|g| {
        let class = if g >= 0.0 { "up" } else { "down" };
        (class, format!("{} vs previous period", format_growth(g)))
    })
}

/// Write the complete report page
pub fn write_report<W: Write>(writer: &mut W, bundle: &ReportBundle) -> io::Result<()> {
    let m = &bundle.metrics;
    let generated = bundle
        .generated_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();

    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html lang=\"en\">")?;
    writeln!(writer, "<head>")?;
    writeln!(writer, "    <meta charset=\"UTF-8\">")?;
    writeln!(
        writer,
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    )?;
    writeln!(
        writer,
        "    <title>Full Report - {}</title>",
        html_escape(&bundle.period_text())
    )?;
    writeln!(writer, "    <style>")?;
    for rule in STYLE {
        writeln!(writer, "        {}", rule)?;
    }
    writeln!(writer, "    </style>")?;
    writeln!(writer, "</head>")?;
    writeln!(writer, "<body>")?;

    // Header
    writeln!(writer, "    <div class=\"header\">")?;
    writeln!(writer, "        <h1>Full Sales Report</h1>")?;
    writeln!(writer, "        <div class=\"header-info\">")?;
    writeln!(
        writer,
        "            <strong>Period:</strong> {}<br>",
        html_escape(&bundle.period_text())
    )?;
    writeln!(
        writer,
        "            <strong>Generated at:</strong> {}<br>",
        generated
    )?;
    for (label, value) in bundle.filters.describe() {
        writeln!(
            writer,
            "            <strong>{}:</strong> {}<br>",
            label,
            html_escape(&value)
        )?;
    }
    writeln!(writer, "        </div>")?;
    writeln!(writer, "    </div>")?;

    // Headline cards
    let revenue_sub = growth_sub(m.revenue_growth());
    let orders_sub = growth_sub(m.orders_growth());
    let per_customer = format!(
        "{} orders per customer",
        format_decimal(m.orders_per_customer(), 1)
    );
    writeln!(writer, "    <div class=\"cards\">")?;
    write_card(
        writer,
        "Revenue",
        &format_currency(m.revenue),
        revenue_sub.as_ref().map(|(c, t)| (*c, t.as_str())),
    )?;
    write_card(
        writer,
        "Orders",
        &format_count(m.orders),
        orders_sub.as_ref().map(|(c, t)| (*c, t.as_str())),
    )?;
    write_card(writer, "Average ticket", &format_currency(m.average_ticket), None)?;
    write_card(
        writer,
        "Customers",
        &format_count(m.customers),
        Some(("", per_customer.as_str())),
    )?;
    writeln!(writer, "    </div>")?;

    // Summary
    writeln!(writer, "    <div class=\"summary\">")?;
    writeln!(
        writer,
        "        In this period the operation billed <strong>{}</strong> across <strong>{}</strong> orders, \
         an average ticket of <strong>{}</strong>.",
        format_currency(m.revenue),
        format_count(m.orders),
        format_currency(m.average_ticket)
    )?;
    if let Some(top) = bundle.products.first() {
        writeln!(
            writer,
            "        Best seller: <strong>{}</strong> with {} in revenue.",
            html_escape(&top.name),
            format_currency(top.revenue)
        )?;
    }
    if let Some(channel) = bundle
        .channels
        .iter()
        .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
    {
        writeln!(
            writer,
            "        Leading channel: <strong>{}</strong> ({}% of orders).",
            html_escape(&channel.name),
            channel.percent
        )?;
    }
    writeln!(writer, "    </div>")?;

    // Products
    write_table_head(
        writer,
        "Top 15 Products",
        &[
            ("#", false),
            ("Product", false),
            ("Category", false),
            ("Sales", true),
            ("Revenue", true),
            ("Average price", true),
            ("% Total", true),
        ],
    )?;
    for (i, p) in bundle.products.iter().take(HTML_PRODUCTS).enumerate() {
        writeln!(
            writer,
            "        <tr><td class=\"{}\">{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td>\
             <td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}%</td></tr>",
            rank_class(i),
            i + 1,
            html_escape(&p.name),
            html_escape(p.category.as_deref().unwrap_or("-")),
            format_count(p.sales),
            format_currency(p.revenue),
            format_currency(p.average_price),
            format_decimal(bundle.product_share(p), 1)
        )?;
    }
    writeln!(writer, "    </table>")?;

    if !bundle.top_items.is_empty() {
        write_table_head(
            writer,
            "Top 10 Add-on Items",
            &[
                ("Item", false),
                ("Group", false),
                ("Times added", true),
                ("Revenue", true),
            ],
        )?;
        for item in bundle.top_items.iter().take(HTML_ITEMS) {
            writeln!(
                writer,
                "        <tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
                html_escape(&item.name),
                html_escape(item.group.as_deref().unwrap_or("-")),
                format_count(item.times_added),
                format_currency(item.revenue)
            )?;
        }
        writeln!(writer, "    </table>")?;
    }

    write_table_head(
        writer,
        "Sales Channels",
        &[
            ("Channel", false),
            ("Orders", true),
            ("Revenue", true),
            ("Average ticket", true),
            ("Share", true),
        ],
    )?;
    for c in &bundle.channels {
        writeln!(
            writer,
            "        <tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
             <td class=\"num\">{}</td><td class=\"num\">{}%</td></tr>",
            html_escape(&c.name),
            format_count(c.orders),
            format_currency(c.revenue),
            format_currency(c.average_ticket),
            c.percent
        )?;
    }
    writeln!(writer, "    </table>")?;

    write_table_head(
        writer,
        "Store Performance",
        &[
            ("Store", false),
            ("City", false),
            ("Orders", true),
            ("Revenue", true),
            ("Average ticket", true),
            ("Production time", true),
        ],
    )?;
    for s in &bundle.stores {
        writeln!(
            writer,
            "        <tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
             <td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            html_escape(&s.name),
            html_escape(s.city.as_deref().unwrap_or("-")),
            format_count(s.orders),
            format_currency(s.revenue),
            format_currency(s.average_ticket),
            format_minutes(s.avg_production_secs)
        )?;
    }
    writeln!(writer, "    </table>")?;

    if !bundle.payment_methods.is_empty() {
        write_table_head(
            writer,
            "Payment Methods",
            &[
                ("Method", false),
                ("Type", false),
                ("Transactions", true),
                ("Total", true),
                ("Average ticket", true),
            ],
        )?;
        for p in &bundle.payment_methods {
            writeln!(
                writer,
                "        <tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
                 <td class=\"num\">{}</td></tr>",
                html_escape(&p.method),
                if p.online { "Online" } else { "In-person" },
                format_count(p.transactions),
                format_currency(p.amount),
                format_currency(p.average_ticket())
            )?;
        }
        writeln!(writer, "    </table>")?;
    }

    if !bundle.coupons.is_empty() {
        write_table_head(
            writer,
            "Coupons",
            &[
                ("Code", false),
                ("Type", false),
                ("Uses", true),
                ("Total discount", true),
                ("Average ticket", true),
            ],
        )?;
        for c in &bundle.coupons {
            writeln!(
                writer,
                "        <tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
                 <td class=\"num\">{}</td></tr>",
                html_escape(&c.code),
                html_escape(&c.kind),
                format_count(c.uses),
                format_currency(c.total_discount),
                format_currency(c.average_ticket)
            )?;
        }
        writeln!(writer, "    </table>")?;
    }

    // Timing
    writeln!(writer, "    <h2>Timing</h2>")?;
    writeln!(writer, "    <div class=\"cards\">")?;
    write_card(
        writer,
        "Average production time",
        &format_minutes(m.avg_production_secs),
        None,
    )?;
    write_card(
        writer,
        "Average delivery time",
        &format_minutes(m.avg_delivery_secs),
        None,
    )?;
    write_card(
        writer,
        "Days analyzed",
        &format_number(bundle.revenue.len() as f64),
        None,
    )?;
    writeln!(writer, "    </div>")?;

    writeln!(
        writer,
        "    <div class=\"footer\">Generated by dineboard on {}</div>",
        generated
    )?;
    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;

    writer.flush()
}
