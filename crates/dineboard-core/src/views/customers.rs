//! Customer analytics: base activity, segments, top customers, payments

use crate::client::{ApiClient, Endpoint};
use crate::filters::FilterState;
use crate::format::format_percent;
use crate::models::{CustomerMetrics, CustomerSegment, PaymentMethod, TopCustomer};
use serde::Serialize;
use std::str::FromStr;

/// Rows requested for the top customers table
pub const TOP_CUSTOMERS_LIMIT: usize = 10;

/// Payment methods shown in the share list
pub const PAYMENT_SHARE_LIMIT: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerTab {
    #[default]
    Overview,
    Segmentation,
    Top,
    Payments,
}

impl FromStr for CustomerTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overview" => Ok(Self::Overview),
            "segmentation" | "segments" => Ok(Self::Segmentation),
            "top" => Ok(Self::Top),
            "payments" | "pay" => Ok(Self::Payments),
            other => Err(format!(
                "unknown customer tab '{}' (overview, segmentation, top, payments)",
                other
            )),
        }
    }
}

/// The four requests behind the customer panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerUrls {
    pub metrics: String,
    pub top_customers: String,
    pub segmentation: String,
    pub payment_methods: String,
}

pub fn customer_urls(client: &ApiClient, filters: &FilterState) -> CustomerUrls {
    let params = filters.query_params();
    CustomerUrls {
        metrics: client.url(Endpoint::CustomerMetrics, &params),
        top_customers: client.url(
            Endpoint::TopCustomers,
            &params.clone().with_limit(TOP_CUSTOMERS_LIMIT),
        ),
        segmentation: client.url(Endpoint::CustomerSegmentation, &params),
        payment_methods: client.url(Endpoint::PaymentMethods, &params),
    }
}

fn share(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        part * 100.0 / whole
    }
}

/// Shares of the customer base, in percent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerShares {
    pub active_pct: f64,
    pub inactive_pct: f64,
    /// Customers flagged in the 90-day window
    pub window_90d_pct: f64,
}

impl CustomerShares {
    pub fn from_metrics(metrics: &CustomerMetrics) -> Self {
        let total = metrics.total as f64;
        Self {
            active_pct: share(metrics.active as f64, total),
            inactive_pct: share(metrics.inactive as f64, total),
            window_90d_pct: share(metrics.active_90d as f64, total),
        }
    }
}

/// Slice of the inactivity breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityBucket {
    pub label: &'static str,
    pub customers: u64,
}

/// Active (≤30d), lapsed (31-90d) and inactive (>90d) customers
pub fn inactivity_breakdown(metrics: &CustomerMetrics) -> Vec<ActivityBucket> {
    vec![
        ActivityBucket {
            label: "Active (≤30d)",
            customers: metrics.bought_30d,
        },
        ActivityBucket {
            label: "Inactive (31-90d)",
            customers: metrics.bought_90d.saturating_sub(metrics.bought_30d),
        },
        ActivityBucket {
            label: "Inactive (>90d)",
            customers: metrics.inactive_90d,
        },
    ]
}

/// Customers active within each look-back window
pub fn activity_windows(metrics: &CustomerMetrics) -> Vec<ActivityBucket> {
    vec![
        ActivityBucket {
            label: "Last 7 days",
            customers: metrics.active_7d,
        },
        ActivityBucket {
            label: "15 days",
            customers: metrics.active_15d,
        },
        ActivityBucket {
            label: "30 days",
            customers: metrics.active_30d,
        },
        ActivityBucket {
            label: "90 days",
            customers: metrics.active_90d,
        },
    ]
}

/// Count and mean ticket of one named segment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub customers: u64,
    pub average_ticket: f64,
}

/// Sum the rows labelled `segment` ("VIP", "Novo", ...)
pub fn segment_summary(segments: &[CustomerSegment], segment: &str) -> SegmentSummary {
    let rows: Vec<_> = segments.iter().filter(|s| s.segment == segment).collect();
    if rows.is_empty() {
        return SegmentSummary::default();
    }
    SegmentSummary {
        customers: rows.iter().map(|s| s.customers).sum(),
        average_ticket: rows.iter().map(|s| s.average_ticket).sum::<f64>() / rows.len() as f64,
    }
}

/// Combined spend of the listed top customers
pub fn top_customers_total(customers: &[TopCustomer]) -> f64 {
    customers.iter().map(|c| c.total_spent).sum()
}

/// Payment method with its share of all transactions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentShare {
    pub method: String,
    pub online: bool,
    pub transactions: u64,
    pub amount: f64,
    pub share_pct: f64,
}

/// First `PAYMENT_SHARE_LIMIT` methods with their transaction share
pub fn payment_shares(methods: &[PaymentMethod]) -> Vec<PaymentShare> {
    let total: u64 = methods.iter().map(|p| p.transactions).sum();
    methods
        .iter()
        .take(PAYMENT_SHARE_LIMIT)
        .map(|p| PaymentShare {
            method: p.method.clone(),
            online: p.online,
            transactions: p.transactions,
            amount: p.amount,
            share_pct: share(p.transactions as f64, total as f64),
        })
        .collect()
}

/// Online vs in-person payment totals
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentSplit {
    pub online_total: f64,
    pub in_person_total: f64,
    pub online_transactions: u64,
    pub in_person_transactions: u64,
}

impl PaymentSplit {
    pub fn from_methods(methods: &[PaymentMethod]) -> Self {
        methods.iter().fold(Self::default(), |mut split, p| {
            if p.online {
                split.online_total += p.amount;
                split.online_transactions += p.transactions;
            } else {
                split.in_person_total += p.amount;
                split.in_person_transactions += p.transactions;
            }
            split
        })
    }

    pub fn total(&self) -> f64 {
        self.online_total + self.in_person_total
    }

    pub fn online_pct(&self) -> f64 {
        share(self.online_total, self.total())
    }

    pub fn in_person_pct(&self) -> f64 {
        share(self.in_person_total, self.total())
    }

    pub fn online_ticket(&self) -> f64 {
        if self.online_transactions == 0 {
            return 0.0;
        }
        self.online_total / self.online_transactions as f64
    }

    pub fn in_person_ticket(&self) -> f64 {
        if self.in_person_transactions == 0 {
            return 0.0;
        }
        self.in_person_total / self.in_person_transactions as f64
    }

    /// Payment preference insight, compared on the one-decimal share
    pub fn insight(&self) -> PaymentInsight {
        let online = (self.online_pct() * 10.0).round() / 10.0;
        if online > 70.0 {
            PaymentInsight::StrongOnline(online)
        } else if online > 40.0 {
            PaymentInsight::Balanced(online)
        } else {
            PaymentInsight::InPersonDominant(100.0 - online)
        }
    }
}

/// Customer payment preference, carrying the relevant share in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PaymentInsight {
    StrongOnline(f64),
    Balanced(f64),
    InPersonDominant(f64),
}

impl PaymentInsight {
    pub fn message(&self) -> String {
        match self {
            PaymentInsight::StrongOnline(pct) => format!(
                "Customers strongly prefer online payments ({}). Keep investing in digital \
                 checkout and consider perks for paying online.",
                format_percent(*pct)
            ),
            PaymentInsight::Balanced(pct) => format!(
                "Online ({}) and in-person payments are balanced. Keep both options \
                 well supported.",
                format_percent(*pct)
            ),
            PaymentInsight::InPersonDominant(pct) => format!(
                "In-person payments dominate ({}). Consider cashback or discounts to \
                 encourage online payment.",
                format_percent(*pct)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, online: bool, transactions: u64, amount: f64) -> PaymentMethod {
        PaymentMethod {
            method: name.into(),
            online,
            transactions,
            amount,
        }
    }

    fn segment(name: &str, customers: u64, ticket: f64) -> CustomerSegment {
        CustomerSegment {
            segment: name.into(),
            customers,
            average_ticket: ticket,
            ..CustomerSegment::default()
        }
    }

    #[test]
    fn test_shares_guard_empty_base() {
        let shares = CustomerShares::from_metrics(&CustomerMetrics::default());
        assert_eq!(shares.active_pct, 0.0);
        assert_eq!(shares.window_90d_pct, 0.0);

        let metrics = CustomerMetrics {
            total: 200,
            active: 50,
            inactive: 150,
            active_90d: 20,
            ..CustomerMetrics::default()
        };
        let shares = CustomerShares::from_metrics(&metrics);
        assert_eq!(shares.active_pct, 25.0);
        assert_eq!(shares.inactive_pct, 75.0);
        assert_eq!(shares.window_90d_pct, 10.0);
    }

    #[test]
    fn test_inactivity_breakdown() {
        let metrics = CustomerMetrics {
            bought_30d: 40,
            bought_90d: 65,
            inactive_90d: 12,
            ..CustomerMetrics::default()
        };
        let counts: Vec<_> = inactivity_breakdown(&metrics).iter().map(|b| b.customers).collect();
        assert_eq!(counts, vec![40, 25, 12]);
    }

    #[test]
    fn test_segment_summary() {
        let segments = vec![
            segment("VIP", 10, 100.0),
            segment("VIP", 5, 80.0),
            segment("Novo", 30, 40.0),
        ];
        let vip = segment_summary(&segments, "VIP");
        assert_eq!(vip.customers, 15);
        assert_eq!(vip.average_ticket, 90.0);
        assert_eq!(segment_summary(&segments, "Churn"), SegmentSummary::default());
    }

    #[test]
    fn test_payment_shares_and_split() {
        let methods = vec![
            method("Pix", true, 60, 3000.0),
            method("Card (app)", true, 20, 1500.0),
            method("Cash", false, 20, 500.0),
        ];
        let shares = payment_shares(&methods);
        assert_eq!(shares[0].share_pct, 60.0);

        let split = PaymentSplit::from_methods(&methods);
        assert_eq!(split.online_transactions, 80);
        assert_eq!(split.online_pct(), 90.0);
        assert_eq!(split.in_person_ticket(), 25.0);
        assert_eq!(split.insight(), PaymentInsight::StrongOnline(90.0));
    }

    #[test]
    fn test_insight_thresholds() {
        let balanced = PaymentSplit {
            online_total: 50.0,
            in_person_total: 50.0,
            ..PaymentSplit::default()
        };
        assert_eq!(balanced.insight(), PaymentInsight::Balanced(50.0));

        let in_person = PaymentSplit {
            online_total: 30.0,
            in_person_total: 70.0,
            ..PaymentSplit::default()
        };
        assert_eq!(in_person.insight(), PaymentInsight::InPersonDominant(70.0));
        assert!(in_person.insight().message().contains("70.0%"));

        assert_eq!(PaymentSplit::default().online_ticket(), 0.0);
    }

    #[test]
    fn test_top_customers_url_has_limit() {
        let client = ApiClient::local().unwrap();
        let urls = customer_urls(&client, &FilterState::for_period("30"));
        assert!(urls.top_customers.ends_with("top-customers?period=30&limit=10"));
        assert_eq!(top_customers_total(&[]), 0.0);
    }
}
