//! Report bundle: the nine datasets behind one export
//!
//! All requests are issued together and joined. Metrics, revenue timeline,
//! top products, channels, stores and hourly sales are required: the first
//! failure among them (checked in that order) aborts the export. Top items,
//! payment methods and coupons are optional: a failure becomes an empty
//! section plus a warning in the `FetchReport`.

use crate::client::{ApiClient, Endpoint};
use crate::error::{CoreError, FetchIssue, FetchReport};
use crate::filters::FilterState;
use crate::models::{
    ChannelShare, CouponPerformance, HourlySales, Metrics, PaymentMethod, RevenuePoint,
    StorePerformance, TopItem, TopProduct,
};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Products requested for the report
pub const PRODUCT_LIMIT: usize = 30;
/// Add-on items requested for the report
pub const ITEM_LIMIT: usize = 20;
/// Endpoints fetched per export
pub const BUNDLE_ENDPOINTS: usize = 9;

/// Everything needed to render one export file
#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub metrics: Metrics,
    pub revenue: Vec<RevenuePoint>,
    pub products: Vec<TopProduct>,
    pub channels: Vec<ChannelShare>,
    pub stores: Vec<StorePerformance>,
    pub hourly: Vec<HourlySales>,
    pub top_items: Vec<TopItem>,
    pub payment_methods: Vec<PaymentMethod>,
    pub coupons: Vec<CouponPerformance>,
    pub filters: FilterState,
    pub generated_at: DateTime<Utc>,
}

impl ReportBundle {
    /// Bundle with every section empty
    pub fn empty(filters: FilterState, generated_at: DateTime<Utc>) -> Self {
        Self {
            metrics: Metrics::default(),
            revenue: Vec::new(),
            products: Vec::new(),
            channels: Vec::new(),
            stores: Vec::new(),
            hourly: Vec::new(),
            top_items: Vec::new(),
            payment_methods: Vec::new(),
            coupons: Vec::new(),
            filters,
            generated_at,
        }
    }

    /// Revenue summed over the listed products
    pub fn product_revenue_total(&self) -> f64 {
        self.products.iter().map(|p| p.revenue).sum()
    }

    /// Product revenue as a percent of all listed products (0 when none)
    pub fn product_share(&self, product: &TopProduct) -> f64 {
        let total = self.product_revenue_total();
        if total <= 0.0 {
            0.0
        } else {
            product.revenue * 100.0 / total
        }
    }

    /// Sum of the server-computed channel percentages
    pub fn channel_percent_total(&self) -> f64 {
        self.channels.iter().map(|c| c.percent).sum()
    }

    pub fn channel_orders_total(&self) -> u64 {
        self.channels.iter().map(|c| c.orders).sum()
    }

    /// Channel orders as a percent of all channel orders (0 when none)
    pub fn channel_order_share(&self, channel: &ChannelShare) -> f64 {
        let total = self.channel_orders_total();
        if total == 0 {
            0.0
        } else {
            channel.orders as f64 * 100.0 / total as f64
        }
    }

    /// `30 days`, or `2024-01-01 to 2024-01-31` for a custom range
    pub fn period_text(&self) -> String {
        match (&self.filters.start_date, &self.filters.end_date) {
            (Some(start), Some(end)) if self.filters.has_date_range() => {
                format!("{} to {}", start, end)
            }
            _ => {
                let label = self.filters.period_label();
                if label.chars().all(|c| c.is_ascii_digit()) {
                    format!("{} days", label)
                } else {
                    label.to_string()
                }
            }
        }
    }
}

fn required<T>(endpoint: Endpoint, result: Result<T, CoreError>) -> Result<T, CoreError> {
    result.map_err(|source| CoreError::RequiredEndpoint {
        endpoint: endpoint.path(),
        source: Box::new(source),
    })
}

fn optional<T>(
    endpoint: Endpoint,
    result: Result<Vec<T>, CoreError>,
    report: &mut FetchReport,
) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            warn!(endpoint = %endpoint, error = %e, "optional report section unavailable");
            report.add_issue(FetchIssue::from_core_error(endpoint.path(), &e));
            Vec::new()
        }
    }
}

/// Fetch all nine datasets concurrently and join them into a bundle
pub async fn fetch_bundle(
    client: &ApiClient,
    filters: &FilterState,
    report: &mut FetchReport,
    generated_at: DateTime<Utc>,
) -> Result<ReportBundle, CoreError> {
    let params = filters.query_params();
    let product_params = params.clone().with_limit(PRODUCT_LIMIT);
    let item_params = params.clone().with_limit(ITEM_LIMIT);

    debug!(endpoints = BUNDLE_ENDPOINTS, "fetching report bundle");
    report.endpoints_requested += BUNDLE_ENDPOINTS;

    let (metrics, revenue, products, channels, stores, hourly, items, payments, coupons) = tokio::join!(
        client.get::<Metrics>(Endpoint::Metrics, &params),
        client.get::<Vec<RevenuePoint>>(Endpoint::RevenueTimeline, &params),
        client.get::<Vec<TopProduct>>(Endpoint::TopProducts, &product_params),
        client.get::<Vec<ChannelShare>>(Endpoint::ChannelDistribution, &params),
        client.get::<Vec<StorePerformance>>(Endpoint::StorePerformance, &params),
        client.get::<Vec<HourlySales>>(Endpoint::SalesByHour, &params),
        client.get::<Vec<TopItem>>(Endpoint::TopItems, &item_params),
        client.get::<Vec<PaymentMethod>>(Endpoint::PaymentMethods, &params),
        client.get::<Vec<CouponPerformance>>(Endpoint::CouponPerformance, &params),
    );

    let metrics = required(Endpoint::Metrics, metrics)?;
    let revenue = required(Endpoint::RevenueTimeline, revenue)?;
    let mut products = required(Endpoint::TopProducts, products)?;
    let channels = required(Endpoint::ChannelDistribution, channels)?;
    let stores = required(Endpoint::StorePerformance, stores)?;
    let hourly = required(Endpoint::SalesByHour, hourly)?;

    let top_items = optional(Endpoint::TopItems, items, report);
    let payment_methods = optional(Endpoint::PaymentMethods, payments, report);
    let coupons = optional(Endpoint::CouponPerformance, coupons, report);

    products.truncate(PRODUCT_LIMIT);

    Ok(ReportBundle {
        metrics,
        revenue,
        products,
        channels,
        stores,
        hourly,
        top_items,
        payment_methods,
        coupons,
        filters: filters.clone(),
        generated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> ReportBundle {
        ReportBundle::empty(FilterState::for_period("7"), Utc::now())
    }

    #[test]
    fn test_product_share() {
        let mut b = bundle();
        b.products = vec![
            TopProduct {
                revenue: 300.0,
                ..TopProduct::default()
            },
            TopProduct {
                revenue: 100.0,
                ..TopProduct::default()
            },
        ];
        assert_eq!(b.product_revenue_total(), 400.0);
        assert_eq!(b.product_share(&b.products[0]), 75.0);
        assert_eq!(bundle().product_share(&TopProduct::default()), 0.0);
    }

    #[test]
    fn test_channel_order_share() {
        let mut b = bundle();
        b.channels = vec![
            ChannelShare {
                orders: 30,
                percent: 30.0,
                ..ChannelShare::default()
            },
            ChannelShare {
                orders: 70,
                percent: 70.0,
                ..ChannelShare::default()
            },
        ];
        assert_eq!(b.channel_order_share(&b.channels[1]), 70.0);
        assert_eq!(b.channel_percent_total(), 100.0);
    }

    #[test]
    fn test_period_text() {
        assert_eq!(bundle().period_text(), "7 days");

        let mut b = bundle();
        b.filters.start_date = Some("2024-01-01".into());
        b.filters.end_date = Some("2024-01-31".into());
        assert_eq!(b.period_text(), "2024-01-01 to 2024-01-31");

        let b = ReportBundle::empty(FilterState::default(), Utc::now());
        assert_eq!(b.period_text(), "30d");
    }
}
