//! HTTP client for the analytics API
//!
//! One GET endpoint per metric category plus the POST `ai-query` endpoint.
//! The full request URL (base + path + encoded filters) doubles as the
//! cache key for fetch slots.

use crate::error::CoreError;
use crate::filters::QueryParams;
use crate::models::AiQueryResponse;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Default API origin used by the dashboard
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";

/// Analytics API endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Metrics,
    RevenueTimeline,
    TopProducts,
    TopItems,
    ChannelDistribution,
    StorePerformance,
    SalesByHour,
    CustomerMetrics,
    TopCustomers,
    CustomerSegmentation,
    PaymentMethods,
    DeliveryOverview,
    DeliveryRegions,
    DeliveryPlatforms,
    DeliveryTiming,
    OperationalMetrics,
    OperationalByHour,
    CancellationMetrics,
    CouponPerformance,
    AiQuery,
}

impl Endpoint {
    /// Every endpoint, in dashboard order
    pub const ALL: [Endpoint; 20] = [
        Endpoint::Metrics,
        Endpoint::RevenueTimeline,
        Endpoint::TopProducts,
        Endpoint::TopItems,
        Endpoint::ChannelDistribution,
        Endpoint::StorePerformance,
        Endpoint::SalesByHour,
        Endpoint::CustomerMetrics,
        Endpoint::TopCustomers,
        Endpoint::CustomerSegmentation,
        Endpoint::PaymentMethods,
        Endpoint::DeliveryOverview,
        Endpoint::DeliveryRegions,
        Endpoint::DeliveryPlatforms,
        Endpoint::DeliveryTiming,
        Endpoint::OperationalMetrics,
        Endpoint::OperationalByHour,
        Endpoint::CancellationMetrics,
        Endpoint::CouponPerformance,
        Endpoint::AiQuery,
    ];

    /// Path segment under the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Metrics => "metrics",
            Endpoint::RevenueTimeline => "revenue-timeline",
            Endpoint::TopProducts => "top-products",
            Endpoint::TopItems => "top-items",
            Endpoint::ChannelDistribution => "channel-distribution",
            Endpoint::StorePerformance => "store-performance",
            Endpoint::SalesByHour => "sales-by-hour",
            Endpoint::CustomerMetrics => "customer-metrics",
            Endpoint::TopCustomers => "top-customers",
            Endpoint::CustomerSegmentation => "customer-segmentation",
            Endpoint::PaymentMethods => "payment-methods",
            Endpoint::DeliveryOverview => "delivery-overview",
            Endpoint::DeliveryRegions => "delivery-regions",
            Endpoint::DeliveryPlatforms => "delivery-platforms",
            Endpoint::DeliveryTiming => "delivery-timing",
            Endpoint::OperationalMetrics => "operational-metrics",
            Endpoint::OperationalByHour => "operational-by-hour",
            Endpoint::CancellationMetrics => "cancellation-metrics",
            Endpoint::CouponPerformance => "coupon-performance",
            Endpoint::AiQuery => "ai-query",
        }
    }

    /// HTTP method used by the endpoint
    pub fn method(&self) -> &'static str {
        match self {
            Endpoint::AiQuery => "POST",
            _ => "GET",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Client for the analytics API
///
/// Cheap to clone (reqwest pools connections internally).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:3001/api`)
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        let trimmed = base_url.trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|_| CoreError::InvalidBaseUrl {
            url: base_url.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(CoreError::InvalidBaseUrl {
                url: base_url.to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("dineboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CoreError::InvalidConfig {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// Client for the default local API origin
    pub fn local() -> Result<Self, CoreError> {
        Self::new(DEFAULT_API_BASE_URL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Request URL for an endpoint with encoded query parameters
    ///
    /// No trailing `?` is produced when `params` is empty, so the same
    /// logical request always maps to the same cache key.
    pub fn url(&self, endpoint: Endpoint, params: &QueryParams) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(endpoint.path());
        }
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.iter() {
                pairs.append_pair(key, value);
            }
        }
        url.to_string()
    }

    /// GET a URL and return its JSON body
    pub async fn get_json(&self, url: &str) -> Result<Value, CoreError> {
        debug!(url, "GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| CoreError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| CoreError::Network {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            warn!(url, status = status.as_u16(), "API returned an error status");
            return Err(CoreError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        serde_json::from_str(&body).map_err(|e| CoreError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// GET an endpoint and decode it into a typed payload
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &QueryParams,
    ) -> Result<T, CoreError> {
        let url = self.url(endpoint, params);
        let value = self.get_json(&url).await?;
        decode(&url, value)
    }

    /// Ask a free-text question; the server answers with SQL and rows
    ///
    /// The SQL is only ever displayed. A rejected question (for example one
    /// containing a blocked keyword) comes back as `QueryRejected` with the
    /// server's fields untouched.
    pub async fn ai_query(&self, question: &str) -> Result<AiQueryResponse, CoreError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(CoreError::EmptyQuestion);
        }

        let url = self.url(Endpoint::AiQuery, &QueryParams::new());
        debug!(url, question, "POST");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "question": question }))
            .send()
            .await
            .map_err(|source| CoreError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| CoreError::Network {
            url: url.clone(),
            source,
        })?;

        let value: Option<Value> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let field = |key: &str| value.as_ref().and_then(|v| text_field(v, key));
            return Err(CoreError::QueryRejected {
                status: status.as_u16(),
                error: field("error").unwrap_or_else(|| "Failed to process question".to_string()),
                message: field("message"),
                blocked_keyword: field("blockedKeyword"),
            });
        }

        match value {
            Some(value @ Value::Object(_)) => decode(&url, value),
            _ => Err(CoreError::Decode {
                url,
                message: "AI query response is not a valid object".to_string(),
            }),
        }
    }
}

/// String (or scalar) field of a JSON object, read independently of the rest
fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other @ (Value::Number(_) | Value::Bool(_)) => Some(other.to_string()),
        _ => None,
    }
}

/// Decode a JSON value into a typed payload, tagging failures with the URL
pub fn decode<T: DeserializeOwned>(url: &str, value: Value) -> Result<T, CoreError> {
    serde_json::from_value(value).map_err(|e| CoreError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Best error text from a failed response body
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(text)) = map.get(key) {
                return text.clone();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}
