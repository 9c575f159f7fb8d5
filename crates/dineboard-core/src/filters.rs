//! Dashboard filter state and query-parameter building
//!
//! Filters are owned by whoever drives the dashboard and flow down into
//! every request. Sentinel values ("todos"/"todas", meaning "all") and
//! empty strings are never sent; an absent parameter means "no filter".

use serde::{Deserialize, Serialize};

/// Values that mean "no filter applied"
const SENTINELS: &[&str] = &["todos", "todas"];

/// Period used in filenames when none is selected
pub const DEFAULT_PERIOD_LABEL: &str = "30d";

/// Check whether a filter value should be suppressed from requests
///
/// # Examples
///
/// ```
/// use dineboard_core::filters::is_sentinel;
///
/// assert!(is_sentinel("todos"));
/// assert!(is_sentinel("todas"));
/// assert!(is_sentinel(""));
/// assert!(!is_sentinel("iFood"));
/// ```
pub fn is_sentinel(value: &str) -> bool {
    value.trim().is_empty() || SENTINELS.contains(&value)
}

/// Filter selection shared by every panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Look-back window in days ("7", "30", "90", ...)
    pub period: Option<String>,
    /// Custom range start (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Custom range end (YYYY-MM-DD)
    pub end_date: Option<String>,
    /// Sales channel name
    pub channel: Option<String>,
    /// Channel type ("P" in-person, "D" delivery)
    pub channel_type: Option<String>,
    /// Store name
    pub store: Option<String>,
    /// Sub-brand name
    pub sub_brand: Option<String>,
}

impl FilterState {
    /// Filters for a look-back period in days
    pub fn for_period(period: impl Into<String>) -> Self {
        Self {
            period: Some(period.into()),
            ..Self::default()
        }
    }

    /// Active value of a field, or None when unset or a sentinel
    fn active(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !is_sentinel(v))
    }

    /// True when both ends of a custom range are present
    pub fn has_date_range(&self) -> bool {
        Self::active(&self.start_date).is_some() && Self::active(&self.end_date).is_some()
    }

    /// Every set, non-sentinel filter, in wire order
    pub fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("period", Self::active(&self.period));
        params.push_opt("startDate", Self::active(&self.start_date));
        params.push_opt("endDate", Self::active(&self.end_date));
        self.push_dimensions(&mut params);
        params
    }

    /// Parameters for the metrics endpoint
    ///
    /// A complete custom range replaces `period`; `period` is sent only
    /// while the range is incomplete.
    pub fn metrics_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if self.has_date_range() {
            params.push_opt("startDate", Self::active(&self.start_date));
            params.push_opt("endDate", Self::active(&self.end_date));
        } else {
            params.push_opt("period", Self::active(&self.period));
        }
        self.push_dimensions(&mut params);
        params
    }

    fn push_dimensions(&self, params: &mut QueryParams) {
        params.push_opt("channel", Self::active(&self.channel));
        params.push_opt("channelType", Self::active(&self.channel_type));
        params.push_opt("store", Self::active(&self.store));
        params.push_opt("subBrand", Self::active(&self.sub_brand));
    }

    /// Period label for filenames (`30d` when unset)
    pub fn period_label(&self) -> &str {
        Self::active(&self.period).unwrap_or(DEFAULT_PERIOD_LABEL)
    }

    /// Human-readable description of the active dimension filters
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(channel) = Self::active(&self.channel) {
            out.push(("Channel", channel.to_string()));
        }
        if let Some(store) = Self::active(&self.store) {
            out.push(("Store", store.to_string()));
        }
        if let Some(kind) = Self::active(&self.channel_type) {
            let label = match kind {
                "P" => "In-person".to_string(),
                "D" => "Delivery".to_string(),
                other => other.to_string(),
            };
            out.push(("Type", label));
        }
        if let Some(sub_brand) = Self::active(&self.sub_brand) {
            out.push(("Sub-brand", sub_brand.to_string()));
        }
        out
    }
}

/// Ordered query parameters for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    fn push_opt(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Append a `limit` parameter
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.push("limit", limit.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(period: &str, channel: &str) -> FilterState {
        FilterState {
            period: Some(period.into()),
            channel: Some(channel.into()),
            ..FilterState::default()
        }
    }

    #[test]
    fn test_sentinel_channel_is_omitted() {
        let params = filters("30", "todos").metrics_params();
        assert_eq!(params.get("period"), Some("30"));
        assert!(!params.contains("channel"));
    }

    #[test]
    fn test_feminine_sentinel_is_omitted() {
        let state = FilterState {
            store: Some("todas".into()),
            sub_brand: Some("todas".into()),
            ..FilterState::for_period("7")
        };
        let params = state.query_params();
        assert!(!params.contains("store"));
        assert!(!params.contains("subBrand"));
    }

    #[test]
    fn test_real_values_are_sent_in_wire_order() {
        let state = FilterState {
            period: Some("90".into()),
            channel: Some("iFood".into()),
            channel_type: Some("D".into()),
            store: Some("Centro".into()),
            sub_brand: Some("Burgers".into()),
            ..FilterState::default()
        };
        let keys: Vec<_> = state.query_params().iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["period", "channel", "channelType", "store", "subBrand"]);
    }

    #[test]
    fn test_metrics_range_replaces_period() {
        let state = FilterState {
            period: Some("30".into()),
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-01-31".into()),
            ..FilterState::default()
        };
        let params = state.metrics_params();
        assert!(!params.contains("period"));
        assert_eq!(params.get("startDate"), Some("2024-01-01"));
        assert_eq!(params.get("endDate"), Some("2024-01-31"));
    }

    #[test]
    fn test_metrics_incomplete_range_keeps_period() {
        let state = FilterState {
            period: Some("30".into()),
            start_date: Some("2024-01-01".into()),
            ..FilterState::default()
        };
        let params = state.metrics_params();
        assert_eq!(params.get("period"), Some("30"));
        assert!(!params.contains("startDate"));
    }

    #[test]
    fn test_empty_filters_produce_no_params() {
        assert!(FilterState::default().query_params().is_empty());
        assert_eq!(FilterState::default().period_label(), "30d");
    }

    #[test]
    fn test_with_limit_appends() {
        let params = FilterState::for_period("7").query_params().with_limit(30);
        assert_eq!(params.get("limit"), Some("30"));
    }

    #[test]
    fn test_describe_channel_type() {
        let state = FilterState {
            channel_type: Some("P".into()),
            channel: Some("todos".into()),
            ..FilterState::default()
        };
        assert_eq!(state.describe(), vec![("Type", "In-person".to_string())]);
    }
}
