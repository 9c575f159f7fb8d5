//! Delivery metrics: lazily fetched tabs and time performance tiers
//!
//! Only the active tab of an expanded panel has a URL. Every other tab
//! yields `None`, so its slot never issues a request.

use crate::client::{ApiClient, Endpoint};
use crate::filters::FilterState;
use crate::models::DeliveryOverview;
use serde::Serialize;
use std::str::FromStr;

/// Under 30 minutes is good
pub const GOOD_DELIVERY_SECS: f64 = 1800.0;
/// Under 45 minutes is acceptable
pub const WARNING_DELIVERY_SECS: f64 = 2700.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryTab {
    #[default]
    Overview,
    Regions,
    Platforms,
    Timing,
}

impl DeliveryTab {
    pub const ALL: [DeliveryTab; 4] = [
        DeliveryTab::Overview,
        DeliveryTab::Regions,
        DeliveryTab::Platforms,
        DeliveryTab::Timing,
    ];

    pub fn endpoint(&self) -> Endpoint {
        match self {
            DeliveryTab::Overview => Endpoint::DeliveryOverview,
            DeliveryTab::Regions => Endpoint::DeliveryRegions,
            DeliveryTab::Platforms => Endpoint::DeliveryPlatforms,
            DeliveryTab::Timing => Endpoint::DeliveryTiming,
        }
    }

    /// Slot name used by the session for this tab
    pub fn slot_name(&self) -> &'static str {
        match self {
            DeliveryTab::Overview => "delivery-overview",
            DeliveryTab::Regions => "delivery-regions",
            DeliveryTab::Platforms => "delivery-platforms",
            DeliveryTab::Timing => "delivery-timing",
        }
    }
}

impl FromStr for DeliveryTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overview" => Ok(Self::Overview),
            "regions" => Ok(Self::Regions),
            "platforms" => Ok(Self::Platforms),
            "timing" => Ok(Self::Timing),
            other => Err(format!(
                "unknown delivery tab '{}' (overview, regions, platforms, timing)",
                other
            )),
        }
    }
}

/// URL for `tab`, or None unless it is the active tab of an expanded panel
pub fn delivery_tab_url(
    client: &ApiClient,
    filters: &FilterState,
    tab: DeliveryTab,
    active: DeliveryTab,
    minimized: bool,
) -> Option<String> {
    (tab == active && !minimized).then(|| client.url(tab.endpoint(), &filters.query_params()))
}

/// Traffic-light rating of a time or score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    Good,
    Warning,
    Critical,
}

impl PerformanceTier {
    /// Rating of an average delivery time in seconds
    pub fn from_delivery_secs(secs: f64) -> Self {
        if secs < GOOD_DELIVERY_SECS {
            PerformanceTier::Good
        } else if secs < WARNING_DELIVERY_SECS {
            PerformanceTier::Warning
        } else {
            PerformanceTier::Critical
        }
    }

    /// Rating of a 0-100 efficiency score
    pub fn from_efficiency(score: f64) -> Self {
        if score >= 80.0 {
            PerformanceTier::Good
        } else if score >= 60.0 {
            PerformanceTier::Warning
        } else {
            PerformanceTier::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceTier::Good => "good",
            PerformanceTier::Warning => "warning",
            PerformanceTier::Critical => "critical",
        }
    }
}

/// Status with its share of all deliveries, in percent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusShare {
    pub status: String,
    pub count: u64,
    pub share_pct: f64,
}

pub fn status_shares(overview: &DeliveryOverview) -> Vec<StatusShare> {
    let total: u64 = overview.status_distribution.iter().map(|s| s.count).sum();
    overview
        .status_distribution
        .iter()
        .map(|s| StatusShare {
            status: s.status.clone(),
            count: s.count,
            share_pct: if total == 0 {
                0.0
            } else {
                s.count as f64 * 100.0 / total as f64
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusCount;

    #[test]
    fn test_only_active_expanded_tab_has_url() {
        let client = ApiClient::local().unwrap();
        let filters = FilterState::for_period("7");

        let urls: Vec<_> = DeliveryTab::ALL
            .iter()
            .map(|&tab| delivery_tab_url(&client, &filters, tab, DeliveryTab::Regions, false))
            .collect();
        assert!(urls[0].is_none());
        assert_eq!(
            urls[1].as_deref(),
            Some("http://localhost:3001/api/delivery-regions?period=7")
        );
        assert!(urls[2].is_none() && urls[3].is_none());

        assert!(delivery_tab_url(&client, &filters, DeliveryTab::Regions, DeliveryTab::Regions, true).is_none());
    }

    #[test]
    fn test_delivery_time_tiers() {
        assert_eq!(PerformanceTier::from_delivery_secs(1799.0), PerformanceTier::Good);
        assert_eq!(PerformanceTier::from_delivery_secs(1800.0), PerformanceTier::Warning);
        assert_eq!(PerformanceTier::from_delivery_secs(2699.0), PerformanceTier::Warning);
        assert_eq!(PerformanceTier::from_delivery_secs(2700.0), PerformanceTier::Critical);
    }

    #[test]
    fn test_efficiency_tiers() {
        assert_eq!(PerformanceTier::from_efficiency(80.0), PerformanceTier::Good);
        assert_eq!(PerformanceTier::from_efficiency(65.0), PerformanceTier::Warning);
        assert_eq!(PerformanceTier::from_efficiency(10.0).label(), "critical");
    }

    #[test]
    fn test_status_shares() {
        let overview = DeliveryOverview {
            status_distribution: vec![
                StatusCount { status: "CONCLUDED".into(), count: 75 },
                StatusCount { status: "CANCELLED".into(), count: 25 },
            ],
            ..DeliveryOverview::default()
        };
        let shares = status_shares(&overview);
        assert_eq!(shares[0].share_pct, 75.0);
        assert_eq!(shares[1].share_pct, 25.0);
        assert!(status_shares(&DeliveryOverview::default()).is_empty());
    }
}
