//! Operational efficiency: shifts, recommendations and cancellations
//!
//! Hourly load is grouped into four shifts. A shift's efficiency is the
//! mean of its hours' scores, where an hour at or under the ideal
//! preparation time scores 100 and every percent of overshoot costs one
//! point (floored at 0). Hours without a recorded time count as ideal.

use crate::client::{ApiClient, Endpoint};
use crate::filters::FilterState;
use crate::models::{CancellationMetrics, HourlyLoad};
use serde::Serialize;
use std::str::FromStr;

/// Ideal preparation time (20 minutes)
pub const IDEAL_PREP_SECS: f64 = 1200.0;
/// Shifts slower than 30 minutes get a preparation-time recommendation
pub const SLOW_PREP_SECS: f64 = 1800.0;
/// Shifts scoring below this get a staffing recommendation
pub const LOW_EFFICIENCY: f64 = 50.0;
/// Reasons listed in the cancellation breakdown
pub const TOP_REASONS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationalTab {
    #[default]
    Overview,
    Shifts,
    Cancellations,
}

impl FromStr for OperationalTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overview" => Ok(Self::Overview),
            "shifts" => Ok(Self::Shifts),
            "cancellations" => Ok(Self::Cancellations),
            other => Err(format!(
                "unknown operational tab '{}' (overview, shifts, cancellations)",
                other
            )),
        }
    }
}

/// The three requests behind the operational panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationalUrls {
    pub metrics: String,
    pub by_hour: String,
    pub cancellations: String,
}

pub fn operational_urls(client: &ApiClient, filters: &FilterState) -> OperationalUrls {
    let params = filters.query_params();
    OperationalUrls {
        metrics: client.url(Endpoint::OperationalMetrics, &params),
        by_hour: client.url(Endpoint::OperationalByHour, &params),
        cancellations: client.url(Endpoint::CancellationMetrics, &params),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Afternoon,
    Night,
    Overnight,
}

impl Shift {
    pub const ALL: [Shift; 4] = [Shift::Morning, Shift::Afternoon, Shift::Night, Shift::Overnight];

    /// Half-open hour range `[start, end)`
    pub fn hours(&self) -> (u64, u64) {
        match self {
            Shift::Morning => (6, 12),
            Shift::Afternoon => (12, 18),
            Shift::Night => (18, 24),
            Shift::Overnight => (0, 6),
        }
    }

    pub fn contains(&self, hour: u64) -> bool {
        let (start, end) = self.hours();
        (start..end).contains(&hour)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Shift::Morning => "Morning (6h-12h)",
            Shift::Afternoon => "Afternoon (12h-18h)",
            Shift::Night => "Night (18h-24h)",
            Shift::Overnight => "Overnight (0h-6h)",
        }
    }
}

/// Efficiency score of one hour (0-100)
pub fn hour_efficiency(avg_prep_secs: f64) -> f64 {
    let actual = if avg_prep_secs > 0.0 {
        avg_prep_secs
    } else {
        IDEAL_PREP_SECS
    };
    if actual <= IDEAL_PREP_SECS {
        100.0
    } else {
        (100.0 - (actual - IDEAL_PREP_SECS) / IDEAL_PREP_SECS * 100.0).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftSummary {
    pub shift: Shift,
    pub label: &'static str,
    pub avg_prep_secs: f64,
    pub total_orders: u64,
    /// 0 for a shift without data
    pub efficiency: f64,
}

impl ShiftSummary {
    /// Suggested actions; empty when the shift performs as expected
    pub fn recommendations(&self) -> Vec<Recommendation> {
        let mut out = Vec::new();
        if self.avg_prep_secs > SLOW_PREP_SECS {
            out.push(Recommendation::OptimizePrepTime);
        }
        if self.efficiency < LOW_EFFICIENCY {
            out.push(Recommendation::ReviewStaffing);
        }
        if self.total_orders == 0 {
            out.push(Recommendation::RunPromotions);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    OptimizePrepTime,
    ReviewStaffing,
    RunPromotions,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::OptimizePrepTime => "Optimize preparation time",
            Recommendation::ReviewStaffing => "Review staff allocation",
            Recommendation::RunPromotions => "Run promotions for this time slot",
        }
    }
}

/// Aggregate hourly load into the four shifts, in display order
pub fn shift_summaries(hourly: &[HourlyLoad]) -> Vec<ShiftSummary> {
    Shift::ALL
        .iter()
        .map(|&shift| {
            let hours: Vec<_> = hourly.iter().filter(|h| shift.contains(h.hour)).collect();
            let prep_sum: f64 = hours.iter().map(|h| h.avg_production_secs).sum();
            let efficiency = if hours.is_empty() {
                0.0
            } else {
                hours
                    .iter()
                    .map(|h| hour_efficiency(h.avg_production_secs))
                    .sum::<f64>()
                    / hours.len() as f64
            };
            ShiftSummary {
                shift,
                label: shift.label(),
                avg_prep_secs: prep_sum / hours.len().max(1) as f64,
                total_orders: hours.iter().map(|h| h.orders).sum(),
                efficiency,
            }
        })
        .collect()
}

/// First reasons as listed by the API, missing reasons labelled
pub fn top_cancellation_reasons(metrics: &CancellationMetrics) -> Vec<(String, u64)> {
    metrics
        .by_reason
        .iter()
        .take(TOP_REASONS)
        .map(|r| {
            let reason = r
                .reason
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or("No reason given");
            (reason.to_string(), r.count)
        })
        .collect()
}
