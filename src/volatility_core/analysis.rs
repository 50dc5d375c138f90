//! Per-window analysis: returns → events → bucket counts

use super::aggregator::{BucketAggregator, BucketCount};
use super::bar::BarSeries;
use super::bucket::BucketTable;
use super::detector::{EventExtractor, DEFAULT_THRESHOLD};
use super::resolution::Resolution;
use super::returns::compute_rolling_returns;
use serde::Serialize;
use std::fmt;

/// Default look-back windows in minutes
pub const DEFAULT_WINDOWS: [u32; 3] = [5, 10, 15];

/// Explicit analysis parameters, passed into every run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub symbols: Vec<String>,
    pub window_minutes: Vec<u32>,
    pub threshold: f64,
    pub buckets: BucketTable,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()],
            window_minutes: DEFAULT_WINDOWS.to_vec(),
            threshold: DEFAULT_THRESHOLD,
            buckets: BucketTable::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisConfigError {
    NoWindows,
    ZeroWindow,
    InvalidThreshold(f64),
    ThresholdBelowBuckets { threshold: f64, lower_bound: f64 },
}

impl fmt::Display for AnalysisConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisConfigError::NoWindows => write!(f, "At least one window is required"),
            AnalysisConfigError::ZeroWindow => write!(f, "Window length must be at least 1 minute"),
            AnalysisConfigError::InvalidThreshold(t) => {
                write!(f, "Threshold must be a positive finite number, got {}", t)
            }
            AnalysisConfigError::ThresholdBelowBuckets { threshold, lower_bound } => write!(
                f,
                "Threshold {} is below the first bucket edge {}; some events would be unbucketed",
                threshold, lower_bound
            ),
        }
    }
}

impl std::error::Error for AnalysisConfigError {}

impl AnalysisConfig {
    /// Check that every event the threshold admits has a bucket
    pub fn validate(&self) -> Result<(), AnalysisConfigError> {
        if self.window_minutes.is_empty() {
            return Err(AnalysisConfigError::NoWindows);
        }
        if self.window_minutes.contains(&0) {
            return Err(AnalysisConfigError::ZeroWindow);
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(AnalysisConfigError::InvalidThreshold(self.threshold));
        }
        if self.threshold < self.buckets.lower_bound() {
            return Err(AnalysisConfigError::ThresholdBelowBuckets {
                threshold: self.threshold,
                lower_bound: self.buckets.lower_bound(),
            });
        }
        Ok(())
    }
}

/// Result of one (symbol, resolution, window) run
///
/// `NoData` and `NoEvents` are distinct so callers can render them
/// differently. `Buckets` always carries one row per bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "buckets", rename_all = "snake_case")]
pub enum WindowOutcome {
    NoData,
    NoEvents,
    Buckets(Vec<BucketCount>),
}

impl WindowOutcome {
    pub fn buckets(&self) -> Option<&[BucketCount]> {
        match self {
            WindowOutcome::Buckets(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn event_count(&self) -> usize {
        self.buckets()
            .map(|rows| rows.iter().map(|r| r.total()).sum())
            .unwrap_or(0)
    }
}

pub fn analyze_window(
    series: &BarSeries,
    resolution: &Resolution,
    window_minutes: u32,
    config: &AnalysisConfig,
) -> WindowOutcome {
    if series.is_empty() {
        return WindowOutcome::NoData;
    }

    let returns = compute_rolling_returns(series, window_minutes, resolution);
    let events = EventExtractor::new(config.threshold).extract(&returns);

    log::debug!(
        "{}m window @ {}: {} bars, {} defined returns, {} events",
        window_minutes,
        resolution,
        series.len(),
        returns.defined_count(),
        events.len()
    );

    if events.is_empty() {
        return WindowOutcome::NoEvents;
    }

    WindowOutcome::Buckets(BucketAggregator::new(&config.buckets).aggregate(&events))
}
