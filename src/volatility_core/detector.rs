//! Event detection with a configurable materiality threshold

use super::returns::ReturnSeries;
use serde::Serialize;

/// Default materiality threshold (0.5%)
pub const DEFAULT_THRESHOLD: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    #[serde(rename = "PUMP")]
    Pump,
    #[serde(rename = "DUMP")]
    Dump,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Pump => "PUMP",
            Direction::Dump => "DUMP",
        }
    }
}

/// A rolling return whose magnitude met the threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Event {
    pub timestamp: i64,
    pub value: f64,
}

impl Event {
    pub fn magnitude(&self) -> f64 {
        self.value.abs()
    }

    /// `None` for a zero return, which only qualifies under a zero threshold
    pub fn direction(&self) -> Option<Direction> {
        if self.value > 0.0 {
            Some(Direction::Pump)
        } else if self.value < 0.0 {
            Some(Direction::Dump)
        } else {
            None
        }
    }
}

pub struct EventExtractor {
    threshold: f64,
}

impl EventExtractor {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Collect every defined position with `|return| >= threshold`
    ///
    /// Order follows the return series. Undefined positions are skipped.
    pub fn extract(&self, returns: &ReturnSeries) -> Vec<Event> {
        returns
            .values
            .iter()
            .zip(returns.timestamps.iter())
            .filter_map(|(value, ts)| {
                let value = (*value)?;
                (value.abs() >= self.threshold).then_some(Event {
                    timestamp: *ts,
                    value,
                })
            })
            .collect()
    }
}
