//! Bar series assembly from raw candle records

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Candle record as delivered by the candles API
///
/// Only `time` and `close` are required by the volatility pipeline; the other
/// OHLC fields are carried through when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    #[serde(default, deserialize_with = "deserialize_epoch_secs")]
    pub time: Option<i64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EpochSecs {
    Int(i64),
    Float(f64),
}

/// Epoch seconds as either an integer or a float; fractions are floored
fn deserialize_epoch_secs<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<EpochSecs>::deserialize(deserializer)? {
        Some(EpochSecs::Int(secs)) => Some(secs),
        Some(EpochSecs::Float(secs)) if secs.is_finite() => Some(secs.floor() as i64),
        _ => None,
    })
}

impl RawBar {
    pub fn new(time: i64, close: f64) -> Self {
        Self {
            time: Some(time),
            open: Some(close),
            high: Some(close),
            low: Some(close),
            close: Some(close),
        }
    }
}

/// One OHLC observation. Missing prices are carried as NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    fn from_raw(timestamp: i64, raw: &RawBar) -> Self {
        Self {
            timestamp,
            open: raw.open.unwrap_or(f64::NAN),
            high: raw.high.unwrap_or(f64::NAN),
            low: raw.low.unwrap_or(f64::NAN),
            close: raw.close.unwrap_or(f64::NAN),
        }
    }
}

/// Time-ordered bars for one (symbol, resolution) pair
///
/// Timestamps are strictly increasing. No resampling or gap filling is done,
/// so consecutive bars may be irregularly spaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series from records in arrival order
    ///
    /// Records are sorted by timestamp. When two records share a timestamp
    /// the one seen last wins. Records without a timestamp are dropped.
    pub fn from_raw<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RawBar>,
    {
        let mut by_time: BTreeMap<i64, Bar> = BTreeMap::new();
        let mut dropped = 0usize;

        for raw in records {
            match raw.time {
                Some(ts) => {
                    by_time.insert(ts, Bar::from_raw(ts, &raw));
                }
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            log::debug!("Dropped {} candle records without a timestamp", dropped);
        }

        Self {
            bars: by_time.into_values().collect(),
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<i64> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn first_timestamp(&self) -> Option<i64> {
        self.bars.first().map(|b| b.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.bars.last().map(|b| b.timestamp)
    }
}
