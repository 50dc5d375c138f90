//! Candle acquisition
//!
//! One task per (symbol, resolution) fetches every day of the report range
//! and sends the completed batch over an mpsc channel. Fetch failures are
//! logged and count as zero bars for that day, so downstream analysis only
//! ever sees data completeness, never transport errors.

pub mod candles;
pub mod dates;

pub use candles::{candles_url, parse_candles, CandleClient, CandleSource, FetchError};
pub use dates::date_range;

use crate::volatility_core::{RawBar, Resolution};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// All raw bars fetched for one (symbol, resolution) over the date range
#[derive(Debug, Clone)]
pub struct BarBatch {
    pub symbol: String,
    pub resolution: Resolution,
    pub bars: Vec<RawBar>,
    pub failed_days: usize,
}

/// Fetch every day sequentially and concatenate the results
pub async fn fetch_batch(
    source: &dyn CandleSource,
    symbol: &str,
    resolution: &Resolution,
    dates: &[NaiveDate],
) -> BarBatch {
    log::info!("📥 Fetching {} at {} resolution...", symbol, resolution);

    let mut bars = Vec::new();
    let mut failed_days = 0;

    for date in dates {
        log::debug!("   Fetching {} {} {}", symbol, resolution, date);
        match source.fetch_day(symbol, *date, resolution).await {
            Ok(day) => bars.extend(day),
            Err(e) => {
                log::error!(
                    "❌ Error fetching {} on {} (res: {}): {}",
                    symbol,
                    date,
                    resolution,
                    e
                );
                failed_days += 1;
            }
        }
    }

    if bars.is_empty() {
        log::warn!("No data found for {} ({})", symbol, resolution);
    }

    BarBatch {
        symbol: symbol.to_string(),
        resolution: resolution.clone(),
        bars,
        failed_days,
    }
}

/// Spawn one fetch task per (symbol, resolution)
///
/// The channel closes once every task has sent its batch and dropped its
/// sender.
pub fn spawn_fetchers(
    source: Arc<dyn CandleSource>,
    symbols: &[String],
    resolutions: &[Resolution],
    dates: Vec<NaiveDate>,
    tx: mpsc::Sender<BarBatch>,
) -> Vec<JoinHandle<()>> {
    let dates = Arc::new(dates);
    let mut handles = Vec::with_capacity(symbols.len() * resolutions.len());

    for symbol in symbols {
        for resolution in resolutions {
            let source = source.clone();
            let dates = dates.clone();
            let tx = tx.clone();
            let symbol = symbol.clone();
            let resolution = resolution.clone();

            handles.push(tokio::spawn(async move {
                let batch = fetch_batch(source.as_ref(), &symbol, &resolution, &dates).await;
                if let Err(e) = tx.send(batch).await {
                    log::warn!("Failed to send {} ({}) batch: {}", symbol, resolution, e);
                }
            }));
        }
    }

    handles
}
