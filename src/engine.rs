//! Report Engine - Orchestration of acquisition, analysis, and result ordering
//!
//! ## Architecture
//!
//! ```text
//! spawn_fetchers (one task per symbol × resolution)
//!     ↓ BarBatch over mpsc
//! ReportEngine::analyze_batch (BarSeries → analyze_window per window)
//!     ↓
//! Vec<SymbolReport> (symbol order, then window order, then resolution order)
//! ```
//!
//! Batches arrive in whatever order the fetch tasks finish. Results are
//! re-ordered afterwards, so the report is identical whether fetches run
//! concurrently or one at a time.

use crate::acquisition::{spawn_fetchers, BarBatch, CandleSource};
use crate::volatility_core::{
    analyze_window, AnalysisConfig, AnalysisConfigError, BarSeries, Resolution, WindowOutcome,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Analysis result for one (symbol, resolution, window)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowResult {
    pub symbol: String,
    pub resolution: Resolution,
    pub window_minutes: u32,
    pub bar_count: usize,
    pub event_count: usize,
    pub outcome: WindowOutcome,
}

/// All window results for one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolReport {
    pub symbol: String,
    pub results: Vec<WindowResult>,
}

impl SymbolReport {
    /// True when at least one resolution returned bars
    pub fn has_data(&self) -> bool {
        self.results
            .iter()
            .any(|r| r.outcome != WindowOutcome::NoData)
    }

    pub fn result(&self, window_minutes: u32, resolution: &Resolution) -> Option<&WindowResult> {
        self.results
            .iter()
            .find(|r| r.window_minutes == window_minutes && &r.resolution == resolution)
    }
}

pub struct ReportEngine {
    config: AnalysisConfig,
    resolutions: Vec<Resolution>,
}

impl ReportEngine {
    /// Rejects configs whose threshold is not covered by the bucket table
    pub fn new(
        config: AnalysisConfig,
        resolutions: Vec<Resolution>,
    ) -> Result<Self, AnalysisConfigError> {
        config.validate()?;
        Ok(Self { config, resolutions })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    /// Run the volatility core over one batch, once per configured window
    pub fn analyze_batch(&self, batch: BarBatch) -> Vec<WindowResult> {
        let series = BarSeries::from_raw(batch.bars);

        self.config
            .window_minutes
            .iter()
            .map(|&window_minutes| {
                let outcome = analyze_window(&series, &batch.resolution, window_minutes, &self.config);
                WindowResult {
                    symbol: batch.symbol.clone(),
                    resolution: batch.resolution.clone(),
                    window_minutes,
                    bar_count: series.len(),
                    event_count: outcome.event_count(),
                    outcome,
                }
            })
            .collect()
    }

    /// Group results per configured symbol in a fixed order
    pub fn assemble(&self, mut results: Vec<WindowResult>) -> Vec<SymbolReport> {
        results.sort_by_key(|r| {
            (
                position(&self.config.symbols, &r.symbol),
                position(&self.config.window_minutes, &r.window_minutes),
                position(&self.resolutions, &r.resolution),
            )
        });

        self.config
            .symbols
            .iter()
            .map(|symbol| SymbolReport {
                symbol: symbol.clone(),
                results: results
                    .iter()
                    .filter(|r| &r.symbol == symbol)
                    .cloned()
                    .collect(),
            })
            .collect()
    }

    /// Fetch every (symbol, resolution) concurrently and analyze batches as
    /// they arrive
    pub async fn run(
        &self,
        source: Arc<dyn CandleSource>,
        dates: Vec<NaiveDate>,
        channel_buffer: usize,
    ) -> Vec<SymbolReport> {
        log::info!(
            "📡 Fetching {} symbols × {} resolutions over {} days from {} source",
            self.config.symbols.len(),
            self.resolutions.len(),
            dates.len(),
            source.source_type()
        );

        let (tx, mut rx) = mpsc::channel::<BarBatch>(channel_buffer.max(1));
        let handles = spawn_fetchers(source, &self.config.symbols, &self.resolutions, dates, tx);

        let mut results = Vec::new();
        while let Some(batch) = rx.recv().await {
            log::info!(
                "📊 Analyzing {} ({}): {} raw bars",
                batch.symbol,
                batch.resolution,
                batch.bars.len()
            );
            results.extend(self.analyze_batch(batch));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                log::error!("Fetch task failed: {}", e);
            }
        }

        self.assemble(results)
    }
}

fn position<T: PartialEq>(items: &[T], item: &T) -> usize {
    items.iter().position(|i| i == item).unwrap_or(items.len())
}
