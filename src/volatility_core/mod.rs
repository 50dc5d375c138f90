//! Volatility Core - Event Detection and Bucketing
//!
//! Turns a raw candle batch for one (symbol, resolution) into pump/dump
//! counts per magnitude bucket for each look-back window.
//!
//! # Architecture
//!
//! ```text
//! Vec<RawBar> → BarSeries::from_raw (sorted, de-duplicated)
//!     ↓
//! compute_rolling_returns (window_minutes × bars_per_minute)
//!     ↓
//! EventExtractor (|return| >= threshold)
//!     ↓
//! BucketAggregator (half-open magnitude buckets, pump/dump)
//!     ↓
//! WindowOutcome (NoData | NoEvents | Buckets)
//! ```
//!
//! Every stage is a synchronous, pure transformation. Nothing here performs
//! I/O or keeps state between runs.

pub mod aggregator;
pub mod analysis;
pub mod bar;
pub mod bucket;
pub mod detector;
pub mod resolution;
pub mod returns;

pub use aggregator::{BucketAggregator, BucketCount};
pub use analysis::{analyze_window, AnalysisConfig, AnalysisConfigError, WindowOutcome, DEFAULT_WINDOWS};
pub use bar::{Bar, BarSeries, RawBar};
pub use bucket::{Bucket, BucketTable, BucketTableError};
pub use detector::{Direction, Event, EventExtractor, DEFAULT_THRESHOLD};
pub use resolution::Resolution;
pub use returns::{compute_rolling_returns, ReturnSeries};
