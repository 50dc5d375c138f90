//! Candles API Integration
//!
//! Fetches one day of OHLC candles per request.
//!
//! ## API Reference
//!
//! Endpoint: `{base}/candles?symbol={symbol}&date={YYYY-MM-DD}&resolution={1m|1s}`
//! Header: `X-API-Key: {key}`
//! Returns: `{"data": [{"time": 1765411200, "open": .., "high": .., "low": .., "close": ..}, ...]}`

use crate::volatility_core::{RawBar, Resolution};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum FetchError {
    Http(reqwest::Error),
    Status(u16),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(err)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(e) => write!(f, "HTTP error: {}", e),
            FetchError::Status(code) => write!(f, "Candles API error: status {}", code),
        }
    }
}

impl std::error::Error for FetchError {}

/// Supplier of raw candles for one symbol, day, and resolution
#[async_trait]
pub trait CandleSource: Send + Sync {
    async fn fetch_day(
        &self,
        symbol: &str,
        date: NaiveDate,
        resolution: &Resolution,
    ) -> Result<Vec<RawBar>, FetchError>;

    /// Get source type for logging
    fn source_type(&self) -> &'static str;
}

#[derive(Debug, Deserialize)]
struct CandlesResponse {
    #[serde(default)]
    data: Vec<RawBar>,
}

/// HTTP client for the candles API
pub struct CandleClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl CandleClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            url: candles_url(base_url),
            api_key: api_key.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Resolve the candles endpoint from a base URL
///
/// Trailing slashes are stripped; a base that already ends in `/candles` is
/// used as-is.
pub fn candles_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/candles") {
        base.to_string()
    } else {
        format!("{}/candles", base)
    }
}

/// Parse a candles API response body
pub fn parse_candles(body: &str) -> Result<Vec<RawBar>, serde_json::Error> {
    let response: CandlesResponse = serde_json::from_str(body)?;
    Ok(response.data)
}

#[async_trait]
impl CandleSource for CandleClient {
    async fn fetch_day(
        &self,
        symbol: &str,
        date: NaiveDate,
        resolution: &Resolution,
    ) -> Result<Vec<RawBar>, FetchError> {
        let date = date.format(crate::config::DATE_FORMAT).to_string();

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("symbol", symbol),
                ("date", date.as_str()),
                ("resolution", resolution.as_str()),
            ])
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body: CandlesResponse = response.json().await?;
        Ok(body.data)
    }

    fn source_type(&self) -> &'static str {
        "HTTP"
    }
}
