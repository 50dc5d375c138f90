use crate::volatility_core::{
    AnalysisConfig, AnalysisConfigError, BucketTable, Resolution, DEFAULT_THRESHOLD,
    DEFAULT_WINDOWS,
};
use chrono::NaiveDate;
use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
    Analysis(AnalysisConfigError),
}

impl From<AnalysisConfigError> for ConfigError {
    fn from(err: AnalysisConfigError) -> Self {
        ConfigError::Analysis(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set in .env file", key),
            ConfigError::Invalid { key, value } => write!(f, "Invalid value for {}: '{}'", key, value),
            ConfigError::Analysis(e) => write!(f, "Invalid analysis configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for a report run, loaded from environment variables
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub api_url: String,
    pub api_key: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub resolutions: Vec<Resolution>,
    pub analysis: AnalysisConfig,
    pub html_path: PathBuf,
    pub jsonl_path: Option<PathBuf>,
    pub channel_buffer: usize,
}

impl ReportConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `ORDERFLOW_API_URL` (required, `CANDLES_API_URL` also accepted)
    /// - `ORDERFLOW_API_KEY` (required, `CANDLES_API_KEY` also accepted)
    /// - `REPORT_SYMBOLS` (default: BTCUSDT,ETHUSDT)
    /// - `REPORT_START_DATE` / `REPORT_END_DATE` (default: 2025-12-11 / 2025-12-13)
    /// - `REPORT_RESOLUTIONS` (default: 1m,1s)
    /// - `REPORT_WINDOWS` (default: 5,10,15)
    /// - `EVENT_THRESHOLD` (default: 0.005)
    /// - `REPORT_HTML_PATH` (default: volatility_report.html)
    /// - `REPORT_JSONL_PATH` (optional)
    /// - `FETCH_CHANNEL_BUFFER` (default: 64)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = credential(&lookup, "ORDERFLOW_API_URL", "CANDLES_API_URL")?;
        let api_key = credential(&lookup, "ORDERFLOW_API_KEY", "CANDLES_API_KEY")?;

        let symbols = lookup("REPORT_SYMBOLS")
            .map(|s| dedup_preserving_order(split_list(&s)))
            .unwrap_or_else(|| AnalysisConfig::default().symbols);

        let start_date = parse_date("REPORT_START_DATE", lookup("REPORT_START_DATE"), "2025-12-11")?;
        let end_date = parse_date("REPORT_END_DATE", lookup("REPORT_END_DATE"), "2025-12-13")?;

        let resolutions = lookup("REPORT_RESOLUTIONS")
            .map(|s| {
                dedup_preserving_order(split_list(&s).iter().map(|r| Resolution::parse(r)).collect())
            })
            .unwrap_or_else(|| Resolution::all().to_vec());

        let window_minutes = match lookup("REPORT_WINDOWS") {
            Some(raw) => dedup_preserving_order(
                split_list(&raw)
                    .iter()
                    .map(|w| {
                        w.parse::<u32>().map_err(|_| ConfigError::Invalid {
                            key: "REPORT_WINDOWS",
                            value: raw.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => DEFAULT_WINDOWS.to_vec(),
        };

        let threshold = match lookup("EVENT_THRESHOLD") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "EVENT_THRESHOLD",
                value: raw.clone(),
            })?,
            None => DEFAULT_THRESHOLD,
        };

        let channel_buffer = lookup("FETCH_CHANNEL_BUFFER")
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(64);

        let analysis = AnalysisConfig {
            symbols,
            window_minutes,
            threshold,
            buckets: BucketTable::default(),
        };
        analysis.validate()?;

        Ok(Self {
            api_url,
            api_key,
            start_date,
            end_date,
            resolutions,
            analysis,
            html_path: lookup("REPORT_HTML_PATH")
                .unwrap_or_else(|| "volatility_report.html".to_string())
                .into(),
            jsonl_path: lookup("REPORT_JSONL_PATH").map(PathBuf::from),
            channel_buffer,
        })
    }

    /// Apply `--html <path>` and `--jsonl <path>` overrides
    pub fn apply_args(&mut self, args: &[String]) {
        if let Some(path) = flag_value(args, "--html") {
            self.html_path = path.into();
        }
        if let Some(path) = flag_value(args, "--jsonl") {
            self.jsonl_path = Some(path.into());
        }
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).cloned()
}

/// Primary key first, then the legacy name; errors name the primary key
fn credential<F>(lookup: &F, key: &'static str, legacy: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| lookup(legacy).filter(|s| !s.trim().is_empty()))
        .ok_or(ConfigError::Missing(key))
}

/// Keep the first occurrence of each item
fn dedup_preserving_order<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_date(
    key: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<NaiveDate, ConfigError> {
    let raw = value.unwrap_or_else(|| default.to_string());
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ConfigError::Invalid { key, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ReportConfig::from_lookup(lookup_from(&[
            ("ORDERFLOW_API_URL", "https://api.example.com"),
            ("ORDERFLOW_API_KEY", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.analysis.symbols, vec!["BTCUSDT", "ETHUSDT"]);
        assert_eq!(config.analysis.window_minutes, vec![5, 10, 15]);
        assert_eq!(config.analysis.threshold, 0.005);
        assert_eq!(config.resolutions, vec![Resolution::Minute, Resolution::Second]);
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2025, 12, 11).unwrap());
        assert_eq!(config.end_date, NaiveDate::from_ymd_opt(2025, 12, 13).unwrap());
        assert_eq!(config.html_path, PathBuf::from("volatility_report.html"));
        assert_eq!(config.jsonl_path, None);
        assert_eq!(config.channel_buffer, 64);
    }

    #[test]
    fn test_custom_config() {
        let config = ReportConfig::from_lookup(lookup_from(&[
            ("ORDERFLOW_API_URL", "https://api.example.com"),
            ("ORDERFLOW_API_KEY", "secret"),
            ("REPORT_SYMBOLS", "SOLUSDT, ,XRPUSDT"),
            ("REPORT_START_DATE", "2026-01-01"),
            ("REPORT_END_DATE", "2026-01-02"),
            ("REPORT_RESOLUTIONS", "1s"),
            ("REPORT_WINDOWS", "5,30"),
            ("EVENT_THRESHOLD", "0.01"),
            ("REPORT_JSONL_PATH", "/tmp/results.jsonl"),
            ("FETCH_CHANNEL_BUFFER", "8"),
        ]))
        .unwrap();

        assert_eq!(config.analysis.symbols, vec!["SOLUSDT", "XRPUSDT"]);
        assert_eq!(config.analysis.window_minutes, vec![5, 30]);
        assert_eq!(config.analysis.threshold, 0.01);
        assert_eq!(config.resolutions, vec![Resolution::Second]);
        assert_eq!(config.jsonl_path, Some(PathBuf::from("/tmp/results.jsonl")));
        assert_eq!(config.channel_buffer, 8);
    }

    #[test]
    fn test_missing_credentials() {
        let result = ReportConfig::from_lookup(lookup_from(&[("ORDERFLOW_API_KEY", "secret")]));
        assert!(matches!(result, Err(ConfigError::Missing("ORDERFLOW_API_URL"))));

        let result = ReportConfig::from_lookup(lookup_from(&[
            ("ORDERFLOW_API_URL", "https://api.example.com"),
            ("ORDERFLOW_API_KEY", "  "),
        ]));
        assert!(matches!(result, Err(ConfigError::Missing("ORDERFLOW_API_KEY"))));
    }

    #[test]
    fn test_legacy_credential_names() {
        let config = ReportConfig::from_lookup(lookup_from(&[
            ("CANDLES_API_URL", "https://legacy.example.com"),
            ("CANDLES_API_KEY", "old-secret"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://legacy.example.com");
        assert_eq!(config.api_key, "old-secret");

        let config = ReportConfig::from_lookup(lookup_from(&[
            ("ORDERFLOW_API_URL", "https://api.example.com"),
            ("ORDERFLOW_API_KEY", "secret"),
            ("CANDLES_API_URL", "https://legacy.example.com"),
            ("CANDLES_API_KEY", "old-secret"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.api_key, "secret");
    }

    #[test]
    fn test_duplicate_list_entries_collapse() {
        let config = ReportConfig::from_lookup(lookup_from(&[
            ("ORDERFLOW_API_URL", "https://api.example.com"),
            ("ORDERFLOW_API_KEY", "secret"),
            ("REPORT_SYMBOLS", "ETHUSDT,BTCUSDT,ETHUSDT"),
            ("REPORT_RESOLUTIONS", "1s,1m,1s,1m"),
            ("REPORT_WINDOWS", "10,5,10"),
        ]))
        .unwrap();

        assert_eq!(config.analysis.symbols, vec!["ETHUSDT", "BTCUSDT"]);
        assert_eq!(config.resolutions, vec![Resolution::Second, Resolution::Minute]);
        assert_eq!(config.analysis.window_minutes, vec![10, 5]);
    }

    #[test]
    fn test_invalid_values() {
        let base = [
            ("ORDERFLOW_API_URL", "https://api.example.com"),
            ("ORDERFLOW_API_KEY", "secret"),
        ];

        let mut pairs = base.to_vec();
        pairs.push(("REPORT_START_DATE", "12/11/2025"));
        assert!(matches!(
            ReportConfig::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Invalid { key: "REPORT_START_DATE", .. })
        ));

        let mut pairs = base.to_vec();
        pairs.push(("REPORT_WINDOWS", "5,ten"));
        assert!(matches!(
            ReportConfig::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Invalid { key: "REPORT_WINDOWS", .. })
        ));

        let mut pairs = base.to_vec();
        pairs.push(("EVENT_THRESHOLD", "0.001"));
        assert!(matches!(
            ReportConfig::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Analysis(AnalysisConfigError::ThresholdBelowBuckets { .. }))
        ));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = ReportConfig::from_lookup(lookup_from(&[
            ("ORDERFLOW_API_URL", "https://api.example.com"),
            ("ORDERFLOW_API_KEY", "secret"),
        ]))
        .unwrap();

        let args: Vec<String> = ["volatility_report", "--jsonl", "out.jsonl", "--html", "r.html"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        config.apply_args(&args);

        assert_eq!(config.html_path, PathBuf::from("r.html"));
        assert_eq!(config.jsonl_path, Some(PathBuf::from("out.jsonl")));
    }
}
