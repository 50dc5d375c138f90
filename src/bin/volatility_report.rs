//! Volatility Report Binary - Pump/Dump Bucketing Across Windows and Resolutions
//!
//! Fetches candles for every configured symbol and resolution, buckets rolling
//! 5/10/15-minute moves of at least 0.5%, prints grid tables, and writes an
//! HTML report with bar charts.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin volatility_report -- [--html report.html] [--jsonl results.jsonl]
//! ```
//!
//! ## Environment Variables
//!
//! - ORDERFLOW_API_URL - Candles API base URL (required; CANDLES_API_URL also accepted)
//! - ORDERFLOW_API_KEY - Candles API key, sent as X-API-Key (required; CANDLES_API_KEY also accepted)
//! - REPORT_SYMBOLS - Comma-separated symbols (default: BTCUSDT,ETHUSDT)
//! - REPORT_START_DATE / REPORT_END_DATE - Inclusive date range (default: 2025-12-11 / 2025-12-13)
//! - REPORT_RESOLUTIONS - Comma-separated resolutions (default: 1m,1s)
//! - REPORT_WINDOWS - Comma-separated windows in minutes (default: 5,10,15)
//! - EVENT_THRESHOLD - Minimum absolute return for an event (default: 0.005)
//! - REPORT_HTML_PATH - HTML output path (default: volatility_report.html)
//! - REPORT_JSONL_PATH - Optional JSONL output path
//! - FETCH_CHANNEL_BUFFER - Batch channel capacity (default: 64)
//! - RUST_LOG - Logging level (optional, default: info)

use std::env;
use std::path::Path;
use std::sync::Arc;
use volflow::acquisition::{date_range, CandleClient};
use volflow::report::{console, html, write_html, JsonlResultWriter};
use volflow::{ReportConfig, ReportEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    if !Path::new(".env").exists() {
        log::warn!("⚠️  .env file not found. Ensure ORDERFLOW_API_URL and ORDERFLOW_API_KEY are set.");
    }
    dotenv::dotenv().ok();

    let mut config = ReportConfig::from_env()?;
    let args: Vec<String> = env::args().collect();
    config.apply_args(&args);

    log::info!("🚀 Starting Volatility Report");
    log::info!("   Symbols: {:?}", config.analysis.symbols);
    log::info!("   Dates: {} → {}", config.start_date, config.end_date);
    log::info!(
        "   Resolutions: {:?}",
        config.resolutions.iter().map(|r| r.as_str()).collect::<Vec<_>>()
    );
    log::info!("   Windows: {:?} minutes", config.analysis.window_minutes);
    log::info!("   Threshold: {}", config.analysis.threshold);

    let client = CandleClient::new(&config.api_url, &config.api_key)?;
    log::info!("🔌 Candles endpoint: {}", client.url());

    let dates = date_range(config.start_date, config.end_date);
    let engine = ReportEngine::new(config.analysis.clone(), config.resolutions.clone())?;
    let reports = engine
        .run(Arc::new(client), dates, config.channel_buffer)
        .await;

    for report in reports.iter().filter(|r| r.has_data()) {
        println!(
            "{}",
            console::render_symbol(report, &config.analysis.window_minutes, &config.resolutions)
        );
    }

    if let Some(path) = &config.jsonl_path {
        let mut writer = JsonlResultWriter::create(path)?;
        for result in reports.iter().flat_map(|r| r.results.iter()) {
            writer.write_result(result)?;
        }
        writer.flush()?;
        log::info!("✅ Wrote {} window results", writer.written());
    }

    let document = html::render_document(&reports, &config.analysis.window_minutes, &config.resolutions);
    write_html(&config.html_path, &document)?;

    let with_data = reports.iter().filter(|r| r.has_data()).count();
    log::info!(
        "✅ Report complete: {} of {} symbols had data",
        with_data,
        reports.len()
    );

    Ok(())
}
