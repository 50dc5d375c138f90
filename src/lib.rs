
pub mod acquisition;
pub mod config;
pub mod engine;
pub mod report;
pub mod volatility_core;

pub use config::{ConfigError, ReportConfig};
pub use engine::{ReportEngine, SymbolReport, WindowResult};
