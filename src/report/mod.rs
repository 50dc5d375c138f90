//! Report rendering: console tables, HTML document, JSONL results

pub mod console;
pub mod html;
pub mod jsonl;

pub use jsonl::JsonlResultWriter;

use std::fmt;
use std::path::Path;

#[derive(Debug)]
pub enum ReportError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Io(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Serialization(err)
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Io(e) => write!(f, "IO error: {}", e),
            ReportError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for ReportError {}

/// Write an HTML document to disk
pub fn write_html(path: &Path, document: &str) -> Result<(), ReportError> {
    std::fs::write(path, document)?;
    log::info!("📄 Report saved to {}", path.display());
    Ok(())
}
