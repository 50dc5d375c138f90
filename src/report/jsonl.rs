//! JSONL writer for window results - one JSON object per (symbol, resolution, window)

use super::ReportError;
use crate::engine::WindowResult;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct JsonlResultWriter {
    writer: BufWriter<std::fs::File>,
    written: usize,
}

impl JsonlResultWriter {
    /// Open (truncating) the output file
    pub fn create(path: &Path) -> Result<Self, ReportError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        log::info!("📝 Writing window results to: {}", path.display());
        Ok(Self {
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write_result(&mut self, result: &WindowResult) -> Result<(), ReportError> {
        let json = serde_json::to_string(result)?;
        writeln!(self.writer, "{}", json)?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> Result<(), ReportError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlResultWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
