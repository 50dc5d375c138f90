//! Console rendering: grid tables per window and resolution

use crate::engine::{SymbolReport, WindowResult};
use crate::volatility_core::{BucketCount, Resolution, WindowOutcome};

const HEADERS: [&str; 3] = ["Bucket", "Pumps", "Dumps"];

/// Render bucket rows as a grid table
pub fn render_table(rows: &[BucketCount]) -> String {
    let cells: Vec<[String; 3]> = rows
        .iter()
        .map(|r| [r.bucket.clone(), r.pumps.to_string(), r.dumps.to_string()])
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let rule = |fill: char| -> String {
        let mut line = String::from("+");
        for w in &widths {
            line.extend(std::iter::repeat(fill).take(w + 2));
            line.push('+');
        }
        line
    };

    let mut out = Vec::with_capacity(cells.len() * 2 + 3);
    out.push(rule('-'));
    out.push(format!(
        "| {:<w0$} | {:<w1$} | {:<w2$} |",
        HEADERS[0],
        HEADERS[1],
        HEADERS[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2]
    ));
    out.push(rule('='));
    for row in &cells {
        out.push(format!(
            "| {:<w0$} | {:>w1$} | {:>w2$} |",
            row[0],
            row[1],
            row[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        ));
        out.push(rule('-'));
    }
    out.join("\n")
}

/// Render the console section for one result
pub fn render_result(title: &str, result: Option<&WindowResult>) -> String {
    let body = match result.map(|r| &r.outcome) {
        Some(WindowOutcome::Buckets(rows)) => render_table(rows),
        Some(WindowOutcome::NoEvents) => "No events found.".to_string(),
        Some(WindowOutcome::NoData) | None => "No data found.".to_string(),
    };
    format!("\n--- {} ---\n{}", title, body)
}

/// Render the full console report for one symbol
pub fn render_symbol(report: &SymbolReport, windows: &[u32], resolutions: &[Resolution]) -> String {
    let banner = "=".repeat(40);
    let mut out = format!("\n{}\nREPORT: {}\n{}", banner, report.symbol, banner);

    for &window in windows {
        for resolution in resolutions {
            let title = format!("{} Minute Window ({})", window, resolution);
            out.push_str(&render_result(&title, report.result(window, resolution)));
        }
    }
    out
}
