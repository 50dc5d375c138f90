//! HTML report with inline SVG bar charts

use crate::engine::{SymbolReport, WindowResult};
use crate::volatility_core::{BucketCount, Resolution, WindowOutcome};

const CHART_WIDTH: f64 = 480.0;
const CHART_HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 44.0;
const MARGIN_RIGHT: f64 = 12.0;
const MARGIN_TOP: f64 = 28.0;
const MARGIN_BOTTOM: f64 = 84.0;
const PUMP_COLOR: &str = "green";
const DUMP_COLOR: &str = "red";

const STYLE: &str = "\
body { font-family: sans-serif; padding: 20px; }
.chart-container { display: flex; flex-wrap: wrap; gap: 20px; }
.chart-container > div { flex: 1; min-width: 400px; }
svg { max-width: 100%; border: 1px solid #ddd; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }";

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Grouped bar chart of pumps (green) and dumps (red) per bucket
pub fn render_chart(rows: &[BucketCount], title: &str) -> String {
    let plot_w = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let max = rows
        .iter()
        .map(|r| r.pumps.max(r.dumps))
        .max()
        .unwrap_or(0)
        .max(1) as f64;
    let slot = plot_w / rows.len().max(1) as f64;
    let bar_w = slot * 0.35;
    let baseline = MARGIN_TOP + plot_h;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT
    ));
    svg.push_str(&format!(
        r#"<text x="{}" y="18" font-size="12" text-anchor="middle">{}</text>"#,
        CHART_WIDTH / 2.0,
        escape_html(title)
    ));

    // y axis ticks at 0, max/2, max
    for frac in [0.0, 0.5, 1.0] {
        let y = baseline - plot_h * frac;
        svg.push_str(&format!(
            r##"<line x1="{x1}" y1="{y:.1}" x2="{x2}" y2="{y:.1}" stroke="#ddd"/><text x="{tx}" y="{ty:.1}" font-size="9" text-anchor="end">{v}</text>"##,
            x1 = MARGIN_LEFT,
            x2 = MARGIN_LEFT + plot_w,
            tx = MARGIN_LEFT - 4.0,
            ty = y + 3.0,
            v = (max * frac).round()
        ));
    }

    for (i, row) in rows.iter().enumerate() {
        let center = MARGIN_LEFT + slot * (i as f64 + 0.5);
        for (count, offset, color) in [
            (row.pumps, -bar_w, PUMP_COLOR),
            (row.dumps, 0.0, DUMP_COLOR),
        ] {
            let h = plot_h * count as f64 / max;
            svg.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {}</title></rect>"#,
                center + offset,
                baseline - h,
                bar_w,
                h,
                color,
                escape_html(&row.bucket),
                count
            ));
        }
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" font-size="8" text-anchor="end" transform="rotate(-45 {x:.1} {y:.1})">{label}</text>"#,
            x = center,
            y = baseline + 12.0,
            label = escape_html(&row.bucket)
        ));
    }

    svg.push_str(&format!(
        r#"<line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}" stroke="black"/>"#,
        x1 = MARGIN_LEFT,
        x2 = MARGIN_LEFT + plot_w,
        y = baseline
    ));
    let legend_x = MARGIN_LEFT + plot_w - 70.0;
    svg.push_str(&format!(
        r#"<rect x="{lx}" y="30" width="8" height="8" fill="{pc}"/><text x="{tx}" y="38" font-size="9">Pumps</text><rect x="{lx}" y="44" width="8" height="8" fill="{dc}"/><text x="{tx}" y="52" font-size="9">Dumps</text>"#,
        lx = legend_x,
        tx = legend_x + 12.0,
        pc = PUMP_COLOR,
        dc = DUMP_COLOR
    ));
    svg.push_str("</svg>");
    svg
}

fn render_cell(symbol: &str, window: u32, resolution: &Resolution, result: Option<&WindowResult>) -> String {
    let heading = format!("<h4>{} Resolution</h4>", escape_html(resolution.as_str()));
    match result.map(|r| &r.outcome) {
        Some(WindowOutcome::Buckets(rows)) => {
            let title = format!("{} - {} Minute Window ({} Res)", symbol, window, resolution);
            format!("<div>{}{}</div>", heading, render_chart(rows, &title))
        }
        _ => format!("<div>{}<p>No events found.</p></div>", heading),
    }
}

/// Render the full HTML document
///
/// Symbols without data at any resolution are left out.
pub fn render_document(reports: &[SymbolReport], windows: &[u32], resolutions: &[Resolution]) -> String {
    let mut sections = String::new();

    for report in reports.iter().filter(|r| r.has_data()) {
        let symbol = escape_html(&report.symbol);
        sections.push_str(&format!("<h2>{}</h2>", symbol));
        for &window in windows {
            sections.push_str(&format!(
                "<h3>{} Minute Window</h3><div class='chart-container'>",
                window
            ));
            for resolution in resolutions {
                sections.push_str(&render_cell(
                    &report.symbol,
                    window,
                    resolution,
                    report.result(window, resolution),
                ));
            }
            sections.push_str("</div><hr>");
        }
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Volatility Report</title>\n<style>\n{}\n</style>\n</head>\n<body>\n<h1>Volatility Analysis Report</h1>\n{}\n</body>\n</html>\n",
        STYLE, sections
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<BucketCount> {
        crate::volatility_core::BucketTable::default()
            .labels()
            .iter()
            .enumerate()
            .map(|(i, l)| BucketCount { bucket: l.to_string(), pumps: i, dumps: 8 - i })
            .collect()
    }

    fn result(symbol: &str, resolution: Resolution, outcome: WindowOutcome) -> WindowResult {
        WindowResult {
            symbol: symbol.to_string(),
            resolution,
            window_minutes: 5,
            bar_count: 0,
            event_count: outcome.event_count(),
            outcome,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_chart_has_two_bars_per_bucket() {
        let svg = render_chart(&rows(), "BTCUSDT - 5 Minute Window (1m Res)");

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        // 16 data bars + 2 legend swatches
        assert_eq!(svg.matches("<rect").count(), 18);
        assert!(svg.contains("&gt;2.0%"));
    }

    #[test]
    fn test_chart_axis_ticks() {
        let svg = render_chart(&rows(), "axis");

        // max bar is 8 dumps; ticks at 0, 4, 8 with the baseline at y=236
        assert!(svg.contains(r#"y1="236.0""#));
        assert!(svg.contains(r#"y1="132.0""#));
        assert!(svg.contains(r#"y1="28.0""#));
        for tick in [">0</text>", ">4</text>", ">8</text>"] {
            assert!(svg.contains(tick), "missing tick {}", tick);
        }
        assert_eq!(svg.matches("<text").count(), 1 + 3 + 8 + 2);
    }

    #[test]
    fn test_document_skips_symbols_without_data() {
        let reports = vec![
            SymbolReport {
                symbol: "BTCUSDT".to_string(),
                results: vec![
                    result("BTCUSDT", Resolution::Minute, WindowOutcome::Buckets(rows())),
                    result("BTCUSDT", Resolution::Second, WindowOutcome::NoEvents),
                ],
            },
            SymbolReport {
                symbol: "ETHUSDT".to_string(),
                results: vec![result("ETHUSDT", Resolution::Minute, WindowOutcome::NoData)],
            },
        ];

        let html = render_document(&reports, &[5], &Resolution::all());

        assert!(html.contains("<h2>BTCUSDT</h2>"));
        assert!(!html.contains("<h2>ETHUSDT</h2>"));
        assert!(html.contains("<h3>5 Minute Window</h3>"));
        assert_eq!(html.matches("<svg").count(), 1);
        assert_eq!(html.matches("No events found.").count(), 1);
    }
}
