//! Rolling percentage returns over bar-index windows

use super::bar::BarSeries;
use super::resolution::Resolution;

/// Percentage change per bar relative to the bar `window_bars` positions earlier
///
/// Aligned index-for-index with the source `BarSeries`. A position holds
/// `None` when it is inside the warm-up period, when the reference close is
/// zero or missing, or when the change is not finite.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    pub window_bars: usize,
    pub timestamps: Vec<i64>,
    pub values: Vec<Option<f64>>,
}

impl ReturnSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of positions holding a value
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }
}

/// Compute rolling returns for a window given in minutes
///
/// The window is converted to a bar offset with the resolution's
/// bars-per-minute factor; elapsed wall-clock time between bars is ignored.
pub fn compute_rolling_returns(
    series: &BarSeries,
    window_minutes: u32,
    resolution: &Resolution,
) -> ReturnSeries {
    let window_bars = resolution.window_bars(window_minutes);
    let bars = series.bars();

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i < window_bars {
                return None;
            }
            pct_change(bars[i - window_bars].close, bar.close)
        })
        .collect();

    ReturnSeries {
        window_bars,
        timestamps: series.timestamps(),
        values,
    }
}

fn pct_change(reference: f64, current: f64) -> Option<f64> {
    if reference == 0.0 || !reference.is_finite() {
        return None;
    }
    let change = (current - reference) / reference;
    change.is_finite().then_some(change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volatility_core::bar::RawBar;

    fn minute_series(closes: &[f64]) -> BarSeries {
        BarSeries::from_raw(
            closes
                .iter()
                .enumerate()
                .map(|(i, c)| RawBar::new(i as i64 * 60, *c)),
        )
    }

    #[test]
    fn test_five_minute_window() {
        let series = minute_series(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let returns = compute_rolling_returns(&series, 5, &Resolution::Minute);

        assert_eq!(returns.window_bars, 5);
        assert_eq!(returns.len(), 6);
        for i in 0..5 {
            assert_eq!(returns.get(i), None, "position {} should be undefined", i);
        }
        assert!((returns.get(5).unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let series = minute_series(&[10.0, 10.2, 9.9, 10.5, 10.1, 10.8, 11.0, 10.4]);
        let a = compute_rolling_returns(&series, 5, &Resolution::Minute);
        let b = compute_rolling_returns(&series, 5, &Resolution::Minute);
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_series_all_undefined() {
        let series = minute_series(&[100.0, 101.0, 102.0]);
        let returns = compute_rolling_returns(&series, 5, &Resolution::Minute);

        assert_eq!(returns.len(), 3);
        assert_eq!(returns.defined_count(), 0);
    }

    #[test]
    fn test_zero_reference_close_is_undefined() {
        let series = minute_series(&[0.0, 100.0, 100.0, 100.0, 100.0, 110.0, 105.0]);
        let returns = compute_rolling_returns(&series, 5, &Resolution::Minute);

        assert_eq!(returns.get(5), None);
        assert_eq!(returns.get(6), Some(0.05));
    }

    #[test]
    fn test_missing_close_is_undefined() {
        let mut raw: Vec<RawBar> = (0..7).map(|i| RawBar::new(i * 60, 100.0)).collect();
        raw[6].close = None;
        raw[0].close = None;
        let series = BarSeries::from_raw(raw);
        let returns = compute_rolling_returns(&series, 5, &Resolution::Minute);

        assert_eq!(returns.get(5), None);
        assert_eq!(returns.get(6), None);
    }

    #[test]
    fn test_second_resolution_spans_same_real_time() {
        // 1s bars: price steps up by 1.0 each minute
        let raw: Vec<RawBar> = (0..=600)
            .map(|s| RawBar::new(s, 100.0 + (s / 60) as f64))
            .collect();
        let per_second = BarSeries::from_raw(raw);

        let minute = minute_series(&(0..=10).map(|m| 100.0 + m as f64).collect::<Vec<_>>());

        let sec_returns = compute_rolling_returns(&per_second, 5, &Resolution::Second);
        let min_returns = compute_rolling_returns(&minute, 5, &Resolution::Minute);

        assert_eq!(sec_returns.window_bars, 300);
        assert_eq!(min_returns.window_bars, 5);

        // t = 600s is minute 10 in both series; both reference t = 300s
        let sec_at_600 = sec_returns.get(600).unwrap();
        let min_at_10 = min_returns.get(10).unwrap();
        assert!((sec_at_600 - min_at_10).abs() < 1e-12);
        assert_eq!(per_second.timestamps()[600 - 300], 300);
        assert_eq!(minute.timestamps()[10 - 5], 300);
    }

    #[test]
    fn test_empty_series() {
        let returns = compute_rolling_returns(&BarSeries::default(), 10, &Resolution::Second);
        assert!(returns.is_empty());
        assert_eq!(returns.window_bars, 600);
    }
}
