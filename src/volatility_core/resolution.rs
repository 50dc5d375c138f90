//! Bar resolutions and their bars-per-minute factors

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// One bar per minute ("1m")
    Minute,
    /// One bar per second ("1s")
    Second,
    /// Any other label the API accepts; treated as one bar per minute
    Other(String),
}

impl Resolution {
    pub fn as_str(&self) -> &str {
        match self {
            Resolution::Minute => "1m",
            Resolution::Second => "1s",
            Resolution::Other(label) => label.as_str(),
        }
    }

    /// Parse an API resolution label. Never fails: unknown labels become
    /// `Other` and fall back to a factor of 1.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "1m" => Resolution::Minute,
            "1s" => Resolution::Second,
            other => {
                log::warn!(
                    "Unrecognized resolution '{}', assuming one bar per minute",
                    other
                );
                Resolution::Other(other.to_string())
            }
        }
    }

    /// Number of bars covering one minute of real time
    pub fn bars_per_minute(&self) -> usize {
        match self {
            Resolution::Minute => 1,
            Resolution::Second => 60,
            Resolution::Other(_) => 1,
        }
    }

    /// Convert a window length in minutes into a bar offset
    pub fn window_bars(&self, window_minutes: u32) -> usize {
        window_minutes as usize * self.bars_per_minute()
    }

    pub fn all() -> [Resolution; 2] {
        [Resolution::Minute, Resolution::Second]
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_resolutions() {
        assert_eq!(Resolution::parse("1m"), Resolution::Minute);
        assert_eq!(Resolution::parse("1s"), Resolution::Second);
        assert_eq!(Resolution::Minute.bars_per_minute(), 1);
        assert_eq!(Resolution::Second.bars_per_minute(), 60);
    }

    #[test]
    fn test_unknown_resolution_defaults_to_factor_one() {
        let res = Resolution::parse("5m");
        assert_eq!(res, Resolution::Other("5m".to_string()));
        assert_eq!(res.bars_per_minute(), 1);
        assert_eq!(res.as_str(), "5m");
    }

    #[test]
    fn test_window_bars_scaling() {
        assert_eq!(Resolution::Minute.window_bars(5), 5);
        assert_eq!(Resolution::Second.window_bars(5), 300);
        assert_eq!(Resolution::Second.window_bars(15), 900);
    }
}
