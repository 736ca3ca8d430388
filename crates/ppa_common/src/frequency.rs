//! Clock frequencies and their period equivalents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A clock frequency stored in Hertz.
///
/// Parses strings like `"62.5MHz"`, `"250KHz"`, `"1GHz"` and bare numbers
/// (Hertz). Converts to and from a clock period in nanoseconds, which is the
/// unit synthesis timing summaries are reported in.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Frequency(f64);

impl Frequency {
    /// Creates a new frequency from a value in Hertz.
    pub fn new(hz: f64) -> Self {
        Self(hz)
    }

    /// Creates a frequency from a value in megahertz.
    pub fn from_mhz(mhz: f64) -> Self {
        Self(mhz * 1_000_000.0)
    }

    /// Creates the frequency of a clock with the given period in nanoseconds.
    pub fn from_period_ns(period_ns: f64) -> Self {
        Self(1_000_000_000.0 / period_ns)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }

    /// Returns the frequency in megahertz.
    pub fn mhz(&self) -> f64 {
        self.0 / 1_000_000.0
    }

    /// Returns the clock period in nanoseconds.
    pub fn period_ns(&self) -> f64 {
        1_000_000_000.0 / self.0
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000_000.0 {
            write!(f, "{:.2}GHz", hz / 1_000_000_000.0)
        } else if hz >= 1_000_000.0 {
            write!(f, "{:.2}MHz", hz / 1_000_000.0)
        } else if hz >= 1_000.0 {
            write!(f, "{:.2}KHz", hz / 1_000.0)
        } else {
            write!(f, "{hz:.2}Hz")
        }
    }
}

/// Error returned when a frequency string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency: '{input}'")]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let (number, scale) = if let Some(num) = lower.strip_suffix("ghz") {
            (num, 1_000_000_000.0)
        } else if let Some(num) = lower.strip_suffix("mhz") {
            (num, 1_000_000.0)
        } else if let Some(num) = lower.strip_suffix("khz") {
            (num, 1_000.0)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let val: f64 = number.trim().parse().map_err(|_| err())?;
        if !val.is_finite() || val <= 0.0 {
            return Err(err());
        }
        Ok(Frequency(val * scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mhz_fraction() {
        let f: Frequency = "62.5MHz".parse().unwrap();
        assert_eq!(f.hz(), 62_500_000.0);
    }

    #[test]
    fn parse_bare_number_is_hz() {
        let f: Frequency = "100000000".parse().unwrap();
        assert_eq!(f.mhz(), 100.0);
    }

    #[test]
    fn parse_rejects_zero_and_garbage() {
        assert!("0MHz".parse::<Frequency>().is_err());
        assert!("fast".parse::<Frequency>().is_err());
        assert!("-5MHz".parse::<Frequency>().is_err());
    }

    #[test]
    fn period_conversion() {
        let f: Frequency = "62.5MHz".parse().unwrap();
        assert!((f.period_ns() - 16.0).abs() < 1e-12);
        let back = Frequency::from_period_ns(16.0);
        assert!((back.mhz() - 62.5).abs() < 1e-12);
    }

    #[test]
    fn display_picks_unit() {
        assert_eq!(Frequency::from_mhz(64.33).to_string(), "64.33MHz");
        assert_eq!(Frequency::new(1_500_000_000.0).to_string(), "1.50GHz");
        assert_eq!(Frequency::new(250.0).to_string(), "250.00Hz");
    }
}
