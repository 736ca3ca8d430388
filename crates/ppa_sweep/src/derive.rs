//! Derived timing and throughput metrics.
//!
//! Everything here is a pure function of the extracted slack, the cycle count
//! reported by the hardware generator, the point's sample count and the
//! configured target period. No report text is involved.

use serde::Serialize;

use crate::error::DeriveError;

/// Metrics computed from the extracted slack and the cycle count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    /// Shortest clock period the design meets, in ns.
    pub max_clock_ns: f64,
    /// The matching clock frequency, in MHz.
    pub max_freq_mhz: f64,
    /// Sustained throughput at that clock, in millions of samples per second.
    pub max_throughput_msps: f64,
}

/// Computes [`DerivedMetrics`] against a fixed target clock period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derivation {
    target_period_ns: f64,
}

impl Derivation {
    /// Creates a derivation for designs synthesized against `target_period_ns`.
    pub fn new(target_period_ns: f64) -> Self {
        Self { target_period_ns }
    }

    /// Returns the target clock period.
    pub fn target_period_ns(&self) -> f64 {
        self.target_period_ns
    }

    /// Derives the clock, frequency and throughput figures of one point.
    ///
    /// The clock period is the target minus the worst negative slack and must
    /// stay positive. The sample count is `frame_length * num_frames`.
    pub fn derive(
        &self,
        wns_ns: f64,
        cycle_count: i64,
        frame_length: i64,
        num_frames: i64,
    ) -> Result<DerivedMetrics, DeriveError> {
        let max_clock_ns = self.target_period_ns - wns_ns;
        // Also rejects NaN.
        if !(max_clock_ns > 0.0) {
            return Err(DeriveError::NegativeClockPeriod {
                target_period_ns: self.target_period_ns,
                wns_ns,
            });
        }
        if cycle_count <= 0 {
            return Err(DeriveError::InvalidCycleCount(cycle_count));
        }
        let sample_count = frame_length
            .checked_mul(num_frames)
            .filter(|&n| n > 0)
            .ok_or(DeriveError::InvalidSampleCount {
                frame_length,
                num_frames,
            })?;

        let per_sample_s = cycle_count as f64 * max_clock_ns * 1e-9 / sample_count as f64;
        Ok(DerivedMetrics {
            max_clock_ns,
            max_freq_mhz: 1000.0 / max_clock_ns,
            max_throughput_msps: 1.0 / (per_sample_s * 1e6),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn clock_and_frequency_from_slack() {
        let d = Derivation::new(16.0).derive(0.456, 20_000, 512, 32).unwrap();
        assert!(close(d.max_clock_ns, 15.544, 1e-9));
        assert!(close(d.max_freq_mhz, 64.33, 0.005));
    }

    #[test]
    fn throughput_from_cycles_and_samples() {
        let d = Derivation::new(16.0).derive(0.456, 20_000, 512, 32).unwrap();
        // 16384 samples in 20000 cycles of 15.544 ns.
        assert!(close(d.max_throughput_msps, 52.70, 0.005));
    }

    #[test]
    fn negative_slack_lengthens_period() {
        let d = Derivation::new(10.0).derive(-2.5, 100, 1, 1).unwrap();
        assert_eq!(d.max_clock_ns, 12.5);
        assert_eq!(d.max_freq_mhz, 80.0);
    }

    #[test]
    fn slack_at_or_beyond_target_fails() {
        let d = Derivation::new(16.0);
        for wns in [16.0, 16.5, f64::NAN] {
            assert!(matches!(
                d.derive(wns, 1, 1, 1),
                Err(DeriveError::NegativeClockPeriod { .. })
            ));
        }
        assert!(d.derive(15.999, 1, 1, 1).is_ok());
    }

    #[test]
    fn non_positive_cycles_fail() {
        let d = Derivation::new(16.0);
        assert_eq!(
            d.derive(0.0, 0, 1, 1),
            Err(DeriveError::InvalidCycleCount(0))
        );
        assert_eq!(
            d.derive(0.0, -5, 1, 1),
            Err(DeriveError::InvalidCycleCount(-5))
        );
    }

    #[test]
    fn bad_sample_count_fails() {
        let d = Derivation::new(16.0);
        assert!(matches!(
            d.derive(0.0, 1, 0, 8),
            Err(DeriveError::InvalidSampleCount { .. })
        ));
        assert!(matches!(
            d.derive(0.0, 1, i64::MAX, 2),
            Err(DeriveError::InvalidSampleCount { .. })
        ));
    }

    #[test]
    fn repeatable_bit_for_bit() {
        let d = Derivation::new(16.0);
        let a = d.derive(0.123, 4321, 1024, 64).unwrap();
        let b = d.derive(0.123, 4321, 1024, 64).unwrap();
        assert_eq!(a.max_throughput_msps.to_bits(), b.max_throughput_msps.to_bits());
        assert_eq!(a, b);
    }
}
