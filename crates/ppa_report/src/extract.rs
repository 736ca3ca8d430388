//! The exact-cardinality extraction contract.
//!
//! A [`PatternSpec`] names a metric and declares how many fields one
//! occurrence yields. Extraction succeeds only when the scanner finds exactly
//! one occurrence: zero means the report lacks the metric and several mean
//! the pattern is ambiguous. Both fail with [`ReportError::Malformed`] and
//! neither falls back to a default or to the first hit.

use std::str::FromStr;
use std::sync::Arc;

use crate::error::ReportError;
use crate::scanner::{FieldScanner, RegexScanner};

/// A named metric pattern with a declared arity.
#[derive(Debug, Clone)]
pub struct PatternSpec {
    metric: String,
    scanner: Arc<dyn FieldScanner>,
}

impl PatternSpec {
    /// Wraps an arbitrary scanner.
    pub fn new(metric: impl Into<String>, scanner: impl FieldScanner + 'static) -> Self {
        Self {
            metric: metric.into(),
            scanner: Arc::new(scanner),
        }
    }

    /// Compiles a regex pattern and checks it has exactly `arity` capture groups.
    pub fn regex(
        metric: impl Into<String>,
        pattern: &str,
        arity: usize,
    ) -> Result<Self, ReportError> {
        let metric = metric.into();
        let scanner = RegexScanner::new(pattern).map_err(|e| ReportError::InvalidPattern {
            metric: metric.clone(),
            reason: e.to_string(),
        })?;
        if scanner.arity() != arity {
            return Err(ReportError::InvalidPattern {
                reason: format!(
                    "declares {arity} fields but has {} capture groups",
                    scanner.arity()
                ),
                metric,
            });
        }
        Ok(Self::new(metric, scanner))
    }

    /// Returns the metric name.
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Returns the number of values one match yields.
    pub fn arity(&self) -> usize {
        self.scanner.arity()
    }
}

/// Extracts every field of the single occurrence of `spec` in `text`.
///
/// The result always has exactly `spec.arity()` values.
pub fn extract<T: FromStr>(text: &str, spec: &PatternSpec) -> Result<Vec<T>, ReportError> {
    let mut hits = spec.scanner.scan(text);
    if hits.len() != 1 {
        return Err(ReportError::Malformed {
            metric: spec.metric.clone(),
            observed: hits.len(),
        });
    }
    let fields = hits.swap_remove(0);
    if fields.len() != spec.arity() {
        return Err(ReportError::InvalidPattern {
            metric: spec.metric.clone(),
            reason: format!(
                "scanner returned {} fields, declared {}",
                fields.len(),
                spec.arity()
            ),
        });
    }
    fields
        .into_iter()
        .map(|field| {
            let field = field.trim();
            field.parse::<T>().map_err(|_| ReportError::InvalidNumber {
                metric: spec.metric.clone(),
                text: field.to_string(),
            })
        })
        .collect()
}

/// Extracts a fixed-size tuple of fields.
pub fn extract_array<T: FromStr, const N: usize>(
    text: &str,
    spec: &PatternSpec,
) -> Result<[T; N], ReportError> {
    let values = extract::<T>(text, spec)?;
    let len = values.len();
    values
        .try_into()
        .map_err(|_| ReportError::InvalidPattern {
            metric: spec.metric.clone(),
            reason: format!("yields {len} fields, caller expects {N}"),
        })
}

/// Extracts a single scalar field.
pub fn extract_one<T: FromStr>(text: &str, spec: &PatternSpec) -> Result<T, ReportError> {
    let [value] = extract_array::<T, 1>(text, spec)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_power() -> PatternSpec {
        PatternSpec::regex(
            "total_power",
            r"^[ \t|]*Total On-Chip Power \(W\)\s*\|\s*(\d*\.?\d+)",
            1,
        )
        .unwrap()
    }

    #[test]
    fn scalar_extraction() {
        let v: f64 = extract_one("Total On-Chip Power (W) | 1.234\n", &total_power()).unwrap();
        assert_eq!(v, 1.234);
    }

    #[test]
    fn zero_matches_is_malformed() {
        let err = extract_one::<f64>("Dynamic (W) | 0.9\n", &total_power()).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Malformed { ref metric, observed: 0 } if metric == "total_power"
        ));
    }

    #[test]
    fn duplicate_matches_is_malformed() {
        let text = "Total On-Chip Power (W) | 1.0\nTotal On-Chip Power (W) | 2.0\n";
        let err = extract_one::<f64>(text, &total_power()).unwrap_err();
        assert!(matches!(err, ReportError::Malformed { observed: 2, .. }));
    }

    #[test]
    fn tuple_extraction_has_declared_arity() {
        let spec = PatternSpec::regex("pair", r"^(\d+),(\d+)$", 2).unwrap();
        let v: Vec<u64> = extract("3,4\n", &spec).unwrap();
        assert_eq!(v, vec![3, 4]);
        let [a, b]: [u64; 2] = extract_array("3,4\n", &spec).unwrap();
        assert_eq!((a, b), (3, 4));
    }

    #[test]
    fn caller_arity_mismatch_rejected() {
        let spec = PatternSpec::regex("pair", r"^(\d+),(\d+)$", 2).unwrap();
        assert!(matches!(
            extract_array::<u64, 3>("3,4\n", &spec),
            Err(ReportError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn declared_arity_checked_at_construction() {
        let err = PatternSpec::regex("pair", r"(\d+),(\d+)", 1).unwrap_err();
        assert!(matches!(err, ReportError::InvalidPattern { .. }));
    }

    #[test]
    fn integer_field_rejects_float_text() {
        let spec = PatternSpec::regex("luts", r"^luts=(\S+)$", 1).unwrap();
        let err = extract_one::<u64>("luts=12.5\n", &spec).unwrap_err();
        assert!(matches!(err, ReportError::InvalidNumber { ref text, .. } if text == "12.5"));
    }

    #[derive(Debug)]
    struct CsvColumn(usize);

    impl FieldScanner for CsvColumn {
        fn arity(&self) -> usize {
            1
        }

        fn scan<'t>(&self, text: &'t str) -> Vec<Vec<&'t str>> {
            text.lines()
                .filter_map(|l| l.split(',').nth(self.0))
                .map(|f| vec![f])
                .collect()
        }
    }

    #[test]
    fn custom_scanner_obeys_same_contract() {
        let spec = PatternSpec::new("second_column", CsvColumn(1));
        let v: i64 = extract_one("a,42,b\n", &spec).unwrap();
        assert_eq!(v, 42);
        assert!(matches!(
            extract_one::<i64>("a,1\nb,2\n", &spec),
            Err(ReportError::Malformed { observed: 2, .. })
        ));
    }
}
