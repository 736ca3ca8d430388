//! Pluggable text scanners behind the extraction contract.
//!
//! A scanner finds every occurrence of a field group in a report and returns
//! the raw captured text. Counting occurrences and converting text to numbers
//! is left to [`extract`](crate::extract), so any engine that can produce the
//! captures (a regex, a column splitter, a real grammar) fits.

use std::fmt;

use regex::{Regex, RegexBuilder};

/// Finds field groups in report text.
pub trait FieldScanner: Send + Sync + fmt::Debug {
    /// Number of fields each occurrence yields.
    fn arity(&self) -> usize;

    /// Returns the captured fields of every occurrence in `text`, in order.
    ///
    /// Each inner vector has exactly [`arity`](Self::arity) entries.
    fn scan<'t>(&self, text: &'t str) -> Vec<Vec<&'t str>>;
}

/// A scanner backed by a multi-line regular expression.
///
/// `^` and `$` match at line boundaries. Each capture group is one field.
#[derive(Debug, Clone)]
pub struct RegexScanner {
    regex: Regex,
}

impl RegexScanner {
    /// Compiles `pattern` in multi-line mode.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).multi_line(true).build()?;
        Ok(Self { regex })
    }

    /// Returns the source pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl FieldScanner for RegexScanner {
    fn arity(&self) -> usize {
        // Group 0 is the whole match.
        self.regex.captures_len() - 1
    }

    fn scan<'t>(&self, text: &'t str) -> Vec<Vec<&'t str>> {
        self.regex
            .captures_iter(text)
            .map(|caps| {
                caps.iter()
                    .skip(1)
                    .map(|m| m.map_or("", |m| m.as_str()))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_counts_groups() {
        let s = RegexScanner::new(r"(\d+)\s*\|\s*(\d+)").unwrap();
        assert_eq!(s.arity(), 2);
    }

    #[test]
    fn anchors_are_per_line() {
        let s = RegexScanner::new(r"^key\s*=\s*(\d+)$").unwrap();
        let hits = s.scan("junk\nkey = 4\nkey = 5\n  key = 6\n");
        assert_eq!(hits, vec![vec!["4"], vec!["5"]]);
    }

    #[test]
    fn no_match_is_empty() {
        let s = RegexScanner::new(r"^WNS\(ns\)").unwrap();
        assert!(s.scan("nothing here").is_empty());
    }

    #[test]
    fn bad_pattern_is_error() {
        assert!(RegexScanner::new(r"(unclosed").is_err());
    }
}
