use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info};

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::usd::{Usd, UsdError};

/// Errors from reading `identifier=value` lines.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: bad token format (want identifier=value): {text:?}")]
    Token { line: usize, text: String },
    #[error("line {line}: bad revenue for {identifier}: {source}")]
    Value {
        line: usize,
        identifier: String,
        source: UsdError,
    },
    #[error("reading line {line}: {source}")]
    Io {
        line: usize,
        source: std::io::Error,
    },
}

/// Revenue per month-year identifier, as reported by the aggregation job.
///
/// Build one with [`RevenueTable::read`] or [`RevenueTable::from_reader`].
/// Once built, the table is only ever read.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RevenueTable {
    entries: BTreeMap<String, Usd>,
}

impl RevenueTable {
    /// Reads the job output at `path`.
    ///
    /// # Errors
    ///
    /// Returns errors if the file cannot be opened, or for the first line
    /// that [`RevenueTable::from_reader`] rejects.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let table = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("reading {}", path.display()))?;
        info!(path = %path.display(), entries = table.len(), "read revenue table");
        Ok(table)
    }

    /// Parses lines of `identifier=value` pairs from `reader`.
    ///
    /// Each run of whitespace in a line is treated as `=`, so the job's
    /// native `1-2015\t1234.5` output reads the same as `1-2015=1234.5`.
    /// A line may carry several pairs separated by commas. Values are
    /// rounded to whole cents, and a later value for an identifier replaces
    /// an earlier one. Blank lines are skipped rather than rejected.
    ///
    /// # Errors
    ///
    /// Stops at the first line that cannot be read, or that holds a token
    /// which is not exactly `identifier=value` with a numeric value.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, ParseError> {
        let mut table = Self::default();
        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|source| ParseError::Io {
                line: line_no,
                source,
            })?;
            let normalized = line.split_whitespace().collect::<Vec<_>>().join("=");
            if normalized.is_empty() {
                continue;
            }
            for token in normalized.split(',') {
                let (identifier, value) = split_token(token).ok_or_else(|| ParseError::Token {
                    line: line_no,
                    text: line.clone(),
                })?;
                let revenue: Usd = value.parse().map_err(|source| ParseError::Value {
                    line: line_no,
                    identifier: identifier.to_string(),
                    source,
                })?;
                debug!(line = line_no, identifier, %revenue, "parsed entry");
                table.entries.insert(identifier.to_string(), revenue);
            }
        }
        Ok(table)
    }

    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<Usd> {
        self.entries.get(identifier).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(identifier, revenue)` in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Usd)> {
        self.entries.iter().map(|(id, usd)| (id.as_str(), *usd))
    }

    /// Returns the sum of every entry, or `None` if it does not fit.
    #[must_use]
    pub fn total(&self) -> Option<Usd> {
        Usd::checked_sum(self.entries.values().copied())
    }
}

impl<S: Into<String>> FromIterator<(S, Usd)> for RevenueTable {
    fn from_iter<I: IntoIterator<Item = (S, Usd)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(id, usd)| (id.into(), usd)).collect(),
        }
    }
}

fn split_token(token: &str) -> Option<(&str, &str)> {
    let mut parts = token.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(identifier), Some(value), None) if !identifier.is_empty() => {
            Some((identifier, value))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<RevenueTable, ParseError> {
        RevenueTable::from_reader(input.as_bytes())
    }

    #[test]
    fn read_fn_correctly_parses_job_output() {
        let table = RevenueTable::read("testdata/part-r-00000").unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(table.get("8-2017"), Some(Usd::from_cents(1_234_567_800)));
        assert_eq!(table.get("1-2018"), Some(Usd::from_cents(98_760)));
        assert_eq!(table.total(), Some(Usd::from_cents(1_234_829_334)));
    }

    #[test]
    fn read_fn_returns_error_for_missing_file() {
        assert!(RevenueTable::read("testdata/does-not-exist").is_err());
    }

    #[test]
    fn read_fn_returns_error_for_bad_line_format() {
        let err = RevenueTable::read("testdata/part-r-00000.bad").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"), "{err:#}");
    }

    #[test]
    fn from_reader_fn_treats_whitespace_as_equals() {
        let table = parse("1-2015\t1234.5\n2-2015   987.6\n").unwrap();
        assert_eq!(table.get("1-2015"), Some(Usd::from_cents(123_450)));
        assert_eq!(table.get("2-2015"), Some(Usd::from_cents(98_760)));
    }

    #[test]
    fn from_reader_fn_reads_comma_separated_pairs() {
        let table = parse("1-2015=1234.5,2-2015=987.6").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.total(), Some(Usd::from_cents(222_210)));
    }

    #[test]
    fn from_reader_fn_rounds_values_to_cents() {
        let table = parse("1-2015=100.005").unwrap();
        assert_eq!(table.get("1-2015"), Some(Usd::from_cents(10001)));
    }

    #[test]
    fn from_reader_fn_keeps_last_value_for_duplicate_identifier() {
        let table = parse("3-2016=10.00\n4-2016=1.00\n3-2016=20.00\n").unwrap();
        assert_eq!(table.get("3-2016"), Some(Usd::from_cents(2000)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn from_reader_fn_skips_blank_lines() {
        let table = parse("\n1-2015=1\n   \n\t\n2-2015=2\n").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn from_reader_fn_rejects_token_without_value() {
        let err = parse("1-2015=1\n2-2015\n").unwrap_err();
        assert!(matches!(err, ParseError::Token { line: 2, .. }), "{err}");
    }

    #[test]
    fn from_reader_fn_rejects_token_with_extra_fields() {
        let err = parse("1-2015 1 2").unwrap_err();
        assert!(matches!(err, ParseError::Token { line: 1, .. }), "{err}");
    }

    #[test]
    fn from_reader_fn_rejects_non_numeric_value() {
        let err = parse("1-2015=lots").unwrap_err();
        match err {
            ParseError::Value {
                line, identifier, ..
            } => {
                assert_eq!(line, 1);
                assert_eq!(identifier, "1-2015");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
