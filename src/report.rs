use anyhow::{Context, Result};

use std::{fmt::Display, path::Path};

use crate::{
    enrich::{by_month, by_season, by_year, Enrichment},
    rank::rank,
    table::RevenueTable,
    usd::Usd,
};

/// Holds a revenue table and every summary derived from it.
///
/// To build a `Report`, use [`Report::read`] or [`Report::from_table`]. All
/// the summaries are worked out up front, so a table with a bad identifier
/// fails before anything is printed.
///
/// To get a printable version of the report, use its [`Display`]
/// implementation. Each line is `LABEL: VALUE`, largest value first.
#[derive(Debug)]
pub struct Report {
    table: RevenueTable,
    enrichments: Vec<Enrichment>,
}

impl Report {
    /// Reads the job output at `path` and builds the report.
    ///
    /// # Errors
    ///
    /// Returns any errors from [`RevenueTable::read`] or
    /// [`Report::from_table`].
    pub fn read(path: impl AsRef<Path>) -> Result<Report> {
        let path = path.as_ref();
        let table = RevenueTable::read(path)?;
        Self::from_table(table).with_context(|| format!("summarising {}", path.display()))
    }

    /// Builds the season, year, and month summaries for `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if any identifier in `table` is not a valid `M-Y`.
    pub fn from_table(table: RevenueTable) -> Result<Report> {
        let enrichments = vec![by_season(&table)?, by_year(&table)?, by_month(&table)?];
        Ok(Report { table, enrichments })
    }

    #[must_use]
    pub fn table(&self) -> &RevenueTable {
        &self.table
    }

    #[must_use]
    pub fn enrichments(&self) -> &[Enrichment] {
        &self.enrichments
    }

    /// Returns identifiers sorted by revenue, descending.
    #[must_use]
    pub fn by_revenue(&self) -> Vec<(&str, Usd)> {
        rank(self.table.iter())
    }
}

fn write_ranked<'a>(
    f: &mut std::fmt::Formatter<'_>,
    rows: impl IntoIterator<Item = (&'a str, Usd)>,
) -> std::fmt::Result {
    for (label, usd) in rows {
        writeln!(f, "{label}: {usd}")?;
    }
    Ok(())
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Revenue by month-year")?;
        write_ranked(f, self.by_revenue())?;
        for enrichment in &self.enrichments {
            writeln!(f)?;
            if let Some(top) = enrichment.top() {
                writeln!(f, "Top {}: {top}", enrichment.name)?;
            }
            write_ranked(f, enrichment.ranked())?;
        }
        Ok(())
    }
}
