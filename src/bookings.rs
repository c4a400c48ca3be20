use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use std::{
    collections::BTreeMap,
    io::{Read, Write},
    path::Path,
};

use crate::{enrich::Period, usd::Usd};

/// Defines the CSV format for hotel booking data.
///
/// Only the arrival date and room price are read; any other columns are
/// ignored.
#[derive(Debug, Deserialize)]
pub struct Booking {
    #[serde(rename = "arrival_year")]
    pub year: u32,
    #[serde(rename = "arrival_month")]
    pub month: u8,
    #[serde(rename = "avg_price_per_room")]
    pub price: Usd,
}

/// Revenue per arrival month, summed from individual bookings.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MonthlyRevenue(BTreeMap<Period, Usd>);

impl MonthlyRevenue {
    /// Reads bookings from the CSV file at `path` and sums them.
    ///
    /// # Errors
    ///
    /// Returns any errors from opening or parsing the CSV file.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file =
            std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("{}", path.display()))
    }

    /// Sums the room price of every booking in `reader` into its arrival
    /// month.
    ///
    /// # Errors
    ///
    /// Returns an error for the first record that cannot be parsed, whose
    /// arrival month is not from 1 to 12, or that pushes its month's total
    /// out of range.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut totals = Self::default();
        let mut rdr = csv::Reader::from_reader(reader);
        let mut bookings = 0;
        for (index, result) in rdr.deserialize().enumerate() {
            let record = index + 1;
            bookings = record;
            let booking: Booking = result?;
            let period = Period::new(booking.month, booking.year)
                .with_context(|| format!("record {record}"))?;
            debug!(record, %period, price = %booking.price, "read booking");
            let total = totals.0.entry(period).or_default();
            *total = total
                .checked_add(booking.price)
                .ok_or_else(|| anyhow!("record {record}: revenue total for {period} is too large"))?;
        }
        info!(bookings, months = totals.len(), "summed bookings");
        Ok(totals)
    }

    #[must_use]
    pub fn get(&self, period: Period) -> Option<Usd> {
        self.0.get(&period).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Writes one `M-Y<TAB>TOTAL` line per month, oldest first.
    ///
    /// This is the format [`crate::RevenueTable::from_reader`] reads.
    ///
    /// # Errors
    ///
    /// Returns any errors from writing to `w`.
    pub fn write_to(&self, mut w: impl Write) -> std::io::Result<()> {
        for (period, usd) in &self.0 {
            writeln!(w, "{period}\t{usd}")?;
        }
        Ok(())
    }
}
