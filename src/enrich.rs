use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use crate::{rank::rank, table::RevenueTable, usd::Usd};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})-(\d+)$").expect("identifier regex is valid"));

/// Month names, indexed by month number minus one.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Years that always get a bucket, even when the data has none of them.
pub const BASE_YEARS: [u32; 4] = [2015, 2016, 2017, 2018];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnrichError {
    #[error("bad identifier {0:?} (want MONTH-YEAR, with MONTH from 1 to 12)")]
    Identifier(String),
    #[error("revenue total for {0} is too large")]
    Overflow(String),
}

/// The month and year parsed out of a `M-Y` identifier.
///
/// Periods order chronologically. The month is always from 1 to 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period {
    year: u32,
    month: u8,
}

impl Period {
    /// # Errors
    ///
    /// Returns an error if `month` is not from 1 to 12.
    pub fn new(month: u8, year: u32) -> Result<Self, EnrichError> {
        if !(1..=12).contains(&month) {
            return Err(EnrichError::Identifier(format!("{month}-{year}")));
        }
        Ok(Self { year, month })
    }

    #[must_use]
    pub const fn month(self) -> u8 {
        self.month
    }

    #[must_use]
    pub const fn year(self) -> u32 {
        self.year
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.month, self.year)
    }
}

impl FromStr for Period {
    type Err = EnrichError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || EnrichError::Identifier(s.to_string());
        let caps = IDENTIFIER.captures(s).ok_or_else(bad)?;
        let month: u8 = caps[1].parse().map_err(|_| bad())?;
        let year: u32 = caps[2].parse().map_err(|_| bad())?;
        Self::new(month, year).map_err(|_| bad())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Fall,
    Winter,
    Spring,
    Summer,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Fall, Season::Winter, Season::Spring, Season::Summer];

    /// Returns the season for a month from 1 to 12, or `None` for any other
    /// number.
    #[must_use]
    pub fn of_month(month: u8) -> Option<Season> {
        match month {
            9..=11 => Some(Season::Fall),
            12 | 1 | 2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            _ => None,
        }
    }

    #[must_use]
    pub fn of_period(period: Period) -> Season {
        match Self::of_month(period.month()) {
            Some(season) => season,
            None => unreachable!("Period holds a month from 1 to 12"),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Season::Fall => "fall",
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
        })
    }
}

/// Revenue summed into labelled buckets.
///
/// Buckets are held in their natural order (seasons from fall, years and
/// months ascending); [`Enrichment::ranked`] gives them largest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub name: &'static str,
    buckets: Vec<(String, Usd)>,
}

impl Enrichment {
    fn new(name: &'static str, buckets: impl IntoIterator<Item = (String, Usd)>) -> Self {
        Self {
            name,
            buckets: buckets.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<Usd> {
        self.buckets
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, usd)| *usd)
    }

    /// Returns the buckets, largest first.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, Usd)> {
        rank(self.buckets.iter().map(|(l, usd)| (l.as_str(), *usd)))
    }

    /// Returns the label of the largest bucket. On a tie, the bucket that
    /// comes first in natural order wins.
    #[must_use]
    pub fn top(&self) -> Option<&str> {
        self.ranked().first().map(|(label, _)| *label)
    }

    /// Returns the sum of every bucket, or `None` if it does not fit.
    #[must_use]
    pub fn total(&self) -> Option<Usd> {
        Usd::checked_sum(self.buckets.iter().map(|(_, usd)| *usd))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

fn periods(table: &RevenueTable) -> impl Iterator<Item = Result<(Period, Usd), EnrichError>> + '_ {
    table
        .iter()
        .map(|(id, usd)| id.parse().map(|period| (period, usd)))
}

fn add_to(bucket: &mut Usd, usd: Usd, label: impl Display) -> Result<(), EnrichError> {
    *bucket = bucket
        .checked_add(usd)
        .ok_or_else(|| EnrichError::Overflow(label.to_string()))?;
    Ok(())
}

/// Sums revenue into fall, winter, spring and summer.
///
/// # Errors
///
/// Returns an error for the first identifier that is not a valid `M-Y`, or
/// if a bucket total grows too large.
pub fn by_season(table: &RevenueTable) -> Result<Enrichment, EnrichError> {
    let mut sums = [Usd::default(); 4];
    for entry in periods(table) {
        let (period, usd) = entry?;
        let season = Season::of_period(period);
        add_to(&mut sums[season.index()], usd, season)?;
    }
    Ok(Enrichment::new(
        "season",
        Season::ALL.iter().map(|s| (s.to_string(), sums[s.index()])),
    ))
}

/// Sums revenue per calendar year.
///
/// Every year in [`BASE_YEARS`] gets a bucket, and so does any other year
/// that appears in the data.
///
/// # Errors
///
/// Returns an error for the first identifier that is not a valid `M-Y`, or
/// if a bucket total grows too large.
pub fn by_year(table: &RevenueTable) -> Result<Enrichment, EnrichError> {
    let mut sums: BTreeMap<u32, Usd> = BASE_YEARS.iter().map(|&y| (y, Usd::default())).collect();
    for entry in periods(table) {
        let (period, usd) = entry?;
        add_to(sums.entry(period.year()).or_default(), usd, period.year())?;
    }
    Ok(Enrichment::new(
        "year",
        sums.into_iter().map(|(year, usd)| (year.to_string(), usd)),
    ))
}

/// Sums revenue per calendar month, across all years.
///
/// # Errors
///
/// Returns an error for the first identifier that is not a valid `M-Y`, or
/// if a bucket total grows too large.
pub fn by_month(table: &RevenueTable) -> Result<Enrichment, EnrichError> {
    let mut sums = [Usd::default(); 12];
    for entry in periods(table) {
        let (period, usd) = entry?;
        let month = usize::from(period.month() - 1);
        add_to(&mut sums[month], usd, MONTH_NAMES[month])?;
    }
    Ok(Enrichment::new(
        "month",
        MONTH_NAMES
            .iter()
            .zip(sums)
            .map(|(name, usd)| ((*name).to_string(), usd)),
    ))
}
