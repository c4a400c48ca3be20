#![doc = include_str!("../README.md")]
pub mod bookings;
pub mod enrich;
pub mod logging;
pub mod rank;
pub mod report;
pub mod table;
pub mod usd;

pub use bookings::MonthlyRevenue;
pub use enrich::{by_month, by_season, by_year, Enrichment, Period, Season};
pub use rank::rank;
pub use report::Report;
pub use table::{ParseError, RevenueTable};
pub use usd::Usd;
