use std::{io, path::PathBuf};

use anyhow::Result;
use clap::Parser;

use hotel_revenue::{logging, MonthlyRevenue};

/// Sums hotel booking room prices per arrival month-year.
///
/// Prints one `MONTH-YEAR<TAB>TOTAL` line per month, ready for
/// `hotel-revenue` to rank.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Hotel bookings CSV file
    path: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init();
    let totals = MonthlyRevenue::read_csv(&args.path)?;
    totals.write_to(io::stdout().lock())?;
    Ok(())
}
