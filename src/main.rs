use std::{env, path::PathBuf, process};

use anyhow::Result;
use clap::Parser;

use hotel_revenue::{logging, Report};

/// Ranks hotel revenue by month-year, then by season, year, and month.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Output file from the revenue aggregation job
    path: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let Some(path) = args.path else {
        let program = env::args().next().unwrap_or_else(|| "hotel-revenue".into());
        println!("Usage: {program} path/to/output_file");
        process::exit(1);
    };
    logging::init();
    let report = Report::read(&path)?;
    print!("{report}");
    Ok(())
}
