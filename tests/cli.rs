use std::{io::Write, process::Command};

use tempfile::NamedTempFile;

fn hotel_revenue() -> Command {
    Command::new(env!("CARGO_BIN_EXE_hotel-revenue"))
}

fn input_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn no_args_prints_usage_and_exits_with_status_1() {
    let output = hotel_revenue().output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Usage: "), "{stdout}");
    assert!(stdout.contains("hotel-revenue"), "{stdout}");
    assert!(stdout.trim_end().ends_with("path/to/output_file"), "{stdout}");
}

#[test]
fn prints_report_for_job_output() {
    let input = input_file("1-2015=100.00\n6-2016=300.00\n12-2017=50.00\n");
    let output = hotel_revenue().arg(input.path()).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(
        stdout.starts_with(
            "Revenue by month-year\n6-2016: 300.00\n1-2015: 100.00\n12-2017: 50.00\n"
        ),
        "{stdout}"
    );
    assert!(stdout.contains("Top season: summer\n"), "{stdout}");
    assert!(stdout.contains("Top year: 2016\n"), "{stdout}");
    assert!(stdout.contains("2018: 0.00\n"), "{stdout}");
    assert!(stdout.contains("Top month: June\n"), "{stdout}");
}

#[test]
fn malformed_line_fails_without_printing_report() {
    let input = input_file("1-2015=100.00\nnot a record at all\n");
    let output = hotel_revenue().arg(input.path()).output().unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("line 2"), "{stderr}");
}

#[test]
fn missing_file_fails() {
    let output = hotel_revenue()
        .arg("testdata/does-not-exist")
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn aggregate_bookings_output_feeds_report() {
    let output = Command::new(env!("CARGO_BIN_EXE_aggregate-bookings"))
        .arg("testdata/bookings.csv")
        .output()
        .unwrap();
    assert!(output.status.success());
    let job_output = input_file(&String::from_utf8(output.stdout).unwrap());
    let report = hotel_revenue().arg(job_output.path()).output().unwrap();
    assert!(report.status.success());
    let stdout = String::from_utf8(report.stdout).unwrap();
    assert!(stdout.contains("Top season: fall\n"), "{stdout}");
    assert!(stdout.contains("Top year: 2018\n"), "{stdout}");
    assert!(stdout.contains("Top month: February\n"), "{stdout}");
}
