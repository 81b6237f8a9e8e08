//! Tests for turning CSV tables into series.

use std::io::Write;

use approx::assert_relative_eq;
use tempfile::NamedTempFile;

use trendline::data::loader::{load_file, series_from_columns, LoadError};

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_monthly_record_with_comments_and_fill_values() {
    let file = csv_file(
        "# Monthly mean CO2 at the observatory\n\
         # fill value -99.99\n\
         year,month,decimal date,average\n\
         1958,3,1958.2027,315.70\n\
         1958,4,1958.2877,317.45\n\
         1958,5,1958.3699,-99.99\n\
         1958,6,1958.4548,317.51\n",
    );

    let data = load_file(file.path()).unwrap();
    assert_eq!(data.columns, vec!["year", "month", "decimal date", "average"]);
    assert_eq!(data.row_count, 4);

    let series = series_from_columns(&data, "decimal date", "average", Some(0.0)).unwrap();
    assert_eq!(series.x(), &[1958.2027, 1958.2877, 1958.4548]);
    assert_eq!(series.y(), &[315.70, 317.45, 317.51]);

    let unfiltered = series_from_columns(&data, "decimal date", "average", None).unwrap();
    assert_eq!(unfiltered.len(), 4);
}

#[test]
fn test_date_column_becomes_decimal_years() {
    let file = csv_file("date,co2\n1958-03-15,315.70\n1959-01-01,316.0\n1960-01-01,316.9\nbad,317.0\n");
    let data = load_file(file.path()).unwrap();

    let series = series_from_columns(&data, "DATE", "co2", None).unwrap();
    assert_eq!(series.len(), 3);
    assert_relative_eq!(series.x()[0], 1958.2, epsilon = 1e-9);
    assert_eq!(series.x()[1], 1959.0);
    assert_eq!(series.y(), &[315.70, 316.0, 316.9]);
}

#[test]
fn test_missing_column() {
    let file = csv_file("year,average\n1960,316.9\n");
    let data = load_file(file.path()).unwrap();
    assert!(matches!(
        series_from_columns(&data, "year", "trend", None),
        Err(LoadError::ColumnNotFound(name)) if name == "trend"
    ));
}

#[test]
fn test_no_usable_rows() {
    let file = csv_file("year,average\n1960,NaN\n1961,\n");
    let data = load_file(file.path()).unwrap();
    assert!(matches!(
        series_from_columns(&data, "year", "average", None),
        Err(LoadError::NoNumericRows)
    ));
}

#[test]
fn test_header_only_file() {
    let file = csv_file("year,average\n");
    assert!(matches!(load_file(file.path()), Err(LoadError::NoData)));
}

#[test]
fn test_unsupported_extension() {
    let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    assert!(matches!(
        load_file(file.path()),
        Err(LoadError::UnsupportedFormat(ext)) if ext == "parquet"
    ));
}
