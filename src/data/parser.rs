use std::collections::HashMap;

use crate::data::datetime;

/// How many leading rows are scanned for the header.
pub const HEADER_SCAN_ROWS: usize = 50;

/// Index of the header row among `rows`.
///
/// Data files often open with free-text preamble. The header is taken to be
/// the last row, within the first [`HEADER_SCAN_ROWS`], that has the most
/// common column count and whose cells are all non-empty, non-numeric,
/// non-date text. Falls back to row 0.
pub fn detect_header_row(rows: &[Vec<String>]) -> usize {
    let scanned = &rows[..rows.len().min(HEADER_SCAN_ROWS)];

    let mut widths: HashMap<usize, usize> = HashMap::new();
    for row in scanned {
        *widths.entry(row.len()).or_insert(0) += 1;
    }
    // Ties go to the wider row so the result doesn't depend on hash order.
    let Some(common_width) = widths.into_iter().max_by_key(|&(w, n)| (n, w)).map(|(w, _)| w) else {
        return 0;
    };

    scanned
        .iter()
        .rposition(|row| row.len() == common_width && row.iter().all(|cell| is_label(cell)))
        .unwrap_or(0)
}

fn is_label(cell: &str) -> bool {
    let trimmed = cell.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_err() && !is_date_like(trimmed)
}

fn is_date_like(s: &str) -> bool {
    datetime::detect_date_format(&[s.to_string()]).is_some()
}

/// Parse a column as numbers; unparseable cells become NaN.
/// Returns the values and the fraction that parsed to finite numbers.
pub fn column_to_f64(data: &[String]) -> (Vec<f64>, f64) {
    let values: Vec<f64> = data
        .iter()
        .map(|s| s.trim().parse::<f64>().unwrap_or(f64::NAN))
        .collect();
    let frac = finite_fraction(&values);
    (values, frac)
}

/// Parse a column as dates converted to decimal years, if most of it looks
/// like dates.
pub fn column_to_decimal_years(data: &[String]) -> Option<(Vec<f64>, f64)> {
    let format = datetime::detect_date_format(data)?;
    let years: Vec<f64> = data
        .iter()
        .map(|s| datetime::parse_to_decimal_year(s, format).unwrap_or(f64::NAN))
        .collect();
    let frac = finite_fraction(&years);
    if frac > 0.7 {
        Some((years, frac))
    } else {
        None
    }
}

fn finite_fraction(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| v.is_finite()).count() as f64 / values.len() as f64
}
