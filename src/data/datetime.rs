use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Date layouts tried against a column, most specific first.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
];

/// Year-month layouts common in monthly records ("1958-03").
const MONTH_FORMATS: &[&str] = &["%Y-%m", "%Y/%m"];

/// Pick the format that parses the largest share of a sample of `values`.
pub fn detect_date_format(values: &[String]) -> Option<&'static str> {
    let sample: Vec<&str> = values
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(100)
        .collect();
    if sample.is_empty() {
        return None;
    }

    let mut best_format = None;
    let mut best_hits = 0;
    for &fmt in DATE_FORMATS.iter().chain(MONTH_FORMATS) {
        let hits = sample.iter().filter(|s| parse_to_datetime(s, fmt).is_some()).count();
        if hits > best_hits {
            best_hits = hits;
            best_format = Some(fmt);
        }
    }
    best_format
}

fn parse_to_datetime(value: &str, format: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, format) {
        return d.and_hms_opt(0, 0, 0);
    }
    if MONTH_FORMATS.contains(&format) {
        // chrono needs a day; monthly records are stamped mid-month.
        let padded = format!("{value}-15");
        let fmt = format!("{}-%d", format);
        return NaiveDate::parse_from_str(&padded, &fmt).ok()?.and_hms_opt(0, 0, 0);
    }
    None
}

/// Fractional calendar year, e.g. 1958-07-02 12:00 -> about 1958.5.
pub fn to_decimal_year(dt: NaiveDateTime) -> f64 {
    let year = dt.year();
    let days_in_year = if NaiveDate::from_ymd_opt(year, 2, 29).is_some() { 366.0 } else { 365.0 };
    let seconds_into_day = dt.num_seconds_from_midnight() as f64;
    let elapsed = dt.ordinal0() as f64 + seconds_into_day / 86_400.0;
    year as f64 + elapsed / days_in_year
}

pub fn parse_to_decimal_year(value: &str, format: &str) -> Option<f64> {
    parse_to_datetime(value.trim(), format).map(to_decimal_year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_year_is_whole() {
        assert_eq!(parse_to_decimal_year("1960-01-01", "%Y-%m-%d"), Some(1960.0));
    }

    #[test]
    fn test_mid_year() {
        let y = parse_to_decimal_year("2021-07-02T12:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        assert!((y - 2021.5).abs() < 1e-3);
    }

    #[test]
    fn test_detect_iso_dates() {
        let values = vec!["1958-03-29".to_string(), "1958-04-05".to_string(), String::new()];
        assert_eq!(detect_date_format(&values), Some("%Y-%m-%d"));
    }

    #[test]
    fn test_detect_month_only() {
        let values = vec!["1958-03".to_string(), "1958-04".to_string()];
        let fmt = detect_date_format(&values).unwrap();
        let y = parse_to_decimal_year("1958-03", fmt).unwrap();
        assert!(y > 1958.19 && y < 1958.21);
    }

    #[test]
    fn test_detect_rejects_numbers() {
        let values = vec!["315.7".to_string(), "317.4".to_string()];
        assert_eq!(detect_date_format(&values), None);
    }
}
