use crate::state::series::Series;

/// Return every (x, y) with `x_min <= x <= x_max`, in original order.
///
/// An inverted range (`x_min > x_max`) or a range that misses every point
/// yields an empty series, not an error.
pub fn select(series: &Series, x_min: f64, x_max: f64) -> Series {
    if x_min > x_max {
        return Series::empty();
    }
    Series::from_pairs(series.iter().filter(|&(x, _)| x >= x_min && x <= x_max))
}

/// Like [`select`], with a missing bound defaulting to the stored range.
pub fn select_range(series: &Series, x_min: Option<f64>, x_max: Option<f64>) -> Series {
    let Some((lo, hi)) = series.x_range() else {
        return Series::empty();
    };
    select(series, x_min.unwrap_or(lo), x_max.unwrap_or(hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let series = Series::new(vec![1.0, 2.0, 3.0, 4.0], vec![10.0, 20.0, 30.0, 40.0]).unwrap();
        let window = select(&series, 2.0, 3.0);
        assert_eq!(window.x(), &[2.0, 3.0]);
        assert_eq!(window.y(), &[20.0, 30.0]);
    }

    #[test]
    fn test_select_range_defaults_to_full_span() {
        let series = Series::new(vec![1.0, 2.0, 3.0], vec![1.0, 4.0, 9.0]).unwrap();
        assert_eq!(select_range(&series, None, None), series);
        assert_eq!(select_range(&series, Some(2.0), None).x(), &[2.0, 3.0]);
        assert_eq!(select_range(&series, None, Some(1.5)).x(), &[1.0]);
    }

    #[test]
    fn test_select_range_on_empty_series() {
        assert!(select_range(&Series::empty(), Some(0.0), Some(1.0)).is_empty());
    }
}
