//! Tests for side-by-side model scoring.

use approx::assert_relative_eq;

use trendline::processing::comparison::ModelComparison;
use trendline::{fit, FittedModel, LinearModel, Series, TrendError};

fn noisy_trend() -> Series {
    Series::new(
        vec![1960.0, 1965.0, 1970.0, 1975.0, 1980.0, 1985.0],
        vec![316.9, 320.0, 325.7, 331.1, 338.8, 346.1],
    )
    .unwrap()
}

#[test]
fn test_fit_beats_manual_guess() {
    let series = noisy_trend();
    let fitted = fit(&series).unwrap();
    let guess = FittedModel::new(LinearModel::new(1.0, 315.0), 1960.0);

    let comparison = ModelComparison::compare(&series, ("fit", fitted), ("guess", guess)).unwrap();

    assert_eq!(comparison.points, 6);
    assert_eq!(comparison.first.label, "fit");
    assert_eq!(comparison.second.fitted, guess);
    assert!(comparison.first.misfit < comparison.second.misfit);
    assert_eq!(comparison.best().label, "fit");
}

#[test]
fn test_best_prefers_first_on_tie() {
    let series = noisy_trend();
    let model = FittedModel::new(LinearModel::new(1.2, 316.0), 1960.0);
    let comparison = ModelComparison::compare(&series, ("a", model), ("b", model)).unwrap();
    assert_eq!(comparison.best().label, "a");
}

/// Aligning to a shared origin keeps both lines and their scores.
#[test]
fn test_aligned_to_shared_origin() {
    let series = noisy_trend();
    let early = fit(&Series::new(series.x()[..3].to_vec(), series.y()[..3].to_vec()).unwrap()).unwrap();
    let late = fit(&Series::new(series.x()[3..].to_vec(), series.y()[3..].to_vec()).unwrap()).unwrap();
    assert_ne!(early.x_origin, late.x_origin);

    let comparison = ModelComparison::compare(&series, ("early", early), ("late", late)).unwrap();
    let aligned = comparison.aligned_to(1960.0);

    assert_eq!(aligned.first.fitted.x_origin, 1960.0);
    assert_eq!(aligned.second.fitted.x_origin, 1960.0);
    assert_eq!(aligned.first.misfit, comparison.first.misfit);
    for x in [1960.0, 1972.5, 2000.0] {
        assert_relative_eq!(aligned.second.fitted.evaluate(x), late.evaluate(x), epsilon = 1e-9);
    }
}

#[test]
fn test_compare_on_empty_series_fails() {
    let model = FittedModel::new(LinearModel::new(1.0, 0.0), 0.0);
    let err = ModelComparison::compare(&Series::empty(), ("a", model), ("b", model)).unwrap_err();
    assert_eq!(err, TrendError::InsufficientData { required: 1, got: 0 });
}
