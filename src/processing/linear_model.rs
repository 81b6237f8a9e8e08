//! Ordinary least squares line fitting, evaluation and misfit scoring.
//!
//! A line is `y = slope * (x - x_origin) + intercept`. The origin is never
//! implicit: fitting picks `min(x)` of the fitted series, and every
//! evaluation takes the origin explicitly. Fit, evaluate and misfit are
//! separate so a hand-picked line can be scored on the same footing as a
//! fitted one.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrendError};
use crate::state::series::Series;

/// Slope and intercept of a line. Meaningless without an `x_origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearModel {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }
}

/// A line together with the origin it was expressed against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub model: LinearModel,
    pub x_origin: f64,
}

impl FittedModel {
    pub fn new(model: LinearModel, x_origin: f64) -> Self {
        Self { model, x_origin }
    }

    pub fn slope(&self) -> f64 {
        self.model.slope
    }

    pub fn intercept(&self) -> f64 {
        self.model.intercept
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        evaluate(&self.model, self.x_origin, x)
    }

    /// The same line expressed against `new_origin`.
    ///
    /// Predictions are unchanged; only the intercept moves, to the line's
    /// value at `new_origin`.
    pub fn rebase(&self, new_origin: f64) -> Self {
        Self {
            model: LinearModel {
                slope: self.model.slope,
                intercept: self.evaluate(new_origin),
            },
            x_origin: new_origin,
        }
    }

    /// The x at which the line reaches `y`. `None` for a flat line.
    pub fn solve_for(&self, y: f64) -> Option<f64> {
        if self.model.slope == 0.0 {
            return None;
        }
        Some(self.x_origin + (y - self.model.intercept) / self.model.slope)
    }
}

/// Least squares fit of `y` against `x - min(x)`.
///
/// slope = Cov(x', y) / Var(x'), intercept = mean(y) - slope * mean(x').
pub fn fit(series: &Series) -> Result<FittedModel> {
    let n = series.len();
    if n < 2 {
        return Err(TrendError::InsufficientData { required: 2, got: n });
    }

    let x_origin = series.x().iter().copied().fold(f64::INFINITY, f64::min);
    let count = n as f64;

    let mean_x = series.x().iter().map(|x| x - x_origin).sum::<f64>() / count;
    let mean_y = series.y().iter().sum::<f64>() / count;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in series.iter() {
        let dx = (x - x_origin) - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    let variance = sxx / count;
    if variance == 0.0 {
        return Err(TrendError::DegenerateInput { variance });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    Ok(FittedModel::new(LinearModel::new(slope, intercept), x_origin))
}

/// `slope * (x - x_origin) + intercept`. No range check; extrapolation is
/// the normal use.
pub fn evaluate(model: &LinearModel, x_origin: f64, x: f64) -> f64 {
    model.slope * (x - x_origin) + model.intercept
}

pub fn evaluate_many(model: &LinearModel, x_origin: f64, xs: &[f64]) -> Vec<f64> {
    xs.iter().map(|&x| evaluate(model, x_origin, x)).collect()
}

/// Observed minus predicted, one per point.
pub fn residuals(series: &Series, model: &LinearModel, x_origin: f64) -> Vec<f64> {
    series
        .iter()
        .map(|(x, y)| y - evaluate(model, x_origin, x))
        .collect()
}

/// Sum of squared residuals. Not divided by the point count, so scores from
/// series of different lengths are not comparable.
pub fn misfit(series: &Series, model: &LinearModel, x_origin: f64) -> Result<f64> {
    if series.is_empty() {
        return Err(TrendError::InsufficientData { required: 1, got: 0 });
    }
    Ok(residuals(series, model, x_origin)
        .iter()
        .map(|r| r * r)
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_exact_line_with_offset_origin() {
        let series = Series::new(vec![2000.0, 2001.0, 2002.0], vec![370.0, 372.0, 374.0]).unwrap();
        let fitted = fit(&series).unwrap();
        assert_eq!(fitted.x_origin, 2000.0);
        assert!((fitted.slope() - 2.0).abs() < 1e-12);
        assert!((fitted.intercept() - 370.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_single_point() {
        let series = Series::new(vec![1.0], vec![1.0]).unwrap();
        assert_eq!(
            fit(&series).unwrap_err(),
            TrendError::InsufficientData { required: 2, got: 1 }
        );
    }

    #[test]
    fn test_solve_for_flat_line() {
        let flat = FittedModel::new(LinearModel::new(0.0, 5.0), 0.0);
        assert_eq!(flat.solve_for(5.0), None);
    }
}
