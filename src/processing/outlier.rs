//! Single-point perturbation of a series, for studying how far one bad
//! observation drags a least squares fit.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrendError};
use crate::processing::linear_model::{self, FittedModel};
use crate::state::series::Series;

/// Which point to perturb and by how much. An offset of zero is a valid
/// baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierSpec {
    pub index: usize,
    pub offset: f64,
}

impl OutlierSpec {
    pub fn new(index: usize, offset: f64) -> Self {
        Self { index, offset }
    }

    pub fn apply(&self, series: &Series) -> Result<Series> {
        inject(series, self.index, self.offset)
    }
}

/// Copy of `series` with `y[index]` raised by `offset`. The input is left
/// untouched.
pub fn inject(series: &Series, index: usize, offset: f64) -> Result<Series> {
    if index >= series.len() {
        return Err(TrendError::IndexOutOfRange {
            index,
            len: series.len(),
        });
    }
    let mut y = series.y().to_vec();
    y[index] += offset;
    Series::new(series.x().to_vec(), y)
}

/// `n` points on `y = slope * (x - x_start) + intercept`, x stepping by
/// `x_step` from `x_start`. Parameters must be finite.
pub fn synthetic_linear(n: usize, x_start: f64, x_step: f64, slope: f64, intercept: f64) -> Series {
    Series::from_pairs((0..n).map(|i| {
        let dx = i as f64 * x_step;
        (x_start + dx, slope * dx + intercept)
    }))
}

/// Clean and perturbed fits of one base series, side by side.
#[derive(Debug, Clone, Serialize)]
pub struct OutlierExperiment {
    pub spec: OutlierSpec,
    pub perturbed: Series,
    pub clean_fit: FittedModel,
    pub perturbed_fit: FittedModel,
    /// Misfit of the clean fit against the clean data.
    pub clean_misfit: f64,
    /// Misfit of the perturbed fit against the perturbed data.
    pub perturbed_misfit: f64,
    /// Misfit of the clean fit against the perturbed data.
    pub clean_fit_on_perturbed: f64,
}

impl OutlierExperiment {
    pub fn run(base: &Series, spec: OutlierSpec) -> Result<Self> {
        let perturbed = spec.apply(base)?;

        let clean_fit = linear_model::fit(base)?;
        let perturbed_fit = linear_model::fit(&perturbed)?;

        let clean_misfit = linear_model::misfit(base, &clean_fit.model, clean_fit.x_origin)?;
        let perturbed_misfit =
            linear_model::misfit(&perturbed, &perturbed_fit.model, perturbed_fit.x_origin)?;
        let clean_fit_on_perturbed =
            linear_model::misfit(&perturbed, &clean_fit.model, clean_fit.x_origin)?;

        Ok(Self {
            spec,
            perturbed,
            clean_fit,
            perturbed_fit,
            clean_misfit,
            perturbed_misfit,
            clean_fit_on_perturbed,
        })
    }

    /// How far the outlier moved the fitted slope.
    pub fn slope_shift(&self) -> f64 {
        self.perturbed_fit.slope() - self.clean_fit.slope()
    }
}
