//! Side-by-side scoring of competing lines on one series.
//!
//! Labels and number formatting belong to whoever renders the comparison.
//! Misfits are only comparable because both candidates are scored on the
//! same series; never compare scores across series.

use serde::Serialize;

use crate::errors::Result;
use crate::processing::linear_model::{self, FittedModel};
use crate::state::series::Series;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredModel {
    pub label: String,
    pub fitted: FittedModel,
    pub misfit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelComparison {
    pub points: usize,
    pub first: ScoredModel,
    pub second: ScoredModel,
}

impl ModelComparison {
    pub fn compare(
        series: &Series,
        first: (&str, FittedModel),
        second: (&str, FittedModel),
    ) -> Result<Self> {
        Ok(Self {
            points: series.len(),
            first: score(series, first.0, first.1)?,
            second: score(series, second.0, second.1)?,
        })
    }

    /// The candidate with the lower misfit; the first one on a tie.
    pub fn best(&self) -> &ScoredModel {
        if self.second.misfit < self.first.misfit {
            &self.second
        } else {
            &self.first
        }
    }

    /// Both candidates re-expressed against a shared origin, for overlaying
    /// lines fitted on different windows. Misfits are unchanged.
    pub fn aligned_to(&self, x_origin: f64) -> Self {
        let mut aligned = self.clone();
        aligned.first.fitted = self.first.fitted.rebase(x_origin);
        aligned.second.fitted = self.second.fitted.rebase(x_origin);
        aligned
    }
}

fn score(series: &Series, label: &str, fitted: FittedModel) -> Result<ScoredModel> {
    let misfit = linear_model::misfit(series, &fitted.model, fitted.x_origin)?;
    Ok(ScoredModel {
        label: label.to_string(),
        fitted,
        misfit,
    })
}
