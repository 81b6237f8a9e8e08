use serde::Serialize;

use crate::state::series::Series;

/// Summary of a window's observations, shown next to each fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    pub count: usize,
    pub x_first: f64,
    pub x_last: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub y_peak_to_peak: f64,
    pub y_mean: f64,
    pub y_median: f64,
    pub y_std_dev: f64,
}

impl SeriesStats {
    /// `None` when the series has no finite y values.
    pub fn compute(series: &Series) -> Option<Self> {
        let mut ys: Vec<f64> = series.y().iter().copied().filter(|v| v.is_finite()).collect();
        if ys.is_empty() {
            return None;
        }
        ys.sort_by(f64::total_cmp);

        let count = ys.len();
        let y_mean = ys.iter().sum::<f64>() / count as f64;
        let y_median = if count % 2 == 0 {
            (ys[count / 2 - 1] + ys[count / 2]) / 2.0
        } else {
            ys[count / 2]
        };
        let variance = ys.iter().map(|v| (v - y_mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            x_first: series.x().first().copied()?,
            x_last: series.x().last().copied()?,
            y_min: ys[0],
            y_max: ys[count - 1],
            y_peak_to_peak: ys[count - 1] - ys[0],
            y_mean,
            y_median,
            y_std_dev: variance.sqrt(),
        })
    }

    pub fn report(&self, label: &str) -> String {
        format!(
            "{label}:\n  Points: {}\n  X span: {:.3} .. {:.3}\n  Y min/max: {:.3} / {:.3}\n  Y peak-to-peak: {:.3}\n  Y mean: {:.3}\n  Y median: {:.3}\n  Y std dev: {:.3}\n",
            self.count, self.x_first, self.x_last, self.y_min, self.y_max, self.y_peak_to_peak, self.y_mean, self.y_median, self.y_std_dev
        )
    }
}
