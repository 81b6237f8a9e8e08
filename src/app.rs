//! The presentation side: runs an [`AnalysisConfig`] against a loaded series
//! and renders the results. Everything numeric is delegated to the pure
//! functions in `processing`; this layer only decides what to ask for, logs,
//! and formats.

use std::fmt::Write;

use anyhow::Context;
use serde::Serialize;

use crate::data::{loader, unit_inference};
use crate::processing::comparison::ModelComparison;
use crate::processing::linear_model::{self, FittedModel, LinearModel};
use crate::processing::outlier::{synthetic_linear, OutlierExperiment};
use crate::processing::statistics::SeriesStats;
use crate::processing::window;
use crate::state::analysis::{AnalysisConfig, WindowSpec, VERSION};
use crate::state::series::Series;

pub const FIT_LABEL: &str = "least squares";

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Crossing {
    pub y: f64,
    /// `None` when the fitted line is flat.
    pub x: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowReport {
    pub name: String,
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub stats: Option<SeriesStats>,
    pub fit: Option<FittedModel>,
    pub fit_misfit: Option<f64>,
    pub comparisons: Vec<ModelComparison>,
    pub forecasts: Vec<Prediction>,
    pub crossings: Vec<Crossing>,
    /// Why the window could not be fitted, if it couldn't.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub version: &'static str,
    pub x_unit: String,
    pub y_unit: String,
    pub windows: Vec<WindowReport>,
    /// The first two fitted windows scored on the whole record, both lines
    /// expressed against the record's first x.
    pub cross_window: Option<ModelComparison>,
    pub outlier: Option<OutlierExperiment>,
}

/// One analysis run: a config plus the series it is run against.
pub struct AnalysisSession {
    pub config: AnalysisConfig,
    pub series: Option<Series>,
}

impl AnalysisSession {
    pub fn new(config: AnalysisConfig, series: Option<Series>) -> Self {
        Self { config, series }
    }

    /// Load the series named by `config.data`, if any.
    pub fn load(config: AnalysisConfig) -> anyhow::Result<Self> {
        let series = match &config.data {
            Some(source) => {
                let data = loader::load_file(&source.path)
                    .with_context(|| format!("loading {:?}", source.path))?;
                let series = loader::series_from_columns(
                    &data,
                    &source.x_column,
                    &source.y_column,
                    source.y_floor,
                )
                .with_context(|| format!("reading columns from {:?}", source.path))?;
                tracing::info!("Series has {} points", series.len());
                Some(series)
            }
            None => None,
        };
        Ok(Self::new(config, series))
    }

    pub fn run(&self) -> anyhow::Result<SessionReport> {
        let (x_unit, y_unit) = match &self.config.data {
            Some(source) => (
                unit_inference::infer_unit(&source.x_column),
                unit_inference::infer_unit(&source.y_column),
            ),
            None => ("units".to_string(), "units".to_string()),
        };

        let windows: Vec<WindowReport> = match &self.series {
            Some(series) => self
                .config
                .windows
                .iter()
                .map(|spec| self.run_window(series, spec))
                .collect(),
            None => Vec::new(),
        };

        let cross_window = match &self.series {
            Some(series) => cross_window_comparison(series, &windows)?,
            None => None,
        };

        let outlier = match &self.config.outlier {
            Some(cfg) => {
                let base = synthetic_linear(cfg.points, cfg.x_start, cfg.x_step, cfg.slope, cfg.intercept);
                let experiment = OutlierExperiment::run(&base, cfg.spec)
                    .context("running outlier experiment")?;
                tracing::info!(
                    "Outlier at index {} (offset {}) shifted slope by {:.4}",
                    cfg.spec.index,
                    cfg.spec.offset,
                    experiment.slope_shift()
                );
                Some(experiment)
            }
            None => None,
        };

        Ok(SessionReport {
            version: VERSION,
            x_unit,
            y_unit,
            windows,
            cross_window,
            outlier,
        })
    }

    fn run_window(&self, series: &Series, spec: &WindowSpec) -> WindowReport {
        let selected = window::select_range(series, spec.from, spec.to);
        tracing::debug!("Window '{}' selected {} points", spec.name, selected.len());

        let mut report = WindowReport {
            name: spec.name.clone(),
            from: spec.from,
            to: spec.to,
            stats: SeriesStats::compute(&selected),
            fit: None,
            fit_misfit: None,
            comparisons: Vec::new(),
            forecasts: Vec::new(),
            crossings: Vec::new(),
            error: None,
        };

        let fitted = match linear_model::fit(&selected) {
            Ok(fitted) => fitted,
            Err(e) => {
                tracing::warn!("Window '{}' not fitted: {e}", spec.name);
                report.error = Some(e.to_string());
                return report;
            }
        };

        report.fit = Some(fitted);
        report.fit_misfit = linear_model::misfit(&selected, &fitted.model, fitted.x_origin).ok();

        for candidate in &self.config.candidates {
            let manual = FittedModel::new(
                LinearModel::new(candidate.slope, candidate.intercept),
                candidate.x_origin.unwrap_or(fitted.x_origin),
            );
            match ModelComparison::compare(&selected, (FIT_LABEL, fitted), (candidate.label.as_str(), manual)) {
                Ok(comparison) => report.comparisons.push(comparison),
                Err(e) => tracing::warn!("Comparison with '{}' failed: {e}", candidate.label),
            }
        }

        let predicted = linear_model::evaluate_many(&fitted.model, fitted.x_origin, &self.config.forecast);
        report.forecasts = self
            .config
            .forecast
            .iter()
            .zip(predicted)
            .map(|(&x, y)| Prediction { x, y })
            .collect();

        report.crossings = self
            .config
            .targets
            .iter()
            .map(|&y| Crossing { y, x: fitted.solve_for(y) })
            .collect();

        report
    }
}

fn cross_window_comparison(
    series: &Series,
    windows: &[WindowReport],
) -> anyhow::Result<Option<ModelComparison>> {
    let mut fitted = windows.iter().filter_map(|w| w.fit.map(|f| (w.name.as_str(), f)));
    let (Some(first), Some(second)) = (fitted.next(), fitted.next()) else {
        return Ok(None);
    };
    let Some((origin, _)) = series.x_range() else {
        return Ok(None);
    };
    let comparison = ModelComparison::compare(series, first, second)
        .context("scoring window fits on the full record")?;
    Ok(Some(comparison.aligned_to(origin)))
}

/// Human-readable rendering of a report.
pub fn render_text(report: &SessionReport) -> String {
    let mut out = String::new();
    let (xu, yu) = (&report.x_unit, &report.y_unit);

    for w in &report.windows {
        let _ = writeln!(out, "== Window '{}' [{} .. {}]", w.name, bound(w.from), bound(w.to));
        if let Some(stats) = &w.stats {
            out.push_str(&stats.report("Observations"));
        }
        if let Some(err) = &w.error {
            let _ = writeln!(out, "  Not fitted: {err}");
            continue;
        }
        if let (Some(fit), Some(misfit)) = (w.fit, w.fit_misfit) {
            let _ = writeln!(
                out,
                "  Fit: y = {:.4} {yu}/{xu} * (x - {:.3}) + {:.3} {yu}  (misfit {:.4})",
                fit.slope(),
                fit.x_origin,
                fit.intercept(),
                misfit
            );
        }
        for c in &w.comparisons {
            let _ = writeln!(out, "  Compared on {} points:", c.points);
            for m in [&c.first, &c.second] {
                let _ = writeln!(
                    out,
                    "    {:<16} slope {:>9.4}  intercept {:>10.3} @ {:.3}  misfit {:.4}",
                    m.label,
                    m.fitted.slope(),
                    m.fitted.intercept(),
                    m.fitted.x_origin,
                    m.misfit
                );
            }
            let _ = writeln!(out, "    Lower misfit: {}", c.best().label);
        }
        for p in &w.forecasts {
            let _ = writeln!(out, "  Predicted at {:.2} {xu}: {:.3} {yu}", p.x, p.y);
        }
        for c in &w.crossings {
            match c.x {
                Some(x) => {
                    let _ = writeln!(out, "  Reaches {:.2} {yu} at {:.2} {xu}", c.y, x);
                }
                None => {
                    let _ = writeln!(out, "  Never reaches {:.2} {yu} (flat fit)", c.y);
                }
            }
        }
    }

    if let Some(c) = &report.cross_window {
        let _ = writeln!(
            out,
            "== Window fits on the full record ({} points), origin {:.3}",
            c.points, c.first.fitted.x_origin
        );
        for m in [&c.first, &c.second] {
            let _ = writeln!(
                out,
                "  {:<16} slope {:>9.4}  intercept {:>10.3}  misfit {:.4}",
                m.label,
                m.fitted.slope(),
                m.fitted.intercept(),
                m.misfit
            );
        }
    }

    if let Some(e) = &report.outlier {
        let _ = writeln!(
            out,
            "== Outlier experiment: index {}, offset {}",
            e.spec.index, e.spec.offset
        );
        let _ = writeln!(
            out,
            "  Clean fit:     slope {:.4} intercept {:.4} misfit {:.4}",
            e.clean_fit.slope(),
            e.clean_fit.intercept(),
            e.clean_misfit
        );
        let _ = writeln!(
            out,
            "  Perturbed fit: slope {:.4} intercept {:.4} misfit {:.4}",
            e.perturbed_fit.slope(),
            e.perturbed_fit.intercept(),
            e.perturbed_misfit
        );
        let _ = writeln!(
            out,
            "  Clean line on perturbed data: misfit {:.4}; slope shift {:+.4}",
            e.clean_fit_on_perturbed,
            e.slope_shift()
        );
    }

    out
}

fn bound(b: Option<f64>) -> String {
    b.map(|v| format!("{v}")).unwrap_or_else(|| "*".to_string())
}
