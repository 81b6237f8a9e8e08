//! Linear trend fitting for time-series records.
//!
//! The numeric core lives in [`processing`] and works on owned
//! [`state::series::Series`] values: windowing, least squares fitting,
//! evaluation, misfit scoring, outlier injection and model comparison. It is
//! pure; loading files ([`data`]) and rendering reports ([`app`]) sit around
//! it and pass everything in as arguments.

pub mod app;
pub mod data;
pub mod errors;
pub mod processing;
pub mod state;

pub use errors::{Result, TrendError};
pub use processing::linear_model::{evaluate, evaluate_many, fit, misfit, residuals, FittedModel, LinearModel};
pub use processing::outlier::{inject, synthetic_linear, OutlierSpec};
pub use processing::window::{select, select_range};
pub use state::series::Series;
