use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::processing::outlier::OutlierSpec;

pub const VERSION: &str = "0.1.0";

/// Where the observations come from and which columns to pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub path: PathBuf,
    pub x_column: String,
    pub y_column: String,
    /// Rows with y below this are fill values and get dropped.
    #[serde(default)]
    pub y_floor: Option<f64>,
}

/// A named x range. A missing bound means the edge of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub name: String,
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
}

impl WindowSpec {
    pub fn new(name: &str, from: Option<f64>, to: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            from,
            to,
        }
    }
}

/// A hand-picked line to score against each window's fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateModel {
    pub label: String,
    pub slope: f64,
    pub intercept: f64,
    /// Defaults to the window's first x, the origin its fit uses.
    #[serde(default)]
    pub x_origin: Option<f64>,
}

/// Parameters of a synthetic outlier experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierConfig {
    pub points: usize,
    pub x_start: f64,
    pub x_step: f64,
    pub slope: f64,
    pub intercept: f64,
    pub spec: OutlierSpec,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            points: 20,
            x_start: 0.0,
            x_step: 1.0,
            slope: 2.0,
            intercept: 1.0,
            spec: OutlierSpec::new(15, 30.0),
        }
    }
}

/// One analysis session, persisted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub data: Option<DataSource>,
    #[serde(default)]
    pub windows: Vec<WindowSpec>,
    #[serde(default)]
    pub candidates: Vec<CandidateModel>,
    /// x values to predict at with each window's fit.
    #[serde(default)]
    pub forecast: Vec<f64>,
    /// y levels to solve for, e.g. the year a concentration is reached.
    #[serde(default)]
    pub targets: Vec<f64>,
    #[serde(default)]
    pub outlier: Option<OutlierConfig>,
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {:?}: {e}", path))?;
        serde_json::from_str(&json).map_err(|e| format!("Failed to parse config {:?}: {e}", path))
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write config {:?}: {e}", path))
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data: Some(DataSource {
                path: PathBuf::from("co2_mm_mlo.csv"),
                x_column: "decimal date".to_string(),
                y_column: "average".to_string(),
                y_floor: Some(0.0),
            }),
            windows: vec![
                WindowSpec::new("full record", None, None),
                WindowSpec::new("early", None, Some(1990.0)),
                WindowSpec::new("recent", Some(1990.0), None),
            ],
            candidates: vec![CandidateModel {
                label: "manual".to_string(),
                slope: 1.5,
                intercept: 315.0,
                x_origin: None,
            }],
            forecast: vec![2030.0, 2050.0],
            targets: vec![450.0],
            outlier: Some(OutlierConfig::default()),
        }
    }
}
