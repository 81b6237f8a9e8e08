use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trendline::app::{render_text, AnalysisSession, SessionReport};
use trendline::processing::outlier::OutlierSpec;
use trendline::state::analysis::{AnalysisConfig, CandidateModel, DataSource, OutlierConfig, WindowSpec};

#[derive(Parser)]
#[command(name = "trendline")]
#[command(about = "Fit and score linear trends in time-series records", long_about = None)]
struct Cli {
    /// Print the report as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a line to one window of a data file
    Fit {
        /// Input file (CSV or Excel)
        #[arg(short, long)]
        input: PathBuf,

        /// Column holding dates or decimal years
        #[arg(long, default_value = "decimal date")]
        x_col: String,

        /// Column holding the measurements
        #[arg(long, default_value = "average")]
        y_col: String,

        /// Drop rows whose value is below this (fill values)
        #[arg(long, allow_negative_numbers = true)]
        y_floor: Option<f64>,

        /// Window start (inclusive), defaults to the first observation
        #[arg(long, allow_negative_numbers = true)]
        from: Option<f64>,

        /// Window end (inclusive), defaults to the last observation
        #[arg(long, allow_negative_numbers = true)]
        to: Option<f64>,

        /// x values to predict at
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        predict: Vec<f64>,

        /// y levels to solve for
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        target: Vec<f64>,

        /// Slope of a hand-picked line to compare against the fit
        #[arg(long, requires = "intercept", allow_negative_numbers = true)]
        slope: Option<f64>,

        /// Intercept of the hand-picked line
        #[arg(long, requires = "slope", allow_negative_numbers = true)]
        intercept: Option<f64>,

        /// Origin of the hand-picked line, defaults to the window start
        #[arg(long, allow_negative_numbers = true)]
        origin: Option<f64>,
    },

    /// Perturb one point of a synthetic line and compare the fits
    Outlier {
        #[arg(long, default_value = "20")]
        points: usize,

        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        x_start: f64,

        #[arg(long, default_value = "1.0", allow_negative_numbers = true)]
        step: f64,

        #[arg(long, default_value = "2.0", allow_negative_numbers = true)]
        slope: f64,

        #[arg(long, default_value = "1.0", allow_negative_numbers = true)]
        intercept: f64,

        /// Index of the perturbed point
        #[arg(long, default_value = "15")]
        index: usize,

        /// Amount added to the perturbed point
        #[arg(long, default_value = "30.0", allow_negative_numbers = true)]
        offset: f64,
    },

    /// Run an analysis described by a JSON config file
    Run {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Write a default analysis config
    Init {
        #[arg(short, long, default_value = "trendline.json")]
        output: PathBuf,
    },
}

impl Commands {
    /// The analysis this command describes. `init` writes a config file
    /// instead and yields `None`.
    fn into_config(self) -> anyhow::Result<Option<AnalysisConfig>> {
        let config = match self {
            Commands::Fit {
                input,
                x_col,
                y_col,
                y_floor,
                from,
                to,
                predict,
                target,
                slope,
                intercept,
                origin,
            } => {
                let candidates = match (slope, intercept) {
                    (Some(slope), Some(intercept)) => vec![CandidateModel {
                        label: "manual".to_string(),
                        slope,
                        intercept,
                        x_origin: origin,
                    }],
                    _ => Vec::new(),
                };
                AnalysisConfig {
                    data: Some(DataSource {
                        path: input,
                        x_column: x_col,
                        y_column: y_col,
                        y_floor,
                    }),
                    windows: vec![WindowSpec::new("selected", from, to)],
                    candidates,
                    forecast: predict,
                    targets: target,
                    outlier: None,
                }
            }
            Commands::Outlier {
                points,
                x_start,
                step,
                slope,
                intercept,
                index,
                offset,
            } => AnalysisConfig {
                data: None,
                windows: Vec::new(),
                candidates: Vec::new(),
                forecast: Vec::new(),
                targets: Vec::new(),
                outlier: Some(OutlierConfig {
                    points,
                    x_start,
                    x_step: step,
                    slope,
                    intercept,
                    spec: OutlierSpec::new(index, offset),
                }),
            },
            Commands::Run { config } => AnalysisConfig::load(&config).map_err(anyhow::Error::msg)?,
            Commands::Init { output } => {
                AnalysisConfig::default()
                    .save(&output)
                    .map_err(anyhow::Error::msg)?;
                tracing::info!("Wrote default config to {:?}", output);
                return Ok(None);
            }
        };
        Ok(Some(config))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    let Some(config) = cli.command.into_config()? else {
        return Ok(());
    };

    let session = AnalysisSession::load(config)?;
    let report = session.run()?;
    print_report(&report, json)
}

fn print_report(report: &SessionReport, json: bool) -> anyhow::Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("serializing report")?;
        println!("{text}");
    } else {
        print!("{}", render_text(report));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(args: &[&str]) -> AnalysisConfig {
        let cli = Cli::try_parse_from(args).unwrap();
        cli.command.into_config().unwrap().unwrap()
    }

    #[test]
    fn test_fit_accepts_negative_numbers() {
        let config = config_from(&[
            "trendline", "fit", "-i", "co2.csv", "--slope", "-1.5", "--intercept", "-3",
            "--origin", "-10", "--y-floor", "-99", "--from", "-20", "--to", "-0.5",
            "--predict", "-1,2.5", "--target", "-4",
        ]);

        let data = config.data.unwrap();
        assert_eq!(data.y_floor, Some(-99.0));
        assert_eq!(config.windows[0].from, Some(-20.0));
        assert_eq!(config.windows[0].to, Some(-0.5));
        assert_eq!(config.candidates[0].slope, -1.5);
        assert_eq!(config.candidates[0].intercept, -3.0);
        assert_eq!(config.candidates[0].x_origin, Some(-10.0));
        assert_eq!(config.forecast, vec![-1.0, 2.5]);
        assert_eq!(config.targets, vec![-4.0]);
    }

    #[test]
    fn test_outlier_accepts_negative_numbers() {
        let config = config_from(&[
            "trendline", "outlier", "--x-start", "-5", "--step", "-0.25", "--slope", "-2",
            "--intercept", "-1", "--offset", "-30",
        ]);

        let outlier = config.outlier.unwrap();
        assert_eq!(outlier.x_start, -5.0);
        assert_eq!(outlier.x_step, -0.25);
        assert_eq!(outlier.slope, -2.0);
        assert_eq!(outlier.intercept, -1.0);
        assert_eq!(outlier.spec.offset, -30.0);
    }

    #[test]
    fn test_fit_without_candidate() {
        let config = config_from(&["trendline", "fit", "-i", "co2.csv"]);
        assert!(config.candidates.is_empty());
        assert_eq!(config.windows[0].from, None);
        assert_eq!(config.data.unwrap().x_column, "decimal date");
    }

    #[test]
    fn test_slope_requires_intercept() {
        assert!(Cli::try_parse_from(["trendline", "fit", "-i", "co2.csv", "--slope", "-1.5"]).is_err());
    }

    #[test]
    fn test_json_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["trendline", "outlier", "--json"]).unwrap();
        assert!(cli.json);
    }
}
