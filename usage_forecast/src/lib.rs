//! # Usage Forecast
//!
//! Forecasting pipelines for yearly utility-usage totals.
//!
//! ## Features
//!
//! - Usage records from JSON or CSV, grouped by municipality or usage type
//! - Yearly aggregation into ordered per-group series
//! - Fitting strategies: polynomial, logarithmic and additive trend+seasonality
//! - Evenly spaced forecast horizons with an explicit historical/forecast split
//! - R² fit scores on the historical segment
//! - One JSON document with per-group metadata and data points
//! - Parameter files merged over compiled-in defaults, with fallback on errors
//!
//! ## Quick Start
//!
//! ```no_run
//! use usage_forecast::{resolve_parameters, run_algorithm, Algorithm, DataLoader};
//!
//! # fn main() -> usage_forecast::error::Result<()> {
//! let records = DataLoader::from_path("usage.json")?;
//!
//! let algorithm = Algorithm::Linear;
//! let parameters = resolve_parameters(&algorithm.default_parameters(), "parameters.json");
//!
//! let document = run_algorithm(algorithm, &parameters, &records)?;
//! document.write_to_file("forecast.json", true)?;
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
pub mod data;
pub mod error;
pub mod horizon;
pub mod metrics;
pub mod models;
pub mod output;
pub mod params;
pub mod pipeline;
pub mod series;

// Re-export commonly used types
pub use crate::algorithms::{Algorithm, AlgorithmInformation, ParameterSpec};
pub use crate::data::{DataLoader, UsageRecord};
pub use crate::error::ForecastError;
pub use crate::horizon::Horizon;
pub use crate::models::{ForecastModel, ForecastResult, Prediction, TrainedForecastModel};
pub use crate::output::{GroupResult, OutputDocument};
pub use crate::params::{resolve_parameters, ForecastParameters, ParameterOverrides};
pub use crate::pipeline::{run_algorithm, ForecastPipeline};
pub use crate::series::{aggregate_by_year, GroupBy, YearlySeries};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
