//! # Usage Forecasts
//!
//! Umbrella crate for the yearly utility-usage forecasting workspace.
//!
//! - [`trend_math`]: least squares, domain-scaled polynomials, Fourier terms
//!   and fit scores
//! - [`usage_forecast`]: record loading, grouping, fitting strategies,
//!   horizons, scoring and output assembly
//!
//! ## Example
//!
//! ```
//! use usage_forecasts_workspace::usage_forecast::{Algorithm, GroupBy};
//!
//! let parameters = Algorithm::Cubic.default_parameters();
//! assert_eq!(parameters.degree, 3);
//! assert_eq!(parameters.size, 30);
//! assert_eq!(parameters.group_by, GroupBy::Municipal);
//! ```

pub use trend_math;
pub use usage_forecast;

/// Forecast `records` with `algorithm`, starting from its default parameters
///
/// # Examples
///
/// ```
/// use usage_forecasts_workspace::forecast_with_defaults;
/// use usage_forecasts_workspace::usage_forecast::{Algorithm, DataLoader};
///
/// let records = DataLoader::from_json_str(
///     r#"[
///         {"municipal": "100", "usageType": "household", "date": "2020-01-01", "amount": 50.0},
///         {"municipal": "100", "usageType": "household", "date": "2021-01-01", "amount": 60.0}
///     ]"#,
/// )
/// .unwrap();
///
/// let document = forecast_with_defaults(Algorithm::Linear, &records).unwrap();
/// assert_eq!(document.data.len(), 2 + 30);
/// assert_eq!(document.meta["100"].real_data_until, 2021);
/// ```
pub fn forecast_with_defaults(
    algorithm: usage_forecast::Algorithm,
    records: &[usage_forecast::UsageRecord],
) -> usage_forecast::error::Result<usage_forecast::OutputDocument> {
    usage_forecast::run_algorithm(algorithm, &algorithm.default_parameters(), records)
}
