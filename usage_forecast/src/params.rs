//! Forecast parameters and parameter-file overrides
//!
//! Every run starts from an algorithm's compiled-in defaults. An optional JSON
//! object may replace any subset of the keys; a missing or broken override
//! file only produces a warning and the defaults are used unchanged.

use crate::error::{ForecastError, Result};
use crate::models::polynomial::MAX_DEGREE;
use crate::series::GroupBy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Largest forecast size, in years, a run accepts
pub const MAX_SIZE: usize = 1000;

/// Options of the additive trend+seasonality strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonalOptions {
    /// Width of the uncertainty interval, as a probability in (0, 1)
    pub interval_width: f64,
    /// Flexibility of the trend at its changepoints
    pub changepoint_prior_scale: f64,
    /// Share of the history in which changepoints may be placed
    pub changepoint_range: f64,
    pub daily_seasonality: bool,
    pub weekly_seasonality: bool,
    pub yearly_seasonality: bool,
}

impl Default for SeasonalOptions {
    fn default() -> Self {
        Self {
            interval_width: 0.80,
            changepoint_prior_scale: 0.05,
            changepoint_range: 0.8,
            daily_seasonality: false,
            weekly_seasonality: false,
            yearly_seasonality: true,
        }
    }
}

impl SeasonalOptions {
    /// Check the ranges of every numeric option
    pub fn validate(&self) -> Result<()> {
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "interval_width must be between 0 and 1, got {}",
                self.interval_width
            )));
        }

        if !(self.changepoint_prior_scale > 0.0 && self.changepoint_prior_scale.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "changepoint_prior_scale must be positive, got {}",
                self.changepoint_prior_scale
            )));
        }

        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "changepoint_range must be in (0, 1], got {}",
                self.changepoint_range
            )));
        }

        Ok(())
    }
}

/// Resolved parameters of one forecasting run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastParameters {
    /// Number of years to forecast past the last observation
    pub size: usize,
    /// Key used to group the records
    #[serde(rename = "groupBy")]
    pub group_by: GroupBy,
    /// Degree of the polynomial strategies
    pub degree: usize,
    /// Options of the additive-seasonal strategy
    #[serde(flatten)]
    pub seasonal: SeasonalOptions,
}

impl Default for ForecastParameters {
    fn default() -> Self {
        Self {
            size: 30,
            group_by: GroupBy::Municipal,
            degree: 1,
            seasonal: SeasonalOptions::default(),
        }
    }
}

impl ForecastParameters {
    /// Replace every value present in `overrides`, keeping the rest
    pub fn merge(&self, overrides: &ParameterOverrides) -> Self {
        let seasonal = &self.seasonal;
        Self {
            size: overrides.size.unwrap_or(self.size),
            group_by: overrides.group_by.unwrap_or(self.group_by),
            degree: overrides.degree.unwrap_or(self.degree),
            seasonal: SeasonalOptions {
                interval_width: overrides.interval_width.unwrap_or(seasonal.interval_width),
                changepoint_prior_scale: overrides
                    .changepoint_prior_scale
                    .unwrap_or(seasonal.changepoint_prior_scale),
                changepoint_range: overrides
                    .changepoint_range
                    .unwrap_or(seasonal.changepoint_range),
                daily_seasonality: overrides
                    .daily_seasonality
                    .unwrap_or(seasonal.daily_seasonality),
                weekly_seasonality: overrides
                    .weekly_seasonality
                    .unwrap_or(seasonal.weekly_seasonality),
                yearly_seasonality: overrides
                    .yearly_seasonality
                    .unwrap_or(seasonal.yearly_seasonality),
            },
        }
    }

    /// Check that every value is usable by the strategies
    pub fn validate(&self) -> Result<()> {
        if self.size > MAX_SIZE {
            return Err(ForecastError::InvalidParameter(format!(
                "size must be at most {}, got {}",
                MAX_SIZE, self.size
            )));
        }

        if self.degree > MAX_DEGREE {
            return Err(ForecastError::InvalidParameter(format!(
                "degree must be at most {}, got {}",
                MAX_DEGREE, self.degree
            )));
        }

        self.seasonal.validate()
    }
}

/// Values read from a parameter file; absent keys are `None`
///
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParameterOverrides {
    pub size: Option<usize>,
    #[serde(rename = "groupBy")]
    pub group_by: Option<GroupBy>,
    pub degree: Option<usize>,
    pub interval_width: Option<f64>,
    pub changepoint_prior_scale: Option<f64>,
    pub changepoint_range: Option<f64>,
    pub daily_seasonality: Option<bool>,
    pub weekly_seasonality: Option<bool>,
    pub yearly_seasonality: Option<bool>,
}

/// Why a parameter file could not be used
#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("parameter file {} does not exist", .0.display())]
    Missing(PathBuf),

    #[error("unable to read parameter file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parameter file {} is not a valid parameter object: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ParameterOverrides {
    /// Read overrides from a JSON object file
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, OverrideError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                OverrideError::Missing(path.to_path_buf())
            } else {
                OverrideError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        serde_json::from_str(&text).map_err(|source| OverrideError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Merge `defaults` with the overrides in `path`, falling back to `defaults`
///
/// This never fails: an unusable file is reported with a warning.
pub fn resolve_parameters<P: AsRef<Path>>(
    defaults: &ForecastParameters,
    path: P,
) -> ForecastParameters {
    match ParameterOverrides::from_file(path) {
        Ok(overrides) => {
            debug!(?overrides, "applying parameter overrides");
            defaults.merge(&overrides)
        }
        Err(err) => {
            warn!(error = %err, "using default parameters");
            defaults.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_merge_keeps_absent_keys() {
        let defaults = ForecastParameters::default();
        let overrides = ParameterOverrides {
            size: Some(10),
            yearly_seasonality: Some(false),
            ..Default::default()
        };

        let merged = defaults.merge(&overrides);
        assert_eq!(merged.size, 10);
        assert!(!merged.seasonal.yearly_seasonality);
        assert_eq!(merged.group_by, defaults.group_by);
        assert_eq!(merged.seasonal.interval_width, defaults.seasonal.interval_width);
    }

    #[test]
    fn test_override_error_kinds() {
        let missing = ParameterOverrides::from_file("/nonexistent/parameters.json");
        assert!(matches!(missing, Err(OverrideError::Missing(_))));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let malformed = ParameterOverrides::from_file(file.path());
        assert!(matches!(malformed, Err(OverrideError::Malformed { .. })));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let overrides: ParameterOverrides =
            serde_json::from_str(r#"{"groupBy": "usageType", "colour": "blue"}"#).unwrap();
        assert_eq!(overrides.group_by, Some(GroupBy::UsageType));
        assert_eq!(overrides.size, None);
    }

    #[test]
    fn test_validate() {
        let mut parameters = ForecastParameters::default();
        assert!(parameters.validate().is_ok());

        parameters.seasonal.interval_width = 1.0;
        assert!(matches!(
            parameters.validate(),
            Err(ForecastError::InvalidParameter(_))
        ));

        parameters.seasonal.interval_width = 0.9;
        parameters.seasonal.changepoint_range = 0.0;
        assert!(parameters.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_size_and_degree() {
        let mut parameters = ForecastParameters {
            size: MAX_SIZE,
            degree: MAX_DEGREE,
            ..Default::default()
        };
        assert!(parameters.validate().is_ok());

        parameters.size = MAX_SIZE + 1;
        match parameters.validate() {
            Err(ForecastError::InvalidParameter(message)) => assert!(message.contains("size")),
            other => panic!("expected invalid size, got {:?}", other),
        }

        parameters.size = 10;
        parameters.degree = MAX_DEGREE + 1;
        match parameters.validate() {
            Err(ForecastError::InvalidParameter(message)) => assert!(message.contains("degree")),
            other => panic!("expected invalid degree, got {:?}", other),
        }
    }

    #[test]
    fn test_huge_size_from_file_is_kept_for_validation() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"size": 18446744073709551615}}"#).unwrap();

        let resolved = resolve_parameters(&ForecastParameters::default(), file.path());
        assert_eq!(resolved.size, usize::MAX);
        assert!(matches!(
            resolved.validate(),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
}
