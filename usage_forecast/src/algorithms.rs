//! Catalogue of the forecasting algorithms offered by the binary

use crate::error::ForecastError;
use crate::models::polynomial::MAX_DEGREE;
use crate::params::{ForecastParameters, MAX_SIZE};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A named forecasting pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Straight line through the yearly totals
    Linear,
    /// Third degree polynomial through the yearly totals
    Cubic,
    /// Straight line in `ln(year)`
    Logarithmic,
    /// Piecewise-linear trend with seasonality and uncertainty intervals
    Prophet,
}

/// Describes one key a parameter file may set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub description: String,
    pub default: Value,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enums: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl ParameterSpec {
    fn new(description: &str, default: Value, kind: &str) -> Self {
        Self {
            description: description.to_string(),
            default,
            kind: kind.to_string(),
            enums: None,
            min: None,
            max: None,
        }
    }

    fn bounded(mut self, min: i64, max: Option<i64>) -> Self {
        self.min = Some(min);
        self.max = max;
        self
    }

    fn one_of(mut self, values: &[&str]) -> Self {
        self.enums = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }
}

/// Everything a client needs to choose and configure an algorithm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmInformation {
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub description: String,
    pub identifier: String,
    pub parameter: BTreeMap<String, ParameterSpec>,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Linear,
        Algorithm::Cubic,
        Algorithm::Logarithmic,
        Algorithm::Prophet,
    ];

    pub fn identifier(&self) -> &'static str {
        match self {
            Algorithm::Linear => "linear",
            Algorithm::Cubic => "cubic",
            Algorithm::Logarithmic => "logarithmic",
            Algorithm::Prophet => "prophet",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Algorithm::Linear => "Linear Regression",
            Algorithm::Cubic => "Cubic Regression",
            Algorithm::Logarithmic => "Logarithmic Regression",
            Algorithm::Prophet => "Trend and Seasonality (Prophet-style)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Algorithm::Linear => {
                "Fits a straight line through the yearly usage totals of every group \
                 and extends it over the requested number of years."
            }
            Algorithm::Cubic => {
                "Fits a third degree polynomial through the yearly usage totals of every \
                 group. Follows curved histories closely but can diverge quickly when \
                 extrapolated."
            }
            Algorithm::Logarithmic => {
                "Fits a straight line against the natural logarithm of the year, giving a \
                 trend that flattens over time."
            }
            Algorithm::Prophet => {
                "Decomposes the yearly totals into a piecewise-linear trend with automatic \
                 changepoints and optional yearly, weekly and daily seasonality. Forecasts \
                 carry an uncertainty interval of the configured width."
            }
        }
    }

    /// Compiled-in parameters a run starts from
    pub fn default_parameters(&self) -> ForecastParameters {
        let degree = match self {
            Algorithm::Cubic => 3,
            _ => 1,
        };

        ForecastParameters {
            degree,
            ..ForecastParameters::default()
        }
    }

    /// Keys this algorithm reads from a parameter file
    pub fn parameter_specs(&self) -> BTreeMap<String, ParameterSpec> {
        let defaults = self.default_parameters();
        let mut specs = BTreeMap::new();

        specs.insert(
            "size".to_string(),
            ParameterSpec::new(
                "Number of years forecasted past the last observed year",
                json!(defaults.size),
                "int",
            )
            .bounded(0, Some(MAX_SIZE as i64)),
        );
        specs.insert(
            "groupBy".to_string(),
            ParameterSpec::new(
                "Record attribute the usage data is grouped by before forecasting",
                json!(defaults.group_by.as_str()),
                "str",
            )
            .one_of(&["municipal", "usageType"]),
        );

        match self {
            Algorithm::Linear | Algorithm::Cubic => {
                specs.insert(
                    "degree".to_string(),
                    ParameterSpec::new(
                        "Degree of the fitted polynomial",
                        json!(defaults.degree),
                        "int",
                    )
                    .bounded(0, Some(MAX_DEGREE as i64)),
                );
            }
            Algorithm::Logarithmic => {}
            Algorithm::Prophet => {
                let seasonal = defaults.seasonal;
                let entries = [
                    (
                        "interval_width",
                        "Probability covered by the uncertainty interval of each forecast",
                        json!(seasonal.interval_width),
                        "float",
                    ),
                    (
                        "changepoint_prior_scale",
                        "Flexibility of the trend; larger values allow sharper trend changes",
                        json!(seasonal.changepoint_prior_scale),
                        "float",
                    ),
                    (
                        "changepoint_range",
                        "Share of the history in which trend changepoints are placed",
                        json!(seasonal.changepoint_range),
                        "float",
                    ),
                    (
                        "daily_seasonality",
                        "Fit a daily seasonal component",
                        json!(seasonal.daily_seasonality),
                        "bool",
                    ),
                    (
                        "weekly_seasonality",
                        "Fit a weekly seasonal component",
                        json!(seasonal.weekly_seasonality),
                        "bool",
                    ),
                    (
                        "yearly_seasonality",
                        "Fit a yearly seasonal component",
                        json!(seasonal.yearly_seasonality),
                        "bool",
                    ),
                ];

                for (key, description, default, kind) in entries {
                    specs.insert(key.to_string(), ParameterSpec::new(description, default, kind));
                }
            }
        }

        specs
    }

    /// The default parameter object, as printed by `--parameters`
    pub fn default_parameters_json(&self) -> Value {
        let object: Map<String, Value> = self
            .parameter_specs()
            .into_iter()
            .map(|(key, spec)| (key, spec.default))
            .collect();
        Value::Object(object)
    }

    pub fn information(&self) -> AlgorithmInformation {
        AlgorithmInformation {
            display_name: self.display_name().to_string(),
            description: self.description().to_string(),
            identifier: self.identifier().to_string(),
            parameter: self.parameter_specs(),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Algorithm {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.identifier().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ForecastError::UnknownAlgorithm(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("linear", Algorithm::Linear)]
    #[case("Cubic", Algorithm::Cubic)]
    #[case(" logarithmic ", Algorithm::Logarithmic)]
    #[case("prophet", Algorithm::Prophet)]
    fn test_parse_identifier(#[case] raw: &str, #[case] expected: Algorithm) {
        assert_eq!(raw.parse::<Algorithm>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_identifier() {
        assert!(matches!(
            "arima".parse::<Algorithm>(),
            Err(ForecastError::UnknownAlgorithm(name)) if name == "arima"
        ));
    }

    #[test]
    fn test_default_parameter_objects() {
        assert_eq!(
            Algorithm::Linear.default_parameters_json(),
            json!({"size": 30, "groupBy": "municipal", "degree": 1})
        );
        assert_eq!(Algorithm::Cubic.default_parameters().degree, 3);
        assert_eq!(
            Algorithm::Prophet.default_parameters_json(),
            json!({
                "size": 30,
                "groupBy": "municipal",
                "interval_width": 0.8,
                "changepoint_prior_scale": 0.05,
                "changepoint_range": 0.8,
                "daily_seasonality": false,
                "weekly_seasonality": false,
                "yearly_seasonality": true
            })
        );
    }

    #[test]
    fn test_information_serializes_like_catalogue_entry() {
        let value = serde_json::to_value(Algorithm::Linear.information()).unwrap();
        assert_eq!(value["identifier"], json!("linear"));
        assert_eq!(value["displayName"], json!("Linear Regression"));
        assert_eq!(value["parameter"]["groupBy"]["type"], json!("str"));
        assert_eq!(
            value["parameter"]["groupBy"]["enums"],
            json!(["municipal", "usageType"])
        );
        assert_eq!(value["parameter"]["size"]["max"], json!(MAX_SIZE));
        assert!(value["parameter"]["groupBy"].get("max").is_none());
    }

    #[test]
    fn test_every_default_validates() {
        for algorithm in Algorithm::ALL {
            assert!(algorithm.default_parameters().validate().is_ok(), "{}", algorithm);
        }
    }
}
