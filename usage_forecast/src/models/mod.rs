//! Fitting strategies for yearly usage series

use crate::error::{ForecastError, Result};
use crate::series::YearlySeries;
use std::fmt::Debug;

/// A point prediction with its uncertainty interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Prediction {
    /// A prediction without uncertainty (zero-width interval)
    pub fn point(value: f64) -> Self {
        Self {
            value,
            lower: value,
            upper: value,
        }
    }

    /// A prediction with a symmetric interval of `half_width` around `value`
    pub fn with_interval(value: f64, half_width: f64) -> Self {
        Self {
            value,
            lower: value - half_width,
            upper: value + half_width,
        }
    }

    pub fn interval(&self) -> [f64; 2] {
        [self.lower, self.upper]
    }

    pub fn is_finite(&self) -> bool {
        self.value.is_finite() && self.lower.is_finite() && self.upper.is_finite()
    }
}

/// Predictions of a trained model over a sequence of years
#[derive(Debug, Clone)]
pub struct ForecastResult {
    years: Vec<i32>,
    predictions: Vec<Prediction>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(years: Vec<i32>, predictions: Vec<Prediction>) -> Result<Self> {
        if years.len() != predictions.len() {
            return Err(ForecastError::ValidationError(format!(
                "Years length ({}) doesn't match predictions length ({})",
                years.len(),
                predictions.len()
            )));
        }

        Ok(Self { years, predictions })
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    /// Point estimates in year order
    pub fn values(&self) -> Vec<f64> {
        self.predictions.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

/// A fitted model: a pure function from year to prediction
pub trait TrainedForecastModel: Debug {
    /// Predict the amount for one year
    fn evaluate(&self, year: i32) -> Result<Prediction>;

    /// Human-readable description of the fitted curve
    fn descriptor(&self) -> String;

    /// Name of the model
    fn name(&self) -> &str;

    /// Predict every year in `years`
    ///
    /// Fails if any prediction is not finite.
    fn predict(&self, years: &[i32]) -> Result<ForecastResult> {
        let predictions = years
            .iter()
            .map(|&year| {
                let prediction = self.evaluate(year)?;
                if prediction.is_finite() {
                    Ok(prediction)
                } else {
                    Err(ForecastError::NumericalError(format!(
                        "{} produced a non-finite prediction for {}",
                        self.name(),
                        year
                    )))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        ForecastResult::new(years.to_vec(), predictions)
    }
}

/// Forecast model that can be trained on a yearly series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a yearly series
    fn train(&self, series: &YearlySeries) -> Result<Self::Trained>;

    /// Smallest series this model can be trained on
    fn min_points(&self) -> usize;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod logarithmic;
pub mod polynomial;
pub mod seasonal;

pub use self::logarithmic::LogarithmicTrend;
pub use self::polynomial::PolynomialTrend;
pub use self::seasonal::AdditiveSeasonal;
