//! Log-linear trend: a straight line in `ln(year)`

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, Prediction, TrainedForecastModel};
use crate::series::YearlySeries;
use trend_math::Polynomial;

/// `amount = a + b·ln(year)`, fitted by least squares
#[derive(Debug, Clone)]
pub struct LogarithmicTrend {
    name: String,
}

/// Trained logarithmic trend
#[derive(Debug, Clone)]
pub struct TrainedLogarithmicTrend {
    name: String,
    polynomial: Polynomial,
}

impl LogarithmicTrend {
    pub fn new() -> Self {
        Self {
            name: "Logarithmic Trend".to_string(),
        }
    }
}

impl Default for LogarithmicTrend {
    fn default() -> Self {
        Self::new()
    }
}

fn log_year(year: i32) -> Result<f64> {
    if year <= 0 {
        return Err(ForecastError::DomainError(format!(
            "natural log is undefined for year {}",
            year
        )));
    }

    Ok(f64::from(year).ln())
}

impl ForecastModel for LogarithmicTrend {
    type Trained = TrainedLogarithmicTrend;

    fn train(&self, series: &YearlySeries) -> Result<Self::Trained> {
        let x = series
            .years()
            .into_iter()
            .map(log_year)
            .collect::<Result<Vec<f64>>>()?;
        let polynomial = Polynomial::fit(&x, &series.totals(), 1)?;

        Ok(TrainedLogarithmicTrend {
            name: self.name.clone(),
            polynomial,
        })
    }

    fn min_points(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedLogarithmicTrend {
    fn evaluate(&self, year: i32) -> Result<Prediction> {
        Ok(Prediction::point(self.polynomial.evaluate(log_year(year)?)))
    }

    fn descriptor(&self) -> String {
        let (lo, hi) = self.polynomial.domain();
        format!(
            "{} with x = ln(year) mapped from [{:.6}, {:.6}] onto [-1, 1]",
            self.polynomial, lo, hi
        )
    }

    fn name(&self) -> &str {
        &self.name
    }
}
