//! Polynomial trend on raw calendar years

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, Prediction, TrainedForecastModel};
use crate::series::YearlySeries;
use trend_math::Polynomial;

/// Highest degree accepted; beyond this the projection is numerically meaningless.
pub const MAX_DEGREE: usize = 10;

/// Least-squares polynomial of a fixed degree
#[derive(Debug, Clone)]
pub struct PolynomialTrend {
    /// Name of the model
    name: String,
    /// Polynomial degree
    degree: usize,
}

/// Trained polynomial trend
///
/// Extrapolation is the unconstrained polynomial; higher degrees can diverge
/// quickly past the last observation.
#[derive(Debug, Clone)]
pub struct TrainedPolynomialTrend {
    name: String,
    polynomial: Polynomial,
}

impl PolynomialTrend {
    /// Create a new polynomial trend model
    pub fn new(degree: usize) -> Result<Self> {
        if degree > MAX_DEGREE {
            return Err(ForecastError::InvalidParameter(format!(
                "degree must be at most {}, got {}",
                MAX_DEGREE, degree
            )));
        }

        Ok(Self {
            name: format!("Polynomial Trend (degree={})", degree),
            degree,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }
}

impl ForecastModel for PolynomialTrend {
    type Trained = TrainedPolynomialTrend;

    fn train(&self, series: &YearlySeries) -> Result<Self::Trained> {
        let years: Vec<f64> = series.years().into_iter().map(f64::from).collect();
        let polynomial = Polynomial::fit(&years, &series.totals(), self.degree)?;

        Ok(TrainedPolynomialTrend {
            name: self.name.clone(),
            polynomial,
        })
    }

    fn min_points(&self) -> usize {
        self.degree + 1
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedPolynomialTrend {
    pub fn polynomial(&self) -> &Polynomial {
        &self.polynomial
    }
}

impl TrainedForecastModel for TrainedPolynomialTrend {
    fn evaluate(&self, year: i32) -> Result<Prediction> {
        Ok(Prediction::point(self.polynomial.evaluate(f64::from(year))))
    }

    fn descriptor(&self) -> String {
        let (lo, hi) = self.polynomial.domain();
        format!("{} with x = year mapped from [{}, {}] onto [-1, 1]", self.polynomial, lo, hi)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
