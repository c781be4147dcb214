//! Goodness-of-fit scoring

use crate::error::{ForecastError, Result};
use crate::models::{ForecastResult, TrainedForecastModel};
use crate::series::YearlySeries;
use trend_math::regression::{r_squared, root_mean_squared_error};
use trend_math::MathError;

/// R² of `fitted` against the observed totals of `series`
///
/// `fitted` holds the evaluations at the horizon's reference years, one per
/// observation. Returns `None` when the score is undefined (a single point).
pub fn fit_score(series: &YearlySeries, fitted: &ForecastResult) -> Result<Option<f64>> {
    if fitted.len() != series.len() {
        return Err(ForecastError::ValidationError(format!(
            "Fitted values length ({}) doesn't match series length ({})",
            fitted.len(),
            series.len()
        )));
    }

    match r_squared(&series.totals(), &fitted.values()) {
        Ok(score) => Ok(Some(score)),
        Err(MathError::InsufficientData(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Summary of how well a trained model reproduces its history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitMetrics {
    /// Coefficient of determination, `None` for a single point
    pub r_squared: Option<f64>,
    /// Root mean squared error in amount units
    pub rmse: f64,
}

/// Evaluate a trained model on the observed years themselves
pub fn evaluate_fit<T: TrainedForecastModel>(
    model: &T,
    series: &YearlySeries,
) -> Result<FitMetrics> {
    let fitted = model.predict(&series.years())?;
    let rmse = root_mean_squared_error(&series.totals(), &fitted.values())?;

    Ok(FitMetrics {
        r_squared: fit_score(series, &fitted)?,
        rmse,
    })
}
