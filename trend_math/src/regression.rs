//! Goodness-of-fit scores for fitted values against observations

use crate::{MathError, Result};

fn check_pair(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() {
        return Err(MathError::InvalidInput(format!(
            "Actual length ({}) doesn't match predicted length ({})",
            actual.len(),
            predicted.len()
        )));
    }

    if actual.is_empty() {
        return Err(MathError::InsufficientData(
            "No values to compare".to_string(),
        ));
    }

    Ok(())
}

/// Residual sum of squares
pub fn residual_sum_of_squares(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    Ok(actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum())
}

/// Coefficient of determination (R²)
///
/// A constant series has no variance to explain: the score is 1.0 when the
/// prediction matches it exactly and 0.0 otherwise. Fewer than two points
/// leave R² undefined.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;

    if actual.len() < 2 {
        return Err(MathError::InsufficientData(
            "Not enough data to calculate R-squared. Need at least 2 points.".to_string(),
        ));
    }

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_total: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_residual = residual_sum_of_squares(actual, predicted)?;

    if ss_total == 0.0 {
        return Ok(if ss_residual == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_residual / ss_total)
}

/// Root mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    let ss_residual = residual_sum_of_squares(actual, predicted)?;
    Ok((ss_residual / actual.len() as f64).sqrt())
}
