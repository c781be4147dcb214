//! Fourier series features for periodic components

use crate::{MathError, Result};
use std::f64::consts::PI;

/// Truncated Fourier basis of a given period and order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierSeries {
    period: f64,
    order: usize,
}

impl FourierSeries {
    /// Create a new Fourier basis; `period` is in the same unit as the time axis
    pub fn new(period: f64, order: usize) -> Result<Self> {
        if !period.is_finite() || period <= 0.0 {
            return Err(MathError::InvalidInput(
                "Fourier period must be positive".to_string(),
            ));
        }

        if order == 0 {
            return Err(MathError::InvalidInput(
                "Fourier order must be at least 1".to_string(),
            ));
        }

        Ok(Self { period, order })
    }

    /// Number of features produced per time point
    pub fn width(&self) -> usize {
        2 * self.order
    }

    /// `[sin(2π·1·t/P), cos(2π·1·t/P), …, sin(2π·N·t/P), cos(2π·N·t/P)]`
    pub fn features(&self, t: f64) -> Vec<f64> {
        (1..=self.order)
            .flat_map(|k| {
                let angle = 2.0 * PI * k as f64 * t / self.period;
                [angle.sin(), angle.cos()]
            })
            .collect()
    }

    pub fn order(&self) -> usize {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_layout() {
        let series = FourierSeries::new(4.0, 2).unwrap();
        let features = series.features(1.0);

        assert_eq!(features.len(), series.width());
        assert!((features[0] - 1.0).abs() < 1e-12); // sin(π/2)
        assert!(features[1].abs() < 1e-12); // cos(π/2)
        assert!(features[2].abs() < 1e-12); // sin(π)
        assert!((features[3] + 1.0).abs() < 1e-12); // cos(π)
    }

    #[test]
    fn test_invalid_basis() {
        assert!(FourierSeries::new(0.0, 3).is_err());
        assert!(FourierSeries::new(7.0, 0).is_err());
    }
}
