//! Polynomial least-squares fitting
//!
//! The abscissa is mapped from its observed domain onto `[-1, 1]` before
//! solving. The stored coefficients belong to that scaled variable and
//! [`Polynomial::evaluate`] applies the same mapping.

use crate::least_squares::{design_matrix, solve_least_squares};
use crate::{MathError, Result};
use num_traits::Float;
use serde::Serialize;
use std::fmt;

/// Evaluate a power series with Horner's scheme, lowest order first
pub fn horner<T: Float>(coefficients: &[T], x: T) -> T {
    coefficients
        .iter()
        .rev()
        .fold(T::zero(), |acc, &c| acc * x + c)
}

/// A fitted polynomial over a scaled domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polynomial {
    /// Coefficients of the scaled variable, lowest order first
    coefficients: Vec<f64>,
    /// Observed `(min, max)` of the abscissa
    domain: (f64, f64),
}

impl Polynomial {
    /// Fit a polynomial of `degree` to `(x, y)` pairs by least squares
    pub fn fit(x: &[f64], y: &[f64], degree: usize) -> Result<Self> {
        if x.len() != y.len() {
            return Err(MathError::InvalidInput(format!(
                "x has {} values but y has {}",
                x.len(),
                y.len()
            )));
        }

        if x.len() < degree + 1 {
            return Err(MathError::InsufficientData(format!(
                "A degree {} polynomial needs at least {} points, got {}",
                degree,
                degree + 1,
                x.len()
            )));
        }

        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Polynomial fit input contains non-finite values".to_string(),
            ));
        }

        let domain = x.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

        let rows: Vec<Vec<f64>> = x
            .iter()
            .map(|&v| {
                let t = map_to_window(v, domain);
                (0..=degree).map(|power| t.powi(power as i32)).collect()
            })
            .collect();

        let design = design_matrix(&rows)?;
        let coefficients = solve_least_squares(&design, y)?;

        Ok(Self {
            coefficients,
            domain,
        })
    }

    /// Evaluate the polynomial at an unscaled abscissa
    pub fn evaluate(&self, x: f64) -> f64 {
        horner(&self.coefficients, map_to_window(x, self.domain))
    }

    /// Coefficients of the scaled variable, lowest order first
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Degree of the polynomial
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Observed `(min, max)` domain that maps onto `[-1, 1]`
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

/// Affine map of `[lo, hi]` onto `[-1, 1]`; a degenerate domain maps to 0.
fn map_to_window(x: f64, (lo, hi): (f64, f64)) -> f64 {
    let span = hi - lo;
    if span == 0.0 {
        0.0
    } else {
        (2.0 * x - (lo + hi)) / span
    }
}

fn superscript(power: usize) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    power
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10).map(|d| DIGITS[d as usize]))
        .collect()
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (power, &c) in self.coefficients.iter().enumerate() {
            if power == 0 {
                write!(f, "{:?}", c)?;
            } else {
                let sign = if c.is_sign_negative() { '-' } else { '+' };
                write!(f, " {} {:?}·x", sign, c.abs())?;
                if power > 1 {
                    write!(f, "{}", superscript(power))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    #[test]
    fn test_horner() {
        // 1 + 2x + 3x² at x = 2
        assert_approx_eq!(horner(&[1.0, 2.0, 3.0], 2.0), 17.0);
        assert_eq!(horner::<f64>(&[], 2.0), 0.0);
    }

    #[test]
    fn test_linear_fit_on_calendar_years() {
        let x = [2020.0, 2021.0, 2022.0];
        let y = [50.0, 60.0, 70.0];
        let poly = Polynomial::fit(&x, &y, 1).unwrap();

        assert_eq!(poly.degree(), 1);
        assert_eq!(poly.domain(), (2020.0, 2022.0));
        // Scaled variable: 60 + 10·x
        assert_approx_eq!(poly.coefficients()[0], 60.0, 1e-9);
        assert_approx_eq!(poly.coefficients()[1], 10.0, 1e-9);
        assert_approx_eq!(poly.evaluate(2024.0), 90.0, 1e-9);
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    fn test_recovers_exact_polynomial(#[case] degree: usize) {
        let x: Vec<f64> = (2000..2012).map(f64::from).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|v| {
                let d = v - 2000.0;
                5.0 + 0.5 * d - 0.25 * d * d + if degree == 3 { 0.01 * d * d * d } else { 0.0 }
            })
            .collect();

        let poly = Polynomial::fit(&x, &y, degree).unwrap();
        for (xi, yi) in x.iter().zip(&y) {
            assert_approx_eq!(poly.evaluate(*xi), *yi, 1e-6);
        }
    }

    #[test]
    fn test_too_few_points() {
        let result = Polynomial::fit(&[2020.0, 2021.0], &[1.0, 2.0], 3);
        assert!(matches!(result, Err(MathError::InsufficientData(_))));
    }

    #[test]
    fn test_repeated_abscissa_is_singular() {
        let result = Polynomial::fit(&[2020.0, 2020.0, 2020.0], &[1.0, 2.0, 3.0], 1);
        assert!(matches!(result, Err(MathError::CalculationError(_))));
    }

    #[test]
    fn test_constant_fit_on_single_point() {
        let poly = Polynomial::fit(&[2020.0], &[42.0], 0).unwrap();
        assert_approx_eq!(poly.evaluate(2050.0), 42.0, 1e-12);
    }

    #[test]
    fn test_display() {
        let poly = Polynomial {
            coefficients: vec![60.0, -10.0, 2.5, 1.0],
            domain: (2020.0, 2022.0),
        };
        assert_eq!(poly.to_string(), "60.0 - 10.0·x + 2.5·x² + 1.0·x³");
    }
}
