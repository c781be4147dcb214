//! # Trend Math
//!
//! Numeric building blocks for fitting yearly trend curves.
//! This crate provides least-squares solvers, domain-scaled polynomials,
//! Fourier seasonality features and goodness-of-fit scores.

use thiserror::Error;

pub mod fourier;
pub mod least_squares;
pub mod polynomial;
pub mod regression;

pub use crate::fourier::FourierSeries;
pub use crate::polynomial::Polynomial;

/// Errors that can occur in trend-fitting calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for trend math operations
pub type Result<T> = std::result::Result<T, MathError>;
