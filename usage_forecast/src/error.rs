//! Error types for the usage_forecast crate

use thiserror::Error;

/// Custom error types for the usage_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to input record validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A group's yearly series is shorter than the fitting strategy needs
    #[error("Insufficient data for group {group}: {required} yearly points required, {actual} available")]
    InsufficientData {
        group: String,
        required: usize,
        actual: usize,
    },

    /// A transform is undefined for an observed or requested value
    #[error("Domain error: {0}")]
    DomainError(String),

    /// Error from a fitting strategy producing unusable numbers
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Error related to internal consistency checks
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An algorithm identifier that is not in the catalogue
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Error raised while forecasting one group
    #[error("Group {group}: {source}")]
    GroupError {
        group: String,
        #[source]
        source: Box<ForecastError>,
    },

    /// Error from the numeric fitting primitives
    #[error("Math error: {0}")]
    MathError(#[from] trend_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON (de)serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl ForecastError {
    /// Attach the offending group to an error raised while forecasting it
    ///
    /// Errors that already name their group are returned unchanged.
    pub fn in_group(self, group: &str) -> Self {
        match self {
            err @ (ForecastError::GroupError { .. }
            | ForecastError::InsufficientData { .. }) => err,
            err => ForecastError::GroupError {
                group: group.to_string(),
                source: Box::new(err),
            },
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
