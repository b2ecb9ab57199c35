//! Error types for the estimation engine

use thiserror::Error;

/// Why an estimate could not be produced.
///
/// Every variant means "insufficient or unusable data"; none of them is a
/// crash. The `Option` forms of the engine operations collapse all of them
/// to `None`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EstimateError {
    #[error("No usable samples")]
    NoData,

    #[error("Length mismatch: {distances} distances for {values} values")]
    LengthMismatch { distances: usize, values: usize },

    #[error("Sample {index} has a distance but no value")]
    MissingValue { index: usize },

    #[error("Sample {index} has an invalid distance {distance}")]
    InvalidDistance { index: usize, distance: f64 },

    #[error("Sample {key} is missing its {field}")]
    IncompleteSample { key: String, field: &'static str },
}
