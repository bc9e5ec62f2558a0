//! Error types for trace generation, live execution and the binary
//!
//! - [`ValidationError`] rejects bad input before any snapshot exists.
//! - [`ExecutionFault`] reports an algorithm body that failed mid-run.
//! - [`EngineError`] wraps everything the binary can hit.
//!
//! A cancelled run is not an error; see [`crate::exec::RunOutcome`].

use thiserror::Error;

/// Malformed or out-of-range input, reported per field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Matrix rows differ in length
    #[error("matrix row {row} has {got} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// Range bounds are reversed
    #[error("{field}: left bound {left} is greater than right bound {right}")]
    InvertedRange {
        field: &'static str,
        left: usize,
        right: usize,
    },

    /// Index outside the input
    #[error("{field}: index {index} is out of bounds for length {len}")]
    IndexOutOfBounds {
        field: &'static str,
        index: usize,
        len: usize,
    },

    /// Race needs between two and four participants
    #[error("race: {got} algorithms selected, choose between {min} and {max}")]
    ParticipantCount { got: usize, min: usize, max: usize },

    /// Unknown algorithm or generator name
    #[error("{field}: unknown name '{name}'")]
    UnknownName { field: &'static str, name: String },

    /// Input that is present but unusable
    #[error("{field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

/// An algorithm body failed during a live run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{algorithm} failed at step {step}: {message}")]
pub struct ExecutionFault {
    pub algorithm: String,
    pub step: usize,
    pub message: String,
}

/// Top-level error for the binary
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("execution failed: {0}")]
    Execution(#[from] ExecutionFault),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for trace generators
pub type TraceResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_name_the_field() {
        let err = ValidationError::IndexOutOfBounds {
            field: "update.index",
            index: 9,
            len: 6,
        };
        assert_eq!(
            err.to_string(),
            "update.index: index 9 is out of bounds for length 6"
        );

        let err = ValidationError::RaggedMatrix {
            row: 1,
            expected: 3,
            got: 2,
        };
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_engine_error_wraps_fault() {
        let fault = ExecutionFault {
            algorithm: "bubble".to_string(),
            step: 3,
            message: "boom".to_string(),
        };
        let err: EngineError = fault.into();
        assert_eq!(
            err.to_string(),
            "execution failed: bubble failed at step 3: boom"
        );
    }
}
