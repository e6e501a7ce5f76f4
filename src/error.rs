// src/error.rs

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AllanError>;

/// Errors raised while loading a log or characterizing a channel.
///
/// Every variant is terminal for the channel it was raised on; the
/// multi-channel pipeline keeps going for the others.
#[derive(Error, Debug)]
pub enum AllanError {
    /// Configuration rejected before any computation started.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Non-finite sample in the input signal.
    #[error("Invalid sample at index {index}: {value}")]
    InvalidSample { index: usize, value: f64 },

    /// Too few curve points survived to extract noise parameters.
    #[error("Degenerate deviation curve: {points} point(s), at least 2 required")]
    DegenerateCurve { points: usize },

    /// A curve handed in from outside breaks the tau/deviation invariants.
    #[error("Invalid deviation curve: {0}")]
    InvalidCurve(String),

    /// None of the expected columns were found in the log header.
    #[error("Missing columns: {0}")]
    MissingColumns(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendering failure (plotters errors are not `Send + Sync`, so they are flattened).
    #[error("Plot error: {0}")]
    Plot(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AllanError::InvalidSample {
            index: 12,
            value: f64::NAN,
        };
        assert_eq!(err.to_string(), "Invalid sample at index 12: NaN");

        let err = AllanError::DegenerateCurve { points: 1 };
        assert!(err.to_string().contains("1 point(s)"));
    }
}
