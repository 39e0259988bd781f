//! Error types for the bubble field.
//!
//! Every variant is a caller bug rather than a transient failure: the core has
//! no I/O, so nothing here is worth retrying. Operations report these instead
//! of letting a NaN or a bad state leak into the next frame.

use std::fmt;

/// Top-level error enum for the bubble simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum BubbleError {
    /// A bubble sprite was requested with a radius below 1.
    InvalidRadius {
        /// The rejected radius.
        radius: u32,
    },

    /// `start()` was called on a field that is already running.
    AlreadyRunning,

    /// `stop()` was called on a field that is not running.
    NotRunning,

    /// The direction of a zero-length vector was requested.
    DivisionByZeroGuard {
        /// Where the conversion was attempted.
        context: &'static str,
    },

    /// A field option is outside its valid range.
    InvalidOptions {
        /// Name of the option.
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the valid range.
        expected: &'static str,
    },

    /// Field options could not be parsed.
    Config(String),
}

impl fmt::Display for BubbleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BubbleError::InvalidRadius { radius } => {
                write!(f, "bubble radius must be at least 1, got {}", radius)
            }
            BubbleError::AlreadyRunning => write!(f, "the field is already running"),
            BubbleError::NotRunning => write!(f, "the field is not running"),
            BubbleError::DivisionByZeroGuard { context } => write!(
                f,
                "direction of a zero-length vector is undefined ({})",
                context
            ),
            BubbleError::InvalidOptions {
                name,
                value,
                expected,
            } => write!(
                f,
                "option '{}' = {} is outside valid range {}",
                name, value, expected
            ),
            BubbleError::Config(msg) => write!(f, "invalid field options: {}", msg),
        }
    }
}

impl std::error::Error for BubbleError {}

impl From<serde_json::Error> for BubbleError {
    fn from(err: serde_json::Error) -> Self {
        BubbleError::Config(err.to_string())
    }
}

/// Convenience alias: a `Result` using `BubbleError` as the error type.
pub type BubbleResult<T> = Result<T, BubbleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            BubbleError::InvalidRadius { radius: 0 }.to_string(),
            "bubble radius must be at least 1, got 0"
        );
        assert_eq!(
            BubbleError::AlreadyRunning.to_string(),
            "the field is already running"
        );
        let err = BubbleError::InvalidOptions {
            name: "density",
            value: -1.0,
            expected: "(0, ∞)",
        };
        assert!(err.to_string().contains("density"));
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(BubbleError::from(err), BubbleError::Config(_)));
    }
}
