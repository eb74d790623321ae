//! Error types for biosolar.
//!
//! Every fallible operation returns `Result<T, SimError>`. Generation never
//! returns partial output: the first error aborts the call.

use thiserror::Error;

/// Result type alias for biosolar operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for all biosolar operations.
#[derive(Debug, Error)]
pub enum SimError {
    // ===== Generation Errors =====
    /// Caller supplied an argument the generators cannot work with.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument.
        message: String,
    },

    /// Jidoka guard stopped the line on a generated record.
    #[error("Jidoka: invariant violated on day {day}: {detail}")]
    InvariantViolation {
        /// Zero-based day index of the offending record.
        day: usize,
        /// Description of the violated invariant.
        detail: String,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SimError {
    /// Create an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Check if this error is a Jidoka stop.
    #[must_use]
    pub const fn is_jidoka_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}
