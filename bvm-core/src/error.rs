//! Error types for disclosure-risk assessment.
//!
//! Configuration problems are reported before the pipeline runs. Internal
//! consistency violations detected during a scan abort the assessment and
//! are surfaced as [`BvmError::Internal`]; they are never corrected silently.

use thiserror::Error;

use crate::config::ConfigValidationError;

/// Main error type for BVM operations.
#[derive(Debug, Error)]
pub enum BvmError {
    /// Column-role selection or threshold configuration is invalid
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Input rows could not be interpreted as a table
    #[error("Invalid dataset: {message}")]
    Dataset { message: String },

    /// Bookkeeping invariant broken during the scan (a defect, not bad input)
    #[error("Internal consistency violation: {context}")]
    Internal { context: String },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with BvmError
pub type Result<T> = std::result::Result<T, BvmError>;

impl BvmError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a dataset error
    pub fn dataset(message: impl Into<String>) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    /// Creates an internal consistency error and logs it.
    ///
    /// Every internal violation goes through here so it is recorded at
    /// ERROR level even when the caller discards the result.
    pub fn internal(context: impl Into<String>) -> Self {
        let context = context.into();
        tracing::error!("Internal consistency violation: {}", context);
        Self::Internal { context }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Returns true for errors that indicate a defect rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

impl From<ConfigValidationError> for BvmError {
    fn from(error: ConfigValidationError) -> Self {
        Self::configuration(error.to_string())
    }
}
