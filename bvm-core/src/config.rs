//! Assessment configuration.
//!
//! Assigns dataset columns to roles (direct identifiers, quasi-identifiers,
//! sensitive attributes) and carries the risk thresholds used when
//! reporting. Validation happens once, here, before the pipeline runs.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Dataset;

/// Role a column plays in an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Directly identifying column (name, national id)
    Identifier,
    /// Column an attacker is assumed to observe
    QuasiIdentifier,
    /// Column whose value an attacker tries to infer
    Sensitive,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnRole::Identifier => "identifier",
            ColumnRole::QuasiIdentifier => "quasi-identifier",
            ColumnRole::Sensitive => "sensitive attribute",
        };
        f.write_str(name)
    }
}

/// Validation errors for assessment configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("the dataset cannot be empty")]
    EmptyDataset,
    #[error("one or more quasi-identifiers must be assigned")]
    MissingQuasiIdentifiers,
    #[error("'{column}' is not an attribute of the dataset (requested as {role})")]
    UnknownColumn { role: ColumnRole, column: String },
    #[error("'{column}' is listed more than once as {role}")]
    DuplicateColumn { role: ColumnRole, column: String },
    #[error("re_identification_max must be between 0.0 and 1.0, got {0}")]
    InvalidReIdentificationThreshold(f64),
    #[error("attribute_inference_max must be between 0.0 and 1.0, got {0}")]
    InvalidAttributeInferenceThreshold(f64),
}

/// Posterior-risk limits above which a measure is reported as a violation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Maximum acceptable re-identification posterior (0.0-1.0)
    pub re_identification_max: f64,
    /// Maximum acceptable attribute-inference posterior (0.0-1.0)
    pub attribute_inference_max: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            re_identification_max: 0.5,
            attribute_inference_max: 0.8,
        }
    }
}

impl RiskThresholds {
    /// Creates thresholds with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the re-identification limit.
    pub fn with_re_identification_max(mut self, threshold: f64) -> Self {
        if !(0.0..=1.0).contains(&threshold) {
            tracing::warn!(
                "re_identification_max {} clamped to valid range [0.0, 1.0]",
                threshold
            );
        }
        self.re_identification_max = threshold.clamp(0.0, 1.0);
        self
    }

    /// Builder method to set the attribute-inference limit.
    pub fn with_attribute_inference_max(mut self, threshold: f64) -> Self {
        if !(0.0..=1.0).contains(&threshold) {
            tracing::warn!(
                "attribute_inference_max {} clamped to valid range [0.0, 1.0]",
                threshold
            );
        }
        self.attribute_inference_max = threshold.clamp(0.0, 1.0);
        self
    }

    /// Returns an error if any threshold is outside [0.0, 1.0].
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.re_identification_max) {
            return Err(ConfigValidationError::InvalidReIdentificationThreshold(
                self.re_identification_max,
            ));
        }
        if !(0.0..=1.0).contains(&self.attribute_inference_max) {
            return Err(ConfigValidationError::InvalidAttributeInferenceThreshold(
                self.attribute_inference_max,
            ));
        }
        Ok(())
    }
}

/// Column-role selection for one assessment.
///
/// Direct identifiers are validated and echoed in reports but never take
/// part in the risk computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
    /// Directly identifying columns
    pub identifiers: Vec<String>,
    /// Ordered quasi-identifier columns; also the sort key
    pub quasi_identifiers: Vec<String>,
    /// Ordered sensitive-attribute columns
    pub sensitive_attributes: Vec<String>,
    /// Reporting thresholds
    pub thresholds: RiskThresholds,
}

fn collect_names<I, S>(columns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    columns.into_iter().map(Into::into).collect()
}

impl AssessmentConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set direct identifiers.
    ///
    /// Accepts a single name (`["id"]`) or any iterator of names.
    pub fn with_identifiers<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifiers = collect_names(columns);
        self
    }

    /// Builder method to set quasi-identifiers.
    pub fn with_quasi_identifiers<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.quasi_identifiers = collect_names(columns);
        self
    }

    /// Builder method to set sensitive attributes.
    pub fn with_sensitive_attributes<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensitive_attributes = collect_names(columns);
        self
    }

    /// Builder method to set reporting thresholds.
    pub fn with_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    fn roles(&self) -> [(ColumnRole, &[String]); 3] {
        [
            (ColumnRole::Identifier, self.identifiers.as_slice()),
            (ColumnRole::QuasiIdentifier, self.quasi_identifiers.as_slice()),
            (ColumnRole::Sensitive, self.sensitive_attributes.as_slice()),
        ]
    }

    /// Validates the configuration against a dataset.
    ///
    /// Checks run in order: dataset non-empty, at least one
    /// quasi-identifier, every named column present and unique within its
    /// role, thresholds in range.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), ConfigValidationError> {
        if dataset.is_empty() {
            return Err(ConfigValidationError::EmptyDataset);
        }
        if self.quasi_identifiers.is_empty() {
            return Err(ConfigValidationError::MissingQuasiIdentifiers);
        }

        for (role, columns) in self.roles() {
            let mut seen: HashSet<&str> = HashSet::new();
            for column in columns {
                if !dataset.has_column(column) {
                    return Err(ConfigValidationError::UnknownColumn {
                        role,
                        column: column.clone(),
                    });
                }
                if !seen.insert(column.as_str()) {
                    return Err(ConfigValidationError::DuplicateColumn {
                        role,
                        column: column.clone(),
                    });
                }
            }
        }

        self.thresholds.validate()
    }
}
