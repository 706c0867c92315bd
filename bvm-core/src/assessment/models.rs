//! Assessment result models.
//!
//! Result rows carry aggregate probabilities and bucket fractions only,
//! never record values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BvmError, Result};

use super::histogram::RiskDistribution;

/// Renders a quasi-identifier list the way result tables label it,
/// e.g. `['age', 'zip']`.
pub fn quasi_identifier_label(quasi_identifiers: &[String]) -> String {
    let quoted: Vec<String> = quasi_identifiers
        .iter()
        .map(|column| format!("'{}'", column))
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Re-identification risk under one quasi-identifier set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReIdentificationRisk {
    /// Quasi-identifier label
    pub qid: String,
    /// Distinct risk (dCR): fraction of records alone in their class
    pub dcr: f64,
    /// Posterior numerator (pCR): number of equivalence classes
    pub pcr: u64,
    /// Uniform-guess baseline, 1/N
    pub prior: f64,
    /// Expected attacker success, pCR/N
    pub posterior: f64,
    /// Records per re-identification percentage
    pub histogram: RiskDistribution,
}

/// Attribute-inference risk for one sensitive attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeInferenceRisk {
    /// Quasi-identifier label
    pub qid: String,
    /// Sensitive attribute name
    pub sensitive: String,
    /// Distinct risk (dCA): fraction of records in single-valued classes
    pub dca: f64,
    /// Posterior multiplicative leakage (pCA): modal hits over the global mode count
    pub pca: f64,
    /// Most-common-value baseline, M/N
    pub prior: f64,
    /// Expected attacker success, pCA*M/N
    pub posterior: f64,
    /// Records per inference percentage
    pub histogram: RiskDistribution,
}

/// Output of one assessment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Re-identification row
    pub re_identification: ReIdentificationRisk,
    /// One row per sensitive attribute, in configuration order
    pub attribute_inference: Vec<AttributeInferenceRisk>,
}

impl AssessmentResult {
    /// Looks up the attribute-inference row for a sensitive attribute.
    pub fn attribute(&self, sensitive: &str) -> Option<&AttributeInferenceRisk> {
        self.attribute_inference
            .iter()
            .find(|row| row.sensitive == sensitive)
    }
}

/// Severity level for threshold violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    /// Posterior is above the threshold
    Warning,
    /// Posterior is at least halfway from the threshold to certainty
    Critical,
}

/// A risk measure whose posterior exceeds its configured limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdViolation {
    /// `re_identification` or `attribute_inference:<column>`
    pub measure: String,
    /// The configured threshold value
    pub threshold: f64,
    /// The measured posterior
    pub actual: f64,
    /// Severity of the violation
    pub severity: ViolationSeverity,
}

impl ThresholdViolation {
    /// Creates a new threshold violation.
    ///
    /// # Severity Classification
    /// - Critical: actual is at or above the midpoint between threshold and 1.0
    /// - Warning: actual is above the threshold but below that midpoint
    pub fn new(measure: impl Into<String>, threshold: f64, actual: f64) -> Self {
        let critical_from = threshold + (1.0 - threshold) / 2.0;
        let severity = if actual >= critical_from {
            ViolationSeverity::Critical
        } else {
            ViolationSeverity::Warning
        };

        Self {
            measure: measure.into(),
            threshold,
            actual,
            severity,
        }
    }
}

/// Full report produced by [`RiskAssessor`](super::RiskAssessor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Dataset name
    pub dataset: String,
    /// Number of records assessed
    pub records: u64,
    /// Direct identifiers declared for the dataset
    pub identifiers: Vec<String>,
    /// Risk rows
    pub result: AssessmentResult,
    /// Measures above their thresholds
    pub threshold_violations: Vec<ThresholdViolation>,
    /// Timestamp when the assessment was performed
    pub assessed_at: DateTime<Utc>,
}

impl AssessmentReport {
    /// Returns true if any measure exceeded its threshold.
    pub fn has_violations(&self) -> bool {
        !self.threshold_violations.is_empty()
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BvmError::serialization("serializing assessment report", e))
    }
}
