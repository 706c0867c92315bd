//! Risk assessor facade.
//!
//! Validates an [`AssessmentConfig`] against a dataset, runs the pipeline
//! and evaluates the configured thresholds.

use chrono::Utc;

use crate::Result;
use crate::config::AssessmentConfig;
use crate::models::Dataset;

use super::assess;
use super::models::AssessmentReport;
use super::thresholds::evaluate;

/// Assessor for Bayes-vulnerability disclosure risk.
///
/// # Example
///
/// ```rust
/// use bvm_core::{AssessmentConfig, Dataset, RiskAssessor};
/// use serde_json::json;
///
/// let dataset = Dataset::from_rows(
///     "patients",
///     vec![
///         json!({"age": 34, "diagnosis": "flu"}),
///         json!({"age": 34, "diagnosis": "asthma"}),
///     ],
/// )?;
/// let config = AssessmentConfig::new()
///     .with_quasi_identifiers(["age"])
///     .with_sensitive_attributes(["diagnosis"]);
///
/// let report = RiskAssessor::new(config).assess(&dataset)?;
/// assert_eq!(report.result.re_identification.posterior, 0.5);
/// # Ok::<(), bvm_core::BvmError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RiskAssessor {
    config: AssessmentConfig,
}

impl RiskAssessor {
    /// Creates a new assessor with the given configuration.
    pub fn new(config: AssessmentConfig) -> Self {
        Self { config }
    }

    /// Returns a reference to the assessor configuration.
    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Assesses a dataset and returns the full report.
    ///
    /// Configuration problems are returned as
    /// [`BvmError::Configuration`](crate::BvmError::Configuration) before
    /// any computation happens.
    pub fn assess(&self, dataset: &Dataset) -> Result<AssessmentReport> {
        self.config.validate(dataset)?;

        let result = assess(
            dataset,
            &self.config.quasi_identifiers,
            &self.config.sensitive_attributes,
        )?;
        let threshold_violations = evaluate(&result, &self.config.thresholds);

        Ok(AssessmentReport {
            dataset: dataset.name().to_string(),
            records: dataset.len() as u64,
            identifiers: self.config.identifiers.clone(),
            result,
            threshold_violations,
            assessed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BvmError;
    use crate::config::RiskThresholds;
    use serde_json::json;

    fn dataset() -> Dataset {
        Dataset::from_rows(
            "patients",
            vec![
                json!({"id": 1, "age": 34, "zip": "1000", "diagnosis": "flu"}),
                json!({"id": 2, "age": 34, "zip": "1000", "diagnosis": "asthma"}),
                json!({"id": 3, "age": 51, "zip": "1010", "diagnosis": "flu"}),
                json!({"id": 4, "age": 51, "zip": "1010", "diagnosis": "flu"}),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_assessor_creation() {
        let config = AssessmentConfig::new().with_quasi_identifiers(["age"]);
        let assessor = RiskAssessor::new(config.clone());
        assert_eq!(assessor.config(), &config);
    }

    #[test]
    fn test_assessor_full_report() {
        let config = AssessmentConfig::new()
            .with_identifiers(["id"])
            .with_quasi_identifiers(["age", "zip"])
            .with_sensitive_attributes(["diagnosis"]);

        let report = RiskAssessor::new(config).assess(&dataset()).unwrap();

        assert_eq!(report.dataset, "patients");
        assert_eq!(report.records, 4);
        assert_eq!(report.identifiers, vec!["id"]);
        assert_eq!(report.result.re_identification.qid, "['age', 'zip']");
        assert!((report.result.re_identification.posterior - 0.5).abs() < 1e-12);

        let diagnosis = report.result.attribute("diagnosis").unwrap();
        assert!((diagnosis.posterior - 0.75).abs() < 1e-12);
        assert!((diagnosis.prior - 0.75).abs() < 1e-12);
        assert!(!report.has_violations());
    }

    #[test]
    fn test_assessor_rejects_invalid_config_before_running() {
        let config = AssessmentConfig::new().with_quasi_identifiers(["postcode"]);

        let err = RiskAssessor::new(config).assess(&dataset()).unwrap_err();
        assert!(matches!(err, BvmError::Configuration { .. }));
        assert!(err.to_string().contains("postcode"));
    }

    #[test]
    fn test_assessor_reports_violations() {
        let config = AssessmentConfig::new()
            .with_quasi_identifiers(["id"])
            .with_sensitive_attributes(["diagnosis"])
            .with_thresholds(
                RiskThresholds::new()
                    .with_re_identification_max(0.2)
                    .with_attribute_inference_max(0.9),
            );

        let report = RiskAssessor::new(config).assess(&dataset()).unwrap();

        // Unique ids: every record is re-identified and every value inferred
        assert!(report.has_violations());
        assert_eq!(report.threshold_violations.len(), 2);
    }
}
