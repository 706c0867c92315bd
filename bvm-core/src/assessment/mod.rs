//! Bayes-vulnerability risk assessment.
//!
//! This module computes, for one quasi-identifier set:
//! - **Re-identification risk**: how likely an attacker observing the
//!   quasi-identifiers singles out a record (distinct dCR, posterior pCR)
//! - **Attribute-inference risk**: per sensitive attribute, how likely the
//!   attacker guesses its value (distinct dCA, posterior pCA)
//! - **Histograms**: the share of records at each risk percentage
//!
//! The pipeline is a stable sort on the quasi-identifiers followed by one
//! streaming pass that folds each equivalence class into running sums.
//!
//! # Example
//! ```rust
//! use bvm_core::{Dataset, assessment::assess};
//! use serde_json::json;
//!
//! let dataset = Dataset::from_rows(
//!     "survey",
//!     vec![
//!         json!({"zip": "A", "disease": "x"}),
//!         json!({"zip": "A", "disease": "y"}),
//!         json!({"zip": "B", "disease": "x"}),
//!         json!({"zip": "B", "disease": "x"}),
//!     ],
//! )?;
//!
//! let result = assess(&dataset, &["zip".to_string()], &["disease".to_string()])?;
//! assert_eq!(result.re_identification.pcr, 2);
//! assert_eq!(result.attribute_inference[0].pca, 1.0);
//! # Ok::<(), bvm_core::BvmError>(())
//! ```

mod aggregator;
mod assessor;
mod histogram;
mod models;
mod scanner;
mod thresholds;

use crate::error::{BvmError, Result};
use crate::models::Dataset;

// Re-export public API
pub use aggregator::{FrequencyTable, RiskAggregator, global_mode_count};
pub use assessor::RiskAssessor;
pub use histogram::{BUCKETS, RiskDistribution, RiskHistogram, bucket_for};
pub use models::{
    AssessmentReport, AssessmentResult, AttributeInferenceRisk, ReIdentificationRisk,
    ThresholdViolation, ViolationSeverity, quasi_identifier_label,
};
pub use scanner::{class_sizes, scan, sort_by_quasi_identifiers};
pub use thresholds::{RE_IDENTIFICATION, evaluate};

/// Computes re-identification and attribute-inference risk.
///
/// Expects a non-empty dataset and validated column names (see
/// [`AssessmentConfig::validate`](crate::AssessmentConfig::validate)).
/// Each call owns fresh aggregates, so repeated calls on the same input
/// return identical rows.
pub fn assess(
    dataset: &Dataset,
    quasi_identifiers: &[String],
    sensitive_attributes: &[String],
) -> Result<AssessmentResult> {
    if dataset.is_empty() {
        return Err(BvmError::dataset("cannot assess an empty dataset"));
    }
    if quasi_identifiers.is_empty() {
        return Err(BvmError::configuration(
            "one or more quasi-identifiers must be assigned",
        ));
    }

    let mut aggregator = RiskAggregator::new(sensitive_attributes);
    scan(dataset, quasi_identifiers, sensitive_attributes, &mut aggregator)?;
    let result = aggregator.finalize(dataset, quasi_identifiers)?;

    tracing::debug!(
        "Assessed '{}' on {}: {} records in {} equivalence classes, {} sensitive attributes",
        dataset.name(),
        result.re_identification.qid,
        dataset.len(),
        aggregator.classes(),
        sensitive_attributes.len()
    );

    Ok(result)
}
