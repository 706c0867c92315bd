//! Threshold evaluation over assessment results.

use crate::config::RiskThresholds;

use super::models::{AssessmentResult, ThresholdViolation};

/// Measure name used for the re-identification row.
pub const RE_IDENTIFICATION: &str = "re_identification";

/// Lists every measure whose posterior exceeds its configured limit.
pub fn evaluate(result: &AssessmentResult, thresholds: &RiskThresholds) -> Vec<ThresholdViolation> {
    let mut violations = Vec::new();

    let re_id = &result.re_identification;
    if re_id.posterior > thresholds.re_identification_max {
        violations.push(ThresholdViolation::new(
            RE_IDENTIFICATION,
            thresholds.re_identification_max,
            re_id.posterior,
        ));
    }

    for row in &result.attribute_inference {
        if row.posterior > thresholds.attribute_inference_max {
            violations.push(ThresholdViolation::new(
                format!("attribute_inference:{}", row.sensitive),
                thresholds.attribute_inference_max,
                row.posterior,
            ));
        }
    }

    for violation in &violations {
        tracing::warn!(
            "{} posterior {:.4} exceeds threshold {:.4} for {}",
            violation.measure,
            violation.actual,
            violation.threshold,
            re_id.qid
        );
    }

    violations
}
