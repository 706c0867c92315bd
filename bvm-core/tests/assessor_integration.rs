//! End-to-end tests for the configuration layer and the assessor facade.
//!
//! This test suite covers:
//! - Column-role configuration loaded from JSON
//! - Validation failures surfacing before the pipeline runs
//! - Threshold violations in the report
//! - Report serialization

use bvm_core::{
    AssessmentConfig, BvmError, ConfigValidationError, Dataset, Result, RiskAssessor,
    RiskThresholds, ViolationSeverity,
};
use serde_json::json;

fn census() -> Result<Dataset> {
    Dataset::from_json(
        "census",
        &json!([
            {"name": "Ann",  "age": 34, "sex": "F", "zip": "1011", "income": "low",  "disease": "flu"},
            {"name": "Bob",  "age": 34, "sex": "M", "zip": "1011", "income": "low",  "disease": "flu"},
            {"name": "Cid",  "age": 34, "sex": "M", "zip": "1011", "income": "high", "disease": "asthma"},
            {"name": "Dee",  "age": 47, "sex": "F", "zip": "1012", "income": "high", "disease": "flu"},
            {"name": "Eve",  "age": 47, "sex": "F", "zip": "1012", "income": "high", "disease": "diabetes"},
            {"name": "Fay",  "age": 58, "sex": "F", "zip": "1013", "income": "low",  "disease": "flu"}
        ]),
    )
}

#[test]
fn test_config_from_json_drives_assessment() -> Result<()> {
    let config: AssessmentConfig = serde_json::from_value(json!({
        "identifiers": ["name"],
        "quasi_identifiers": ["age", "zip"],
        "sensitive_attributes": ["disease", "income"],
        "thresholds": {"re_identification_max": 0.9, "attribute_inference_max": 0.9}
    }))
    .map_err(|e| BvmError::serialization("parsing config", e))?;

    let report = RiskAssessor::new(config).assess(&census()?)?;

    // Classes: {34,1011} x3, {47,1012} x2, {58,1013} x1
    let re_id = &report.result.re_identification;
    assert_eq!(re_id.qid, "['age', 'zip']");
    assert_eq!(re_id.pcr, 3);
    assert!((re_id.posterior - 0.5).abs() < 1e-12);
    assert!((re_id.dcr - 1.0 / 6.0).abs() < 1e-12);
    assert!((re_id.histogram.probability(33) - 0.5).abs() < 1e-12);
    assert!((re_id.histogram.probability(50) - 2.0 / 6.0).abs() < 1e-12);
    assert!((re_id.histogram.probability(100) - 1.0 / 6.0).abs() < 1e-12);

    // disease: modal counts 2 + 1 + 1 = 4, global mode "flu" x4
    let disease = report.result.attribute("disease").expect("disease row");
    assert!((disease.pca - 1.0).abs() < 1e-12);
    assert!((disease.prior - 4.0 / 6.0).abs() < 1e-12);
    assert!((disease.posterior - 4.0 / 6.0).abs() < 1e-12);
    assert!((disease.dca - 1.0 / 6.0).abs() < 1e-12);

    // income: modal counts 2 + 2 + 1 = 5, global mode x3 each
    let income = report.result.attribute("income").expect("income row");
    assert!((income.pca - 5.0 / 3.0).abs() < 1e-12);
    assert!((income.posterior - 5.0 / 6.0).abs() < 1e-12);
    assert!((income.dca - 3.0 / 6.0).abs() < 1e-12);

    assert_eq!(report.identifiers, vec!["name"]);
    assert!(!report.has_violations());
    Ok(())
}

#[test]
fn test_unknown_quasi_identifier_is_rejected() -> Result<()> {
    let config = AssessmentConfig::new().with_quasi_identifiers(["age", "postcode"]);

    let err = RiskAssessor::new(config).assess(&census()?).unwrap_err();

    let expected = ConfigValidationError::UnknownColumn {
        role: bvm_core::ColumnRole::QuasiIdentifier,
        column: "postcode".to_string(),
    };
    assert_eq!(err.to_string(), BvmError::from(expected).to_string());
    Ok(())
}

#[test]
fn test_missing_quasi_identifiers_is_rejected() -> Result<()> {
    let config = AssessmentConfig::new().with_sensitive_attributes(["disease"]);

    let err = RiskAssessor::new(config).assess(&census()?).unwrap_err();
    assert!(matches!(err, BvmError::Configuration { .. }));
    assert!(err.to_string().contains("quasi-identifiers"));
    Ok(())
}

#[test]
fn test_identifier_as_quasi_identifier_is_critical() -> Result<()> {
    let config = AssessmentConfig::new()
        .with_quasi_identifiers(["name"])
        .with_sensitive_attributes(["disease"])
        .with_thresholds(RiskThresholds::default());

    let report = RiskAssessor::new(config).assess(&census()?)?;

    assert!((report.result.re_identification.dcr - 1.0).abs() < 1e-12);
    assert_eq!(report.threshold_violations.len(), 2);
    assert!(
        report
            .threshold_violations
            .iter()
            .all(|v| v.severity == ViolationSeverity::Critical)
    );
    Ok(())
}

#[test]
fn test_report_round_trips_through_json() -> Result<()> {
    let config = AssessmentConfig::new()
        .with_quasi_identifiers(["sex"])
        .with_sensitive_attributes(["disease"]);
    let report = RiskAssessor::new(config).assess(&census()?)?;

    let json = report.to_json_pretty()?;
    let parsed: bvm_core::AssessmentReport = serde_json::from_str(&json)
        .map_err(|e| BvmError::serialization("parsing report", e))?;

    let (before, after) = (&report.result, &parsed.result);
    assert_eq!(after.re_identification.pcr, before.re_identification.pcr);
    assert!((after.re_identification.posterior - before.re_identification.posterior).abs() < 1e-12);
    assert_eq!(after.attribute_inference.len(), 1);
    assert!((after.attribute_inference[0].pca - before.attribute_inference[0].pca).abs() < 1e-12);
    assert_eq!(parsed.records, 6);
    assert_eq!(parsed.assessed_at, report.assessed_at);
    Ok(())
}
