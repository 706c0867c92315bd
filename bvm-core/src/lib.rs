//! Bayes Vulnerability for Microdata (BVM).
//!
//! This crate estimates the disclosure risk of a microdata table under a
//! Bayesian adversary who observes a set of quasi-identifying columns. It
//! reports how likely that adversary is to re-identify a record and to
//! infer the value of each sensitive attribute, together with per-record
//! risk histograms.
//!
//! # Guarantees
//! - Assessments are pure: no file, network or global state is touched
//! - Result rows contain aggregate probabilities only, never record values
//! - Each run owns its aggregates; repeated runs give identical rows
//!
//! # Architecture
//! - [`config`] assigns columns to roles and validates them up front
//! - [`assessment`] sorts by quasi-identifiers, scans equivalence classes
//!   and folds them into running sums
//! - [`error`] separates configuration errors from internal defects

pub mod assessment;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use assessment::{
    AssessmentReport, AssessmentResult, AttributeInferenceRisk, ReIdentificationRisk,
    RiskAssessor, RiskDistribution, ThresholdViolation, ViolationSeverity, assess,
};
pub use config::{AssessmentConfig, ColumnRole, ConfigValidationError, RiskThresholds};
pub use error::{BvmError, Result};
pub use models::{Dataset, Record};
