//! Running risk aggregates.
//!
//! The aggregator receives one call per completed equivalence class and
//! keeps only sums: the number of classes (pCR), the number of singleton
//! classes (dCR), and per sensitive attribute the summed modal counts (p)
//! and the summed modal counts of single-valued classes (d), plus the
//! histograms. Folding is associative and commutative across classes, so
//! aggregators over disjoint sets of whole classes can be merged.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{BvmError, Result};
use crate::models::{Dataset, value_to_string};

use super::histogram::RiskHistogram;
use super::models::{
    AssessmentResult, AttributeInferenceRisk, ReIdentificationRisk, quasi_identifier_label,
};

/// Value counts of one sensitive attribute within the open class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of a cell value (keyed by its string form).
    pub fn observe(&mut self, value: &Value) {
        *self.counts.entry(value_to_string(value)).or_insert(0) += 1;
    }

    /// Count of the most common value, 0 when empty.
    pub fn max_count(&self) -> u64 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Number of distinct values observed.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Returns true if nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Forgets all counts.
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Size of the largest value group of `column` over the whole dataset.
///
/// This is the success count of an attacker who always guesses the
/// globally most common value. Null and missing cells are not a guessable
/// value and form no group here, although per-class tables still count
/// them. Returns 0 when every cell is null.
pub fn global_mode_count(dataset: &Dataset, column: &str) -> u64 {
    let mut table = FrequencyTable::new();
    for row in 0..dataset.len() {
        let value = dataset.value(row, column);
        if !value.is_null() {
            table.observe(value);
        }
    }
    table.max_count()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeTally {
    attribute: String,
    // p: summed modal counts
    modal: u64,
    // d: summed modal counts of single-valued classes
    deterministic: u64,
    histogram: RiskHistogram,
}

impl AttributeTally {
    fn new(attribute: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
            modal: 0,
            deterministic: 0,
            histogram: RiskHistogram::new(),
        }
    }
}

/// Running aggregates for one assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAggregator {
    classes: u64,
    singletons: u64,
    records: u64,
    re_identification: RiskHistogram,
    attributes: Vec<AttributeTally>,
}

impl RiskAggregator {
    /// Creates empty aggregates for the given sensitive attributes.
    pub fn new(sensitive_attributes: &[String]) -> Self {
        Self {
            classes: 0,
            singletons: 0,
            records: 0,
            re_identification: RiskHistogram::new(),
            attributes: sensitive_attributes
                .iter()
                .map(|attribute| AttributeTally::new(attribute))
                .collect(),
        }
    }

    /// Fresh frequency tables, one per sensitive attribute.
    pub fn frequency_tables(&self) -> Vec<FrequencyTable> {
        vec![FrequencyTable::new(); self.attributes.len()]
    }

    /// Number of classes folded so far (pCR).
    pub fn classes(&self) -> u64 {
        self.classes
    }

    /// Number of singleton classes folded so far (dCR numerator).
    pub fn singletons(&self) -> u64 {
        self.singletons
    }

    /// Number of records folded so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Raw re-identification histogram.
    pub fn re_identification_histogram(&self) -> &RiskHistogram {
        &self.re_identification
    }

    /// Folds one completed equivalence class and clears its tables.
    ///
    /// `tables` holds one frequency table per sensitive attribute, in
    /// configuration order. Each must sum to `class_size`; a mismatch is a
    /// bookkeeping defect and aborts with [`BvmError::Internal`].
    pub fn fold_class(&mut self, class_size: u64, tables: &mut [FrequencyTable]) -> Result<()> {
        if class_size == 0 {
            return Err(BvmError::internal("equivalence class with no records"));
        }
        if tables.len() != self.attributes.len() {
            return Err(BvmError::internal(format!(
                "expected {} frequency tables, got {}",
                self.attributes.len(),
                tables.len()
            )));
        }

        self.classes += 1;
        self.records += class_size;
        self.re_identification.record(1, class_size);

        let mut class_size_one = false;
        for (tally, table) in self.attributes.iter_mut().zip(tables.iter_mut()) {
            let counted = table.total();
            if counted != class_size {
                return Err(BvmError::internal(format!(
                    "class_size (={}) and counts (={}) mismatch for sensitive attribute '{}'",
                    class_size, counted, tally.attribute
                )));
            }

            let max_value = table.max_count();
            tally.modal += max_value;
            tally.histogram.record(max_value, class_size);

            if table.distinct() == 1 {
                tally.deterministic += max_value;
                if max_value == 1 {
                    class_size_one = true;
                }
            }

            table.clear();
        }

        if class_size_one && class_size != 1 {
            return Err(BvmError::internal(format!(
                "class of size {} flagged as a singleton",
                class_size
            )));
        }
        if class_size == 1 {
            self.singletons += 1;
        }

        tracing::trace!(
            "Folded equivalence class #{} of size {}",
            self.classes,
            class_size
        );
        Ok(())
    }

    /// Adds another aggregator's sums into this one.
    ///
    /// Both must cover disjoint sets of whole equivalence classes over the
    /// same sensitive attributes.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        let same_attributes = self.attributes.len() == other.attributes.len()
            && self
                .attributes
                .iter()
                .zip(&other.attributes)
                .all(|(a, b)| a.attribute == b.attribute);
        if !same_attributes {
            return Err(BvmError::configuration(
                "cannot merge aggregates over different sensitive attributes",
            ));
        }

        self.classes += other.classes;
        self.singletons += other.singletons;
        self.records += other.records;
        self.re_identification.merge(&other.re_identification);
        for (tally, extra) in self.attributes.iter_mut().zip(&other.attributes) {
            tally.modal += extra.modal;
            tally.deterministic += extra.deterministic;
            tally.histogram.merge(&extra.histogram);
        }
        Ok(())
    }

    /// Normalizes the sums into result rows.
    ///
    /// Two fixed edge rules apply: with a single record dCR is reported as
    /// `1/1 - 1 = 0`, and a dCA of exactly 1 is reported as 0.
    pub fn finalize(
        &self,
        dataset: &Dataset,
        quasi_identifiers: &[String],
    ) -> Result<AssessmentResult> {
        let dataset_size = dataset.len() as u64;
        if dataset_size == 0 {
            return Err(BvmError::dataset("cannot finalize an empty dataset"));
        }
        if self.records != dataset_size || self.re_identification.total() != dataset_size {
            return Err(BvmError::internal(format!(
                "folded {} records into histograms totalling {}, dataset has {}",
                self.records,
                self.re_identification.total(),
                dataset_size
            )));
        }

        let n = dataset_size as f64;
        let qid = quasi_identifier_label(quasi_identifiers);

        let mut dcr = self.singletons as f64 / n;
        if dataset_size == 1 {
            dcr -= 1.0;
        }

        let re_identification = ReIdentificationRisk {
            qid: qid.clone(),
            dcr,
            pcr: self.classes,
            prior: 1.0 / n,
            posterior: self.classes as f64 / n,
            histogram: self.re_identification.normalize(dataset_size),
        };

        let mut attribute_inference = Vec::with_capacity(self.attributes.len());
        for tally in &self.attributes {
            let mode_count = global_mode_count(dataset, &tally.attribute);
            if mode_count == 0 {
                return Err(BvmError::dataset(format!(
                    "sensitive attribute '{}' has no non-null values",
                    tally.attribute
                )));
            }

            let dca = if tally.deterministic == dataset_size {
                0.0
            } else {
                tally.deterministic as f64 / n
            };

            attribute_inference.push(AttributeInferenceRisk {
                qid: qid.clone(),
                sensitive: tally.attribute.clone(),
                dca,
                pca: tally.modal as f64 / mode_count as f64,
                prior: mode_count as f64 / n,
                posterior: tally.modal as f64 / n,
                histogram: tally.histogram.normalize(dataset_size),
            });
        }

        Ok(AssessmentResult {
            re_identification,
            attribute_inference,
        })
    }
}
