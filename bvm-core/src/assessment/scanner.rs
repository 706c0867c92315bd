//! Equivalence-class scanner.
//!
//! Sorts record indices by the quasi-identifier columns (stable, so ties
//! keep their original order) and walks the sorted sequence once, handing
//! each maximal run of equal quasi-identifier values to the aggregator.

use std::cmp::Ordering;

use crate::error::Result;
use crate::models::{Dataset, compare_values};

use super::aggregator::RiskAggregator;

/// Compares two records on the quasi-identifier columns, in order.
fn compare_records(
    dataset: &Dataset,
    a: usize,
    b: usize,
    quasi_identifiers: &[String],
) -> Ordering {
    quasi_identifiers
        .iter()
        .map(|column| compare_values(dataset.value(a, column), dataset.value(b, column)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Row indices of `dataset` in stable quasi-identifier order.
pub fn sort_by_quasi_identifiers(dataset: &Dataset, quasi_identifiers: &[String]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..dataset.len()).collect();
    order.sort_by(|&a, &b| compare_records(dataset, a, b, quasi_identifiers));
    order
}

/// Sizes of the equivalence classes in scan order.
pub fn class_sizes(dataset: &Dataset, quasi_identifiers: &[String]) -> Vec<u64> {
    let order = sort_by_quasi_identifiers(dataset, quasi_identifiers);
    let mut sizes: Vec<u64> = Vec::new();
    let mut previous: Option<usize> = None;

    for &row in &order {
        let same_class = previous
            .is_some_and(|prev| compare_records(dataset, prev, row, quasi_identifiers).is_eq());
        if same_class {
            if let Some(size) = sizes.last_mut() {
                *size += 1;
            }
        } else {
            sizes.push(1);
        }
        previous = Some(row);
    }

    sizes
}

/// Single streaming pass: folds every equivalence class into `aggregator`.
///
/// Sensitive values of each record are counted before the record joins its
/// class; at each boundary the finished class is folded and its tables are
/// cleared. The last class is always folded after the input is exhausted.
pub fn scan(
    dataset: &Dataset,
    quasi_identifiers: &[String],
    sensitive_attributes: &[String],
    aggregator: &mut RiskAggregator,
) -> Result<()> {
    let order = sort_by_quasi_identifiers(dataset, quasi_identifiers);
    let mut tables = aggregator.frequency_tables();
    let mut class_start: Option<usize> = None;
    let mut class_size: u64 = 0;

    for &row in &order {
        match class_start {
            Some(first) if compare_records(dataset, first, row, quasi_identifiers).is_ne() => {
                aggregator.fold_class(class_size, &mut tables)?;
                class_start = Some(row);
                class_size = 0;
            }
            Some(_) => {}
            None => class_start = Some(row),
        }

        for (table, column) in tables.iter_mut().zip(sensitive_attributes) {
            table.observe(dataset.value(row, column));
        }
        class_size += 1;
    }

    if class_start.is_some() {
        aggregator.fold_class(class_size, &mut tables)?;
    }

    Ok(())
}
