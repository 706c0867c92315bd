//! Dataset abstraction consumed by the assessment pipeline.
//!
//! A [`Dataset`] is an ordered collection of records, each a JSON object
//! mapping column names to cell values. The pipeline never mutates it; the
//! stable sort works on row indices.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{BvmError, Result};

/// A single record: column name to cell value.
pub type Record = Map<String, Value>;

static NULL: Value = Value::Null;

/// Immutable microdata table.
///
/// Deserialization rebuilds the column list from the rows; a serialized
/// `columns` field is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDataset")]
pub struct Dataset {
    name: String,
    columns: Vec<String>,
    rows: Vec<Record>,
}

#[derive(Deserialize)]
struct RawDataset {
    name: String,
    #[serde(default)]
    rows: Vec<Record>,
}

impl From<RawDataset> for Dataset {
    fn from(raw: RawDataset) -> Self {
        Self::from_records(raw.name, raw.rows)
    }
}

impl Dataset {
    /// Builds a dataset from records that are already JSON objects.
    ///
    /// Columns are the union of record keys in first-seen order.
    pub fn from_records(name: impl Into<String>, rows: Vec<Record>) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut columns = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }

        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Builds a dataset from arbitrary JSON rows.
    ///
    /// Fails if any row is not a JSON object.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Value>) -> Result<Self> {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| match row {
                Value::Object(record) => Ok(record),
                other => Err(BvmError::dataset(format!(
                    "row {} is a JSON {}, expected an object",
                    index,
                    json_type_name(&other)
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_records(name, records))
    }

    /// Builds a dataset from an in-memory JSON array of objects.
    pub fn from_json(name: impl Into<String>, value: &Value) -> Result<Self> {
        match value {
            Value::Array(rows) => Self::from_rows(name, rows.clone()),
            other => Err(BvmError::dataset(format!(
                "expected a JSON array of records, got a JSON {}",
                json_type_name(other)
            ))),
        }
    }

    /// Dataset name used in logs and reports.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns true if any record carries the column.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Records in their original order.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Cell value at `row` for `column`; absent cells read as null.
    pub fn value(&self, row: usize, column: &str) -> &Value {
        self.rows
            .get(row)
            .and_then(|record| record.get(column))
            .unwrap_or(&NULL)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over cell values used for the quasi-identifier sort.
///
/// Values of different JSON types order by type
/// (`null < bool < number < string < array < object`). Numbers compare
/// by exact value, so `1` and `1.0` are equal while integers beyond 2^53
/// stay distinct.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(a, b)| compare_values(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(_), Value::Object(_)) => value_to_string(a).cmp(&value_to_string(b)),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn exact_integer(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

fn compare_numbers(x: &Number, y: &Number) -> Ordering {
    match (exact_integer(x), exact_integer(y)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(a), None) => compare_integer_to_float(a, y.as_f64().unwrap_or(0.0)),
        (None, Some(b)) => compare_integer_to_float(b, x.as_f64().unwrap_or(0.0)).reverse(),
        // JSON numbers are never NaN
        (None, None) => x
            .as_f64()
            .unwrap_or(0.0)
            .partial_cmp(&y.as_f64().unwrap_or(0.0))
            .unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison without rounding the integer through f64.
fn compare_integer_to_float(integer: i128, float: f64) -> Ordering {
    let whole = float.trunc();
    // Saturating cast: floats beyond the i128 range exceed every JSON integer
    match integer.cmp(&(whole as i128)) {
        Ordering::Equal => 0.0_f64
            .partial_cmp(&(float - whole))
            .unwrap_or(Ordering::Equal),
        ordering => ordering,
    }
}

/// Stringified form of a cell, used as the frequency-table key.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).unwrap_or_else(|e| {
            tracing::trace!("Failed to serialize cell for frequency counting: {}", e);
            "__SERIALIZE_ERROR__".to_string()
        }),
    }
}
