//! FILENAME: core/engine/src/dataset.rs
//! PURPOSE: Raw tabular rows and row-level filter application.
//! CONTEXT: Aggregation belongs to the query layer. This module only narrows
//! rows, for data-inspection views that show what a widget is built from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pill::{FilterCondition, Pill, PillFilter};
use crate::value::FieldValue;

pub type Row = BTreeMap<String, FieldValue>;

static NULL_VALUE: FieldValue = FieldValue::Null;

/// A (possibly blended) dataset as handed to the query layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(id: impl Into<String>) -> Self {
        Dataset {
            id: id.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Row) -> Self {
        for key in row.keys() {
            if !self.columns.contains(key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
        self
    }
}

/// Returns the rows that pass every filter pill. Pills without a filter are
/// ignored.
pub fn apply_filters<'a>(dataset: &'a Dataset, filters: &[Pill]) -> Vec<&'a Row> {
    let active: Vec<(&str, &PillFilter)> = filters
        .iter()
        .filter_map(|p| p.filter.as_ref().map(|f| (p.name.as_str(), f)))
        .collect();

    dataset
        .rows
        .iter()
        .filter(|row| {
            active.iter().all(|(field, filter)| {
                let value = row.get(*field).unwrap_or(&NULL_VALUE);
                row_matches(value, filter)
            })
        })
        .collect()
}

fn row_matches(value: &FieldValue, filter: &PillFilter) -> bool {
    let values = &filter.values;
    match filter.condition {
        FilterCondition::IsOneOf => values.iter().any(|v| v.loosely_equals(value)),
        FilterCondition::IsNotOneOf => !values.iter().any(|v| v.loosely_equals(value)),
        FilterCondition::Equals => values.first().map(|v| v.loosely_equals(value)).unwrap_or(false),
        FilterCondition::NotEquals => values.first().map(|v| !v.loosely_equals(value)).unwrap_or(true),
        FilterCondition::GreaterThan => compare_first(value, values, |a, b| a > b),
        FilterCondition::LessThan => compare_first(value, values, |a, b| a < b),
        FilterCondition::Between => {
            let bounds = (
                values.first().and_then(FieldValue::coerce_f64),
                values.get(1).and_then(FieldValue::coerce_f64),
            );
            match (value.coerce_f64(), bounds) {
                (Some(n), (Some(lo), Some(hi))) => n >= lo.min(hi) && n <= lo.max(hi),
                _ => false,
            }
        }
        FilterCondition::Contains => {
            let haystack = value.to_string().to_lowercase();
            values
                .iter()
                .any(|needle| haystack.contains(&needle.to_string().to_lowercase()))
        }
    }
}

fn compare_first(value: &FieldValue, values: &[FieldValue], op: impl Fn(f64, f64) -> bool) -> bool {
    match (value.coerce_f64(), values.first().and_then(FieldValue::coerce_f64)) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}
