//! FILENAME: core/table-engine/src/columns.rs
//! PURPOSE: Column order, drag-and-drop reordering, sort toggling and sticky offsets.
//! CONTEXT: Column order is persisted on the widget as a list of leaf keys.
//! Keys the saved order does not mention (new measures, new years) keep their
//! natural position after the ordered ones.

use engine::{SortOrder, SortSpec};
use rustc_hash::FxHashSet;

use crate::error::TableError;

/// Leaf keys in display order.
pub fn apply_column_order(natural: &[&str], saved: &[String]) -> Vec<String> {
    let known: FxHashSet<&str> = natural.iter().copied().collect();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut ordered = Vec::with_capacity(natural.len());

    for key in saved {
        if known.contains(key.as_str()) && seen.insert(key.as_str()) {
            ordered.push(key.clone());
        }
    }
    for key in natural {
        if seen.insert(*key) {
            ordered.push(key.to_string());
        }
    }
    ordered
}

/// Moves `dragged` to the index `target` held before the move.
pub fn reorder_columns(order: &[String], dragged: &str, target: &str) -> Result<Vec<String>, TableError> {
    let from = position(order, dragged)?;
    let to = position(order, target)?;
    let mut next = order.to_vec();
    if from == to {
        return Ok(next);
    }
    let key = next.remove(from);
    next.insert(to, key);
    Ok(next)
}

fn position(order: &[String], key: &str) -> Result<usize, TableError> {
    order
        .iter()
        .position(|k| k == key)
        .ok_or_else(|| TableError::UnknownColumn(key.to_string()))
}

/// Single active sort: same field flips direction, another field starts ascending.
pub fn toggle_sort(current: Option<&SortSpec>, field_name: &str) -> SortSpec {
    match current {
        Some(sort) if sort.field_name == field_name => SortSpec {
            field_name: field_name.to_string(),
            order: sort.order.toggled(),
        },
        _ => SortSpec {
            field_name: field_name.to_string(),
            order: SortOrder::Asc,
        },
    }
}

/// Left offsets for the first `pinned` columns, in pixels.
pub fn sticky_offsets(widths: &[f64], pinned: usize) -> Vec<f64> {
    let mut offset = 0.0;
    widths
        .iter()
        .take(pinned)
        .map(|w| {
            let left = offset;
            offset += w.max(0.0);
            left
        })
        .collect()
}
