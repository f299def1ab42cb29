//! FILENAME: core/table-engine/src/rows.rs
//! PURPOSE: Row hierarchy - visibility under collapse, expand targets, row clicks.
//! CONTEXT: The collapsed set holds ancestor paths and is owned by the host
//! page. A row is hidden iff one of its strict-prefix ancestors is collapsed;
//! a collapsed row itself stays visible so it can be expanded again.

use engine::{ancestor_paths, path_leaf, FieldValue, Pill, RowType, TableRow, Widget};
use rustc_hash::FxHashSet;

/// Collapsed ancestor paths for one table widget.
pub type CollapsedSet = FxHashSet<String>;

pub fn is_row_hidden(row: &TableRow, collapsed: &CollapsedSet) -> bool {
    match row.path.as_deref() {
        Some(path) => ancestor_paths(path).any(|ancestor| collapsed.contains(ancestor)),
        None => false,
    }
}

/// Splits rows into the visible body and the grand-total footer.
pub fn partition_rows<'a>(rows: &'a [TableRow], collapsed: &CollapsedSet) -> (Vec<&'a TableRow>, Vec<&'a TableRow>) {
    let mut body = Vec::new();
    let mut footer = Vec::new();
    for row in rows {
        if row.row_type == RowType::Grandtotal {
            footer.push(row);
        } else if !is_row_hidden(row, collapsed) {
            body.push(row);
        }
    }
    (body, footer)
}

/// Paths of every expandable row, for collapse-all.
pub fn expandable_paths(rows: &[TableRow]) -> Vec<String> {
    rows.iter()
        .filter(|r| r.is_expandable)
        .filter_map(|r| r.path.clone())
        .collect()
}

pub fn has_expandable_rows(rows: &[TableRow]) -> bool {
    rows.iter().any(|r| r.is_expandable && r.path.is_some())
}

/// The dimension a row groups by and the value it groups on.
pub fn row_dimension<'a>(widget: &'a Widget, row: &TableRow) -> Option<(&'a Pill, FieldValue)> {
    let pill = widget.shelves.rows.get(row.level)?;
    let recorded = row.value(&pill.name);
    let value = if recorded.is_missing() {
        FieldValue::text(path_leaf(row.path.as_deref()?))
    } else {
        recorded.clone()
    };
    Some((pill, value))
}

/// What a click on a body row should do.
#[derive(Debug, Clone, PartialEq)]
pub enum RowAction {
    ToggleExpand(String),
    CrossFilter { dimension: Pill, value: FieldValue },
    None,
}

/// Expandable rows toggle. On a cross-filter source every other row except
/// a grand total filters on its own grouping level.
pub fn row_action(widget: &Widget, row: &TableRow) -> RowAction {
    if row.is_expandable {
        if let Some(path) = &row.path {
            return RowAction::ToggleExpand(path.clone());
        }
    }
    if widget.is_cross_filter_source && row.row_type != RowType::Grandtotal {
        if let Some((pill, value)) = row_dimension(widget, row) {
            return RowAction::CrossFilter {
                dimension: pill.clone(),
                value,
            };
        }
    }
    RowAction::None
}
