//! FILENAME: core/table-engine/src/lib.rs
//! Table rendering subsystem for the dashboard.
//!
//! Turns `table` processed data plus a widget into a render model: a
//! multi-level header, visible body rows, a grand-total footer and per-cell
//! styles. Depends on `engine` for the row and header shapes and for value
//! formatting.
//!
//! Layers:
//! - `header`: Span-aware header grid and its layout under any column order
//! - `columns`: Column ordering, drag-and-drop, sort toggling, sticky offsets
//! - `rows`: Collapse visibility and row click actions
//! - `conditional`: Rule matching and cell styles
//! - `view`: Renderable output for the frontend (WHAT we display)

pub mod columns;
pub mod conditional;
pub mod error;
pub mod header;
pub mod rows;
pub mod view;

pub use columns::{apply_column_order, reorder_columns, sticky_offsets, toggle_sort};
pub use conditional::{matching_rule, measure_for_column, CellStyle};
pub use error::TableError;
pub use header::{HeaderGrid, HeaderNode, HeaderSlot, Hierarchy, NodeId};
pub use rows::{
    expandable_paths, has_expandable_rows, is_row_hidden, partition_rows, row_action,
    row_dimension, CollapsedSet, RowAction,
};
pub use view::{CellView, ColumnView, RowView, TableView, SUBTOTAL_SUFFIX};
