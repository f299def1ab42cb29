//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Shared model for the dashboard renderer.
//! CONTEXT: Re-exports the widget configuration, processed-data shapes,
//! interaction state and the formatting engine used by every other crate.

pub mod dataset;
pub mod error;
pub mod filter;
pub mod number_format;
pub mod palette;
pub mod pill;
pub mod processed;
pub mod value;
pub mod widget;

// Re-export commonly used types at the crate root
pub use dataset::{apply_filters, Dataset, Row};
pub use error::ModelError;
pub use filter::{CrossFilter, DrillPath, DrillStep, DrillUpTarget};
pub use number_format::{format_compact, format_f64, format_number, format_value, MISSING_VALUE};
pub use palette::{translucent, Color, Palette, DEFAULT_PALETTE};
pub use pill::{
    Aggregation, FilterCondition, Pill, PillFilter, PillType, ShelfRole, Shelves, ValueFormat,
};
pub use processed::{
    ancestor_paths, parent_path, path_leaf, AxisRole, BoxPlotSummary, ChartData, ChartDataset,
    DataPoint, HeaderCell, HeatmapData, KpiData, KpiValue, ProcessedData, RowType, SankeyData,
    SankeyLink, SankeyNode, TableData, TableRow, PATH_DELIMITER,
};
pub use value::FieldValue;
pub use widget::{
    ChartLibrary, ChartSettings, ChartType, ConditionalRule, LegendPosition, RuleCondition,
    SortOrder, SortSpec, SubtotalSettings, Widget,
};
