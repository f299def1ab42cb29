//! FILENAME: app/orchestrator/src/lib.rs
//! Dashboard orchestration for widget rendering.
//!
//! Owns each widget's fetch lifecycle, hands processed results to the
//! chart or table engine, and turns user interaction back into
//! cross-filter, drill-path and widget-setting mutations on the host.
//!
//! Layers:
//! - `source`: Query boundary the host implements (WHERE data comes from)
//! - `host`: Page-level mutation entry points and an in-memory host
//! - `controller`: Fetch lifecycle and renderer dispatch (WHEN we fetch, WHAT we draw)
//! - `interaction` / `menu`: Clicks, drills, header actions, context menus
//! - `views`: KPI, heatmap and loading render models
//! - `debounce`: Resize and sticky-column recomputation for mounted views

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod export;
pub mod host;
pub mod interaction;
pub mod logging;
pub mod menu;
pub mod source;
pub mod views;

pub use config::DashboardConfig;
pub use controller::{dispatch, fetch_key, FetchOutcome, WidgetController, WidgetView, LOADING_MESSAGE};
pub use debounce::{Debouncer, MountedChart, MountedTable};
pub use error::{ConfigError, FetchError};
pub use export::{export_snapshot, inspect_rows, ExportSnapshot};
pub use host::{create_dashboard_state, DashboardHost, DashboardState, OpenMenu};
pub use interaction::{
    chart_dimension, chart_handlers, clear_own_cross_filter, drill_down, drill_up,
    handle_chart_click, handle_column_drop, handle_header_click, handle_row_click,
    toggle_cross_filter,
};
pub use logging::init_logging;
pub use menu::{
    apply_menu_action, chart_menu, header_menu, open_chart_menu, open_header_menu, MenuAction,
    MenuItem,
};
pub use source::{SharedInputs, WidgetDataSource, WidgetProcessor};
pub use views::{HeatmapCell, HeatmapView, KpiCard, LoadingPlaceholder, SkeletonKind, Trend};
