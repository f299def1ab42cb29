//! FILENAME: core/chart-engine/src/lib.rs
//! Chart rendering subsystem for the dashboard.
//!
//! Turns `chart` / `sankey` processed data plus a widget into option trees
//! for three interchangeable charting libraries. Depends on `engine` for the
//! widget model, processed-data shapes and the formatting engine.
//!
//! Layers:
//! - `encoding`: Backend-neutral visual plan (WHAT every backend draws)
//! - `tooltip`: Value-pill resolution and formatting
//! - `backend`: The `ChartBackend` seam and library selection
//! - `echarts` / `chartjs` / `recharts`: Native option builders (HOW each library draws it)
//! - `instance`: Mounted chart and its click / context-menu / resize contract

pub mod backend;
pub mod chartjs;
pub mod echarts;
pub mod encoding;
pub mod instance;
pub mod recharts;
pub mod tooltip;

pub use backend::{backend_for, ChartBackend, ChartRender};
pub use chartjs::ChartJsBackend;
pub use echarts::EchartsBackend;
pub use encoding::{
    bar_orientation, bubble_radius, dual_axis_roles, encode, radar_max, ChartInput, EncodedChart,
    Encoding, Frame, Hit, Orientation, Placeholder, PlaceholderKind,
};
pub use instance::{
    render, ChartHandlers, ChartInstance, ClickHandler, ContainerSize, ContextMenuHandler,
    PointerEvent,
};
pub use recharts::RechartsBackend;
pub use tooltip::{format_with, pill_for_dataset};
