//! FILENAME: app/orchestrator/src/export.rs
//! PURPOSE: Export snapshots and the data-inspection row view.
//! CONTEXT: Exports go through the synchronous processor so they never wait
//! on, or race with, the live fetch of the same widget.

use engine::{apply_filters, ChartType, Dataset, ProcessedData, Row, Widget};
use serde::Serialize;

use crate::log_info;
use crate::logging::RENDER;
use crate::source::{SharedInputs, WidgetProcessor};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub widget_id: String,
    pub title: String,
    pub chart_type: ChartType,
    pub data: ProcessedData,
}

impl ExportSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn export_snapshot(processor: &dyn WidgetProcessor, widget: &Widget, inputs: &SharedInputs) -> ExportSnapshot {
    let data = processor.process_widget_data(widget, inputs);
    log_info!(RENDER, "widget {} exported as {}", widget.id, data.kind());
    ExportSnapshot {
        widget_id: widget.id.clone(),
        title: widget.title.clone(),
        chart_type: widget.chart_type,
        data,
    }
}

/// Raw rows behind a widget after every filter that applies to it.
pub fn inspect_rows<'a>(dataset: &'a Dataset, widget: &Widget, inputs: &SharedInputs) -> Vec<&'a Row> {
    apply_filters(dataset, &inputs.filters_for(widget))
}
