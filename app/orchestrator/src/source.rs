//! FILENAME: app/orchestrator/src/source.rs
//! PURPOSE: The query boundary: shared inputs and the data-source traits.
//! CONTEXT: Aggregation happens behind these traits. The orchestrator only
//! decides when to call them and what to do with the answer.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use engine::{CrossFilter, Dataset, FieldValue, Pill, ProcessedData, Widget};
use serde::Serialize;

use crate::error::FetchError;

/// Inputs shared by every widget on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedInputs {
    /// Blended dataset the page queries against.
    pub dataset: Option<Arc<Dataset>>,
    pub global_filters: Vec<Pill>,
    pub cross_filter: Option<CrossFilter>,
    pub parameters: BTreeMap<String, FieldValue>,
    pub control_filters: Vec<Pill>,
    /// Bumped by the host to force a refetch.
    pub refetch: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Fingerprint<'a> {
    dataset_id: Option<&'a str>,
    dataset_rows: usize,
    global_filters: &'a [Pill],
    cross_filter: &'a Option<CrossFilter>,
    parameters: &'a BTreeMap<String, FieldValue>,
    control_filters: &'a [Pill],
    refetch: u64,
}

impl SharedInputs {
    /// Stable key over everything that should trigger a refetch.
    pub fn fingerprint(&self) -> String {
        let key = Fingerprint {
            dataset_id: self.dataset.as_deref().map(|d| d.id.as_str()),
            dataset_rows: self.dataset.as_deref().map(|d| d.rows.len()).unwrap_or(0),
            global_filters: &self.global_filters,
            cross_filter: &self.cross_filter,
            parameters: &self.parameters,
            control_filters: &self.control_filters,
            refetch: self.refetch,
        };
        serde_json::to_string(&key).unwrap_or_default()
    }

    /// Every filter pill that narrows `widget`'s rows. A widget is never
    /// filtered by its own cross-filter.
    pub fn filters_for(&self, widget: &Widget) -> Vec<Pill> {
        let mut filters: Vec<Pill> = self
            .global_filters
            .iter()
            .chain(self.control_filters.iter())
            .chain(widget.shelves.filters.iter())
            .cloned()
            .collect();
        if let Some(cross) = &self.cross_filter {
            if cross.source_widget_id != widget.id {
                filters.push(cross.filter.clone());
            }
        }
        filters
    }
}

/// Asynchronous query service used for live rendering.
#[async_trait]
pub trait WidgetDataSource: Send + Sync {
    async fn fetch_widget_data(
        &self,
        widget: &Widget,
        inputs: &SharedInputs,
    ) -> Result<ProcessedData, FetchError>;
}

/// Synchronous processor used by export paths.
pub trait WidgetProcessor: Send + Sync {
    fn process_widget_data(&self, widget: &Widget, inputs: &SharedInputs) -> ProcessedData;
}
