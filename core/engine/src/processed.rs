//! FILENAME: core/engine/src/processed.rs
//! PURPOSE: Display-ready projections produced by the widget data processor.
//! CONTEXT: `ProcessedData` is replaced wholesale on every recompute and is
//! matched exhaustively by every consumer, so a new result kind forces a
//! touchpoint in each renderer.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::ModelError;
use crate::pill::Pill;
use crate::value::FieldValue;

/// Separator between ancestor dimension values in a row path.
pub const PATH_DELIMITER: char = '|';

// ============================================================================
// RESULT UNION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProcessedData {
    Table(TableData),
    Chart(ChartData),
    Sankey(SankeyData),
    Kpi(KpiData),
    Heatmap(HeatmapData),
    Loading { message: String },
    #[serde(rename = "nodata")]
    NoData { message: String },
}

impl ProcessedData {
    pub fn loading(message: impl Into<String>) -> Self {
        ProcessedData::Loading {
            message: message.into(),
        }
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        ProcessedData::NoData {
            message: message.into(),
        }
    }

    /// Type tag as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessedData::Table(_) => "table",
            ProcessedData::Chart(_) => "chart",
            ProcessedData::Sankey(_) => "sankey",
            ProcessedData::Kpi(_) => "kpi",
            ProcessedData::Heatmap(_) => "heatmap",
            ProcessedData::Loading { .. } => "loading",
            ProcessedData::NoData { .. } => "nodata",
        }
    }

    /// Message carried by loading / nodata results.
    pub fn message(&self) -> Option<&str> {
        match self {
            ProcessedData::Loading { message } | ProcessedData::NoData { message } => Some(message),
            _ => None,
        }
    }
}

// ============================================================================
// TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    #[serde(default = "default_span")]
    pub col_span: u16,
    #[serde(default = "default_span")]
    pub row_span: u16,
    #[serde(default)]
    pub is_measure_group: bool,
}

fn default_span() -> u16 {
    1
}

impl HeaderCell {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        HeaderCell {
            key: key.into(),
            label: label.into(),
            col_span: 1,
            row_span: 1,
            is_measure_group: false,
        }
    }

    pub fn spanning(mut self, col_span: u16, row_span: u16) -> Self {
        self.col_span = col_span.max(1);
        self.row_span = row_span.max(1);
        self
    }

    pub fn measure_group(mut self) -> Self {
        self.is_measure_group = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowType {
    Data,
    Subtotal,
    Grandtotal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(rename = "type")]
    pub row_type: RowType,
    pub values: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub level: usize,
    #[serde(default)]
    pub is_expandable: bool,
}

impl TableRow {
    pub fn data(path: Option<&str>, level: usize) -> Self {
        TableRow {
            row_type: RowType::Data,
            values: BTreeMap::new(),
            path: path.map(str::to_string),
            level,
            is_expandable: false,
        }
    }

    pub fn with_value(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn expandable(mut self) -> Self {
        self.is_expandable = true;
        self
    }

    pub fn of_type(mut self, row_type: RowType) -> Self {
        self.row_type = row_type;
        self
    }

    pub fn value(&self, key: &str) -> &FieldValue {
        static NULL: FieldValue = FieldValue::Null;
        self.values.get(key).unwrap_or(&NULL)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    pub header_rows: Vec<Vec<HeaderCell>>,
    pub rows: Vec<TableRow>,
    pub column_order: Vec<String>,
}

impl TableData {
    /// Every row path must have its parent (last segment dropped) present
    /// as another row's path, unless the parent is the root.
    pub fn validate_hierarchy(&self) -> Result<(), ModelError> {
        let known: HashSet<&str> = self.rows.iter().filter_map(|r| r.path.as_deref()).collect();
        for path in self.rows.iter().filter_map(|r| r.path.as_deref()) {
            if let Some(parent) = parent_path(path) {
                if !known.contains(parent) {
                    return Err(ModelError::OrphanPath {
                        path: path.to_string(),
                        parent: parent.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Parent of a row path, or `None` at the root.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rfind(PATH_DELIMITER).map(|idx| &path[..idx])
}

/// Strict-prefix ancestors of a path, nearest first.
pub fn ancestor_paths(path: &str) -> impl Iterator<Item = &str> {
    let mut current = Some(path);
    std::iter::from_fn(move || {
        let parent = current.and_then(parent_path);
        current = parent;
        parent
    })
}

/// Last segment of a row path (the row's own dimension value).
pub fn path_leaf(path: &str) -> &str {
    path.rsplit(PATH_DELIMITER).next().unwrap_or(path)
}

// ============================================================================
// CHART
// ============================================================================

/// Five-number summary for box plots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// One datum. The shape depends on the chart type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataPoint {
    Null,
    Number(f64),
    BoxPlot(BoxPlotSummary),
    Bubble { x: f64, y: f64, r: f64 },
    Point { x: f64, y: f64 },
    Named { name: String, value: f64 },
}

impl DataPoint {
    /// Scalar value for single-number encodings.
    pub fn value(&self) -> Option<f64> {
        match self {
            DataPoint::Number(n) if !n.is_nan() => Some(*n),
            DataPoint::Named { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataPoint::Null) || matches!(self, DataPoint::Number(n) if n.is_nan())
    }
}

impl From<f64> for DataPoint {
    fn from(value: f64) -> Self {
        DataPoint::Number(value)
    }
}

impl From<Option<f64>> for DataPoint {
    fn from(value: Option<f64>) -> Self {
        value.map(DataPoint::Number).unwrap_or(DataPoint::Null)
    }
}

/// Explicit axis assignment for dual-axis charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisRole {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_pill_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<AxisRole>,
}

impl ChartDataset {
    pub fn new(label: impl Into<String>, data: Vec<DataPoint>) -> Self {
        ChartDataset {
            label: label.into(),
            data,
            value_pill_name: None,
            axis: None,
        }
    }

    /// Convenience for plain numeric series with gaps.
    pub fn numbers(label: impl Into<String>, data: &[Option<f64>]) -> Self {
        ChartDataset::new(label, data.iter().map(|v| DataPoint::from(*v)).collect())
    }

    pub fn on_axis(mut self, axis: AxisRole) -> Self {
        self.axis = Some(axis);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

// ============================================================================
// SANKEY, KPI, HEATMAP
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyNode {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SankeyData {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiValue {
    pub label: String,
    pub value: FieldValue,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiData {
    pub primary_value: KpiValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_value: Option<KpiValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapData {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub data: Vec<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_pill: Option<Pill>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_and_ancestors() {
        assert_eq!(parent_path("East|Boston|Main St"), Some("East|Boston"));
        assert_eq!(parent_path("East"), None);
        let ancestors: Vec<&str> = ancestor_paths("East|Boston|Main St").collect();
        assert_eq!(ancestors, vec!["East|Boston", "East"]);
        assert_eq!(path_leaf("East|Boston"), "Boston");
    }

    #[test]
    fn test_validate_hierarchy() {
        let mut table = TableData {
            rows: vec![
                TableRow::data(Some("East"), 0).expandable(),
                TableRow::data(Some("East|Boston"), 1),
            ],
            ..Default::default()
        };
        assert!(table.validate_hierarchy().is_ok());

        table.rows.push(TableRow::data(Some("West|Denver"), 1));
        assert!(matches!(
            table.validate_hierarchy(),
            Err(ModelError::OrphanPath { .. })
        ));
    }

    #[test]
    fn test_processed_data_wire_format() {
        let json = r#"{"type": "chart", "labels": ["East", "West"],
            "datasets": [{"label": "Sales", "data": [100, null]}]}"#;
        let data: ProcessedData = serde_json::from_str(json).unwrap();
        match data {
            ProcessedData::Chart(chart) => {
                assert_eq!(chart.labels.len(), 2);
                assert_eq!(chart.datasets[0].data[0], DataPoint::Number(100.0));
                assert!(chart.datasets[0].data[1].is_null());
            }
            other => panic!("unexpected {:?}", other.kind()),
        }

        let nodata: ProcessedData = serde_json::from_str(r#"{"type": "nodata", "message": "x"}"#).unwrap();
        assert_eq!(nodata.kind(), "nodata");
        assert_eq!(nodata.message(), Some("x"));
    }

    #[test]
    fn test_data_point_shapes() {
        let points: Vec<DataPoint> = serde_json::from_str(
            r#"[{"x": 1, "y": 2}, {"x": 1, "y": 2, "r": 3},
                {"min": 1, "q1": 2, "median": 3, "q3": 4, "max": 5},
                {"name": "A", "value": 7}]"#,
        )
        .unwrap();
        assert_eq!(points[0], DataPoint::Point { x: 1.0, y: 2.0 });
        assert_eq!(points[1], DataPoint::Bubble { x: 1.0, y: 2.0, r: 3.0 });
        assert!(matches!(points[2], DataPoint::BoxPlot(_)));
        assert_eq!(points[3].value(), Some(7.0));
    }
}
