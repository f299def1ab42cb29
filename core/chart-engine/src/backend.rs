//! FILENAME: core/chart-engine/src/backend.rs
//! PURPOSE: The seam between the shared encoding and a concrete charting library.
//! CONTEXT: A backend declares which chart types it can draw, translates an
//! `EncodedChart` into its native option tree, and decodes its native click
//! payload into a `Hit`. Everything else is provided by the trait.

use engine::{ChartLibrary, ChartType, ProcessedData, Widget};
use serde_json::Value;

use crate::chartjs::ChartJsBackend;
use crate::echarts::EchartsBackend;
use crate::encoding::{encode, ChartInput, EncodedChart, Hit, Placeholder};
use crate::recharts::RechartsBackend;

static ECHARTS: EchartsBackend = EchartsBackend;
static CHARTJS: ChartJsBackend = ChartJsBackend;
static RECHARTS: RechartsBackend = RechartsBackend;

/// Result of rendering a widget through a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartRender {
    /// Native option tree plus the plan it was built from.
    Chart { options: Value, encoded: EncodedChart },
    Placeholder(Placeholder),
}

impl ChartRender {
    pub fn options(&self) -> Option<&Value> {
        match self {
            ChartRender::Chart { options, .. } => Some(options),
            ChartRender::Placeholder(_) => None,
        }
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        match self {
            ChartRender::Placeholder(p) => Some(p),
            ChartRender::Chart { .. } => None,
        }
    }

    pub fn encoded(&self) -> Option<&EncodedChart> {
        match self {
            ChartRender::Chart { encoded, .. } => Some(encoded),
            ChartRender::Placeholder(_) => None,
        }
    }
}

pub trait ChartBackend: Send + Sync {
    fn library(&self) -> ChartLibrary;

    fn supports(&self, chart_type: ChartType) -> bool;

    /// Native option tree for an encoded chart.
    fn translate(&self, encoded: &EncodedChart) -> Value;

    /// Decodes the library's click payload. `None` means empty space.
    fn resolve_hit(&self, native: &Value) -> Option<Hit>;

    fn unsupported(&self, chart_type: ChartType) -> Placeholder {
        Placeholder::unsupported(format!(
            "{} does not support {} charts",
            self.library().display_name(),
            chart_type.display_name()
        ))
    }

    /// Full pipeline: support check, shared encoding, native translation.
    fn render(&self, widget: &Widget, data: &ProcessedData) -> ChartRender {
        let input = match data {
            ProcessedData::Chart(chart) => ChartInput::Chart(chart),
            ProcessedData::Sankey(sankey) => {
                if !self.supports(ChartType::Sankey) {
                    return ChartRender::Placeholder(self.unsupported(ChartType::Sankey));
                }
                ChartInput::Sankey(sankey)
            }
            ProcessedData::Loading { message } | ProcessedData::NoData { message } => {
                return ChartRender::Placeholder(Placeholder {
                    kind: crate::encoding::PlaceholderKind::Empty,
                    message: message.clone(),
                })
            }
            ProcessedData::Table(_) | ProcessedData::Kpi(_) | ProcessedData::Heatmap(_) => {
                return ChartRender::Placeholder(Placeholder::unsupported(format!(
                    "{} results cannot be drawn as a chart",
                    data.kind()
                )))
            }
        };

        if widget.chart_type != ChartType::Map && !self.supports(widget.chart_type) {
            if let ChartInput::Chart(_) = input {
                return ChartRender::Placeholder(self.unsupported(widget.chart_type));
            }
        }

        match encode(widget, input) {
            Ok(encoded) => ChartRender::Chart {
                options: self.translate(&encoded),
                encoded,
            },
            Err(placeholder) => ChartRender::Placeholder(placeholder),
        }
    }
}

/// Backend for a library.
pub fn backend_for(library: ChartLibrary) -> &'static dyn ChartBackend {
    match library {
        ChartLibrary::Echarts => &ECHARTS,
        ChartLibrary::Chartjs => &CHARTJS,
        ChartLibrary::Recharts => &RECHARTS,
    }
}

/// Reads a non-negative integer field from a JSON object.
pub(crate) fn index_field(value: &Value, key: &str) -> Option<usize> {
    value.get(key)?.as_u64().map(|n| n as usize)
}
