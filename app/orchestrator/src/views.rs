//! FILENAME: app/orchestrator/src/views.rs
//! PURPOSE: Render models for the result kinds that need no chart backend:
//! loading skeletons, KPI cards and heatmaps.

use engine::{
    format_f64, ChartType, Color, HeatmapData, KpiData, KpiValue, Palette, Pill, Widget,
};
use serde::Serialize;

// ============================================================================
// LOADING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkeletonKind {
    Table,
    Chart,
    Kpi,
    Heatmap,
}

impl SkeletonKind {
    pub fn for_chart_type(chart_type: ChartType) -> Self {
        match chart_type {
            ChartType::Table => SkeletonKind::Table,
            ChartType::Kpi => SkeletonKind::Kpi,
            ChartType::Heatmap => SkeletonKind::Heatmap,
            _ => SkeletonKind::Chart,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingPlaceholder {
    pub kind: SkeletonKind,
    pub message: String,
}

impl LoadingPlaceholder {
    pub fn for_widget(widget: &Widget, message: impl Into<String>) -> Self {
        LoadingPlaceholder {
            kind: SkeletonKind::for_chart_type(widget.chart_type),
            message: message.into(),
        }
    }
}

// ============================================================================
// KPI
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiCard {
    pub label: String,
    pub primary: String,
    pub secondary_label: Option<String>,
    pub secondary: Option<String>,
    /// Change of primary against secondary, in percent.
    pub delta_percent: Option<f64>,
    pub delta_text: Option<String>,
    pub trend: Trend,
}

impl KpiCard {
    pub fn build(data: &KpiData, widget: &Widget) -> Self {
        let pill = widget.shelves.values.first();
        let secondary = data.secondary_value.as_ref();

        let delta_percent = secondary.and_then(|s| {
            let current = data.primary_value.value.as_f64()?;
            let baseline = s.value.as_f64()?;
            if baseline == 0.0 || current.is_nan() || baseline.is_nan() {
                None
            } else {
                Some((current - baseline) / baseline.abs() * 100.0)
            }
        });
        let trend = match delta_percent {
            Some(d) if d > 0.0 => Trend::Up,
            Some(d) if d < 0.0 => Trend::Down,
            _ => Trend::Flat,
        };

        KpiCard {
            label: data.primary_value.label.clone(),
            primary: kpi_text(&data.primary_value, pill),
            secondary_label: secondary.map(|s| s.label.clone()),
            secondary: secondary.map(|s| kpi_text(s, pill)),
            delta_percent,
            delta_text: delta_percent.map(|d| format!("{}{:.1}%", if d > 0.0 { "+" } else { "" }, d)),
            trend,
        }
    }
}

/// Pre-formatted text from the processor wins over the pill's format.
fn kpi_text(value: &KpiValue, pill: Option<&Pill>) -> String {
    if !value.formatted.is_empty() {
        return value.formatted.clone();
    }
    engine::format_value(
        &value.value,
        pill.and_then(|p| p.formatting.as_ref()),
        pill.and_then(|p| p.aggregation),
    )
}

// ============================================================================
// HEATMAP
// ============================================================================

const HEAT_LOW: Color = Color::new(239, 246, 255);
const LIGHT_TEXT: &str = "#ffffff";
const DARK_TEXT: &str = "#111827";
const LIGHT_TEXT_THRESHOLD: f64 = 0.55;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub value: Option<f64>,
    pub text: String,
    /// Position of the value between the matrix minimum (0) and maximum (1).
    pub intensity: Option<f64>,
    pub background: Option<String>,
    pub text_color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapView {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub cells: Vec<Vec<HeatmapCell>>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl HeatmapView {
    pub fn build(data: &HeatmapData, widget: &Widget) -> Self {
        let palette = Palette::named(widget.color_palette.as_deref());
        let high = Color::from_hex(palette.color(0)).unwrap_or(Color::new(37, 99, 235));
        let pill = data.value_pill.as_ref();

        let finite = data.data.iter().flatten().flatten().copied().filter(|v| v.is_finite());
        let (min, max) = finite.fold((None, None), |(lo, hi): (Option<f64>, Option<f64>), v| {
            (Some(lo.map_or(v, |l| l.min(v))), Some(hi.map_or(v, |h| h.max(v))))
        });

        let cells = data
            .data
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let value = cell.filter(|v| v.is_finite());
                        let intensity = match (value, min, max) {
                            (Some(v), Some(lo), Some(hi)) if hi > lo => Some((v - lo) / (hi - lo)),
                            (Some(_), Some(_), Some(_)) => Some(1.0),
                            _ => None,
                        };
                        HeatmapCell {
                            value,
                            text: match cell {
                                Some(v) => format_f64(*v, pill.and_then(|p| p.formatting.as_ref()), pill.and_then(|p| p.aggregation)),
                                None => engine::MISSING_VALUE.to_string(),
                            },
                            intensity,
                            background: intensity.map(|t| HEAT_LOW.lerp(&high, t).to_css()),
                            text_color: match intensity {
                                Some(t) if t > LIGHT_TEXT_THRESHOLD => LIGHT_TEXT,
                                _ => DARK_TEXT,
                            },
                        }
                    })
                    .collect()
            })
            .collect();

        HeatmapView {
            row_labels: data.row_labels.clone(),
            col_labels: data.col_labels.clone(),
            cells,
            min,
            max,
        }
    }
}
