//! FILENAME: core/chart-engine/src/encoding.rs
//! Chart Encoding - the backend-neutral visual plan.
//!
//! Every per-chart-type rule lives here so the three backends stay
//! behaviourally identical. A backend only translates an `EncodedChart`
//! into its own option schema.
//!
//! Rules:
//! - BAR is horizontal when a row dimension exists and no column dimension.
//! - Stacking applies to BAR and AREA only; stacked nulls become 0.
//! - Unstacked LINE/AREA keep nulls and connect across them.
//! - PIE/DONUT/TREEMAP/FUNNEL/BOXPLOT/GAUGE use the first dataset only.
//! - Every rendered point remembers its index into `labels`.

use engine::{
    format_f64, AxisRole, BoxPlotSummary, ChartData, ChartDataset, ChartType, DataPoint,
    LegendPosition, Palette, Pill, SankeyData, SankeyLink, Widget,
};
use serde::{Deserialize, Serialize};

use crate::tooltip::{axis_pill, box_plot_tooltip, format_with, pill_for_dataset};

/// Smallest bubble radius, so zero-sized values stay visible.
pub const MIN_BUBBLE_RADIUS: f64 = 4.0;
/// Multiplier applied to sqrt(r).
pub const BUBBLE_SCALE: f64 = 2.0;
/// Headroom applied to the radar's shared radial maximum.
pub const RADAR_HEADROOM: f64 = 1.1;
/// Radial maximum used when no positive value exists.
pub const RADAR_FALLBACK_MAX: f64 = 100.0;
/// Opacity of area fills.
pub const AREA_FILL_OPACITY: f32 = 0.35;

// ============================================================================
// INPUT AND PLACEHOLDERS
// ============================================================================

/// The processed-data shapes a chart backend can consume.
#[derive(Debug, Clone, Copy)]
pub enum ChartInput<'a> {
    Chart(&'a ChartData),
    Sankey(&'a SankeyData),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderKind {
    /// The chart type / backend combination cannot be drawn.
    Unsupported,
    /// The shelves are incomplete for this chart type.
    Instruction,
    /// Nothing to draw.
    Empty,
}

/// A message rendered in place of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub message: String,
}

impl Placeholder {
    pub fn unsupported(message: impl Into<String>) -> Self {
        Placeholder {
            kind: PlaceholderKind::Unsupported,
            message: message.into(),
        }
    }

    pub fn instruction(message: impl Into<String>) -> Self {
        Placeholder {
            kind: PlaceholderKind::Instruction,
            message: message.into(),
        }
    }

    pub fn empty() -> Self {
        Placeholder {
            kind: PlaceholderKind::Empty,
            message: "No data to display".to_string(),
        }
    }
}

// ============================================================================
// PLAN TYPES
// ============================================================================

/// Presentation shared by every encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub chart_type: ChartType,
    pub title: String,
    pub show_legend: bool,
    pub legend_position: LegendPosition,
    pub palette: Palette,
    pub show_data_labels: bool,
    pub x_axis_title: Option<String>,
    pub y_axis_title: Option<String>,
}

impl Frame {
    pub fn from_widget(widget: &Widget) -> Self {
        let settings = widget.settings();
        Frame {
            chart_type: widget.chart_type,
            title: widget.title.clone(),
            show_legend: settings.legend_visible(),
            legend_position: settings.legend_position(),
            palette: Palette::named(widget.color_palette.as_deref()),
            show_data_labels: settings.show_data_labels.unwrap_or(false),
            x_axis_title: settings.x_axis_title,
            y_axis_title: settings.y_axis_title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Bar,
    Line,
    Area,
}

/// A value axis and the pill that formats its ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisPlan {
    pub role: AxisRole,
    pub pill: Option<Pill>,
}

impl AxisPlan {
    pub fn format_tick(&self, value: f64) -> String {
        format_with(self.pill.as_ref(), value)
    }

    pub fn prefix(&self) -> &str {
        self.pill
            .as_ref()
            .and_then(|p| p.formatting.as_ref())
            .and_then(|f| f.prefix.as_deref())
            .unwrap_or("")
    }

    pub fn suffix(&self) -> &str {
        self.pill
            .as_ref()
            .and_then(|p| p.formatting.as_ref())
            .and_then(|f| f.suffix.as_deref())
            .unwrap_or("")
    }

    pub fn is_percent(&self) -> bool {
        self.pill
            .as_ref()
            .map(|p| p.aggregation == Some(engine::Aggregation::PercentOfTotal))
            .unwrap_or(false)
    }

    pub fn title(&self) -> Option<&str> {
        self.pill.as_ref().map(|p| p.display_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPlan {
    pub name: String,
    pub kind: SeriesKind,
    pub axis: AxisRole,
    pub color: &'static str,
    pub values: Vec<Option<f64>>,
    pub formatted: Vec<String>,
    pub stacked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartesianPlan {
    pub orientation: Orientation,
    pub stacked: bool,
    pub smooth: bool,
    pub categories: Vec<String>,
    pub series: Vec<SeriesPlan>,
    pub value_axes: Vec<AxisPlan>,
}

impl CartesianPlan {
    pub fn is_dual_axis(&self) -> bool {
        self.value_axes.len() > 1
    }
}

/// One labelled value (pie slice, treemap tile, funnel stage).
#[derive(Debug, Clone, PartialEq)]
pub struct SlicePlan {
    pub name: String,
    pub value: f64,
    pub formatted: String,
    pub color: &'static str,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PiePlan {
    pub series_name: String,
    pub donut: bool,
    pub slices: Vec<SlicePlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub r: Option<f64>,
    pub radius: Option<f64>,
    pub label: String,
    pub tooltip: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub name: String,
    pub color: &'static str,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlan {
    pub bubble: bool,
    pub x_axis: AxisPlan,
    pub y_axis: AxisPlan,
    pub series: Vec<ScatterSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotItem {
    pub category: String,
    pub summary: BoxPlotSummary,
    pub tooltip: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotPlan {
    pub series_name: String,
    pub color: &'static str,
    pub items: Vec<BoxPlotItem>,
    pub axis: AxisPlan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarPlan {
    pub indicators: Vec<String>,
    pub max: f64,
    pub series: Vec<SeriesPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GaugePlan {
    pub label: String,
    pub value: f64,
    pub max: f64,
    pub formatted: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SankeyPlan {
    pub nodes: Vec<String>,
    pub links: Vec<SankeyLink>,
    pub link_tooltips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Encoding {
    Cartesian(CartesianPlan),
    Pie(PiePlan),
    Scatter(ScatterPlan),
    Treemap(PiePlan),
    BoxPlot(BoxPlotPlan),
    Funnel(PiePlan),
    Radar(RadarPlan),
    Gauge(GaugePlan),
    Sankey(SankeyPlan),
}

/// A click/hover target in renderer terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub series: usize,
    pub data: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedChart {
    pub frame: Frame,
    pub encoding: Encoding,
}

impl EncodedChart {
    /// Maps a rendered element back to its position in `labels`.
    pub fn label_index(&self, hit: Hit) -> Option<usize> {
        match &self.encoding {
            Encoding::Cartesian(plan) => (hit.data < plan.categories.len()).then_some(hit.data),
            Encoding::Pie(plan) | Encoding::Treemap(plan) | Encoding::Funnel(plan) => {
                plan.slices.get(hit.data).map(|s| s.index)
            }
            Encoding::Scatter(plan) => plan
                .series
                .get(hit.series)
                .and_then(|s| s.points.get(hit.data))
                .map(|p| p.index),
            Encoding::BoxPlot(plan) => plan.items.get(hit.data).map(|i| i.index),
            Encoding::Radar(_) => None,
            Encoding::Gauge(_) => (hit.data == 0).then_some(0),
            Encoding::Sankey(plan) => (hit.data < plan.nodes.len()).then_some(hit.data),
        }
    }

    /// Tooltip text for a rendered element.
    pub fn tooltip(&self, hit: Hit) -> Option<String> {
        match &self.encoding {
            Encoding::Cartesian(plan) => {
                let series = plan.series.get(hit.series)?;
                let category = plan.categories.get(hit.data)?;
                let value = series.formatted.get(hit.data)?;
                Some(format!("{}\n{}: {}", category, series.name, value))
            }
            Encoding::Radar(plan) => {
                let series = plan.series.get(hit.series)?;
                let indicator = plan.indicators.get(hit.data)?;
                let value = series.formatted.get(hit.data)?;
                Some(format!("{}\n{}: {}", series.name, indicator, value))
            }
            Encoding::Pie(plan) | Encoding::Treemap(plan) | Encoding::Funnel(plan) => {
                let slice = plan.slices.get(hit.data)?;
                Some(format!("{}: {}", slice.name, slice.formatted))
            }
            Encoding::Scatter(plan) => plan
                .series
                .get(hit.series)
                .and_then(|s| s.points.get(hit.data))
                .map(|p| p.tooltip.clone()),
            Encoding::BoxPlot(plan) => plan.items.get(hit.data).map(|i| i.tooltip.clone()),
            Encoding::Gauge(plan) => Some(format!("{}: {}", plan.label, plan.formatted)),
            Encoding::Sankey(plan) => plan.link_tooltips.get(hit.data).cloned(),
        }
    }
}

// ============================================================================
// ENCODER
// ============================================================================

/// Applies the per-chart-type rules. Returns a placeholder when the
/// configuration cannot produce a chart.
pub fn encode(widget: &Widget, input: ChartInput<'_>) -> Result<EncodedChart, Placeholder> {
    let frame = Frame::from_widget(widget);

    let encoding = match input {
        ChartInput::Sankey(data) => encode_sankey(data)?,
        ChartInput::Chart(data) => {
            if data.datasets.is_empty() {
                return Err(Placeholder::empty());
            }
            match widget.chart_type {
                ChartType::Bar | ChartType::Line | ChartType::Area | ChartType::DualAxis => {
                    Encoding::Cartesian(encode_cartesian(widget, &frame, data))
                }
                ChartType::Pie | ChartType::Donut => Encoding::Pie(encode_pie(widget, &frame, data)),
                ChartType::Scatter | ChartType::Bubble => {
                    Encoding::Scatter(encode_scatter(widget, &frame, data)?)
                }
                ChartType::Treemap => Encoding::Treemap(encode_treemap(widget, &frame, data)),
                ChartType::Boxplot => Encoding::BoxPlot(encode_box_plot(widget, &frame, data)),
                ChartType::Funnel => Encoding::Funnel(encode_funnel(widget, &frame, data)),
                ChartType::Radar => Encoding::Radar(encode_radar(widget, &frame, data)),
                ChartType::Gauge => Encoding::Gauge(encode_gauge(widget, &frame, data)?),
                ChartType::Sankey => {
                    return Err(Placeholder::instruction(
                        "Sankey charts need a source dimension, a target dimension and a measure",
                    ))
                }
                ChartType::Map => {
                    return Err(Placeholder::unsupported("Geographic maps are not supported"))
                }
                ChartType::Table | ChartType::Kpi | ChartType::Heatmap => {
                    return Err(Placeholder::unsupported(format!(
                        "{} widgets are not rendered as charts",
                        widget.chart_type.display_name()
                    )))
                }
            }
        }
    };

    Ok(EncodedChart { frame, encoding })
}

/// BAR orientation rule.
pub fn bar_orientation(widget: &Widget) -> Orientation {
    let shelves = &widget.shelves;
    if widget.chart_type == ChartType::Bar && !shelves.rows.is_empty() && shelves.columns.is_empty() {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    }
}

/// Shared radial maximum: 1.1x the largest non-null value, or 100 when no
/// value is positive.
pub fn radar_max(datasets: &[ChartDataset]) -> f64 {
    let max = datasets
        .iter()
        .flat_map(|d| d.data.iter())
        .filter_map(DataPoint::value)
        .fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        max * RADAR_HEADROOM
    } else {
        RADAR_FALLBACK_MAX
    }
}

/// Non-linear bubble radius with a visibility floor.
pub fn bubble_radius(r: f64) -> f64 {
    (r.max(0.0).sqrt() * BUBBLE_SCALE).max(MIN_BUBBLE_RADIUS)
}

/// Axis assignment for dual-axis datasets: explicit tags win, otherwise
/// the first `values.len()` datasets go to the primary axis.
pub fn dual_axis_roles(widget: &Widget, datasets: &[ChartDataset]) -> Vec<AxisRole> {
    if datasets.iter().any(|d| d.axis.is_some()) {
        return datasets
            .iter()
            .map(|d| d.axis.unwrap_or(AxisRole::Primary))
            .collect();
    }
    let primary_count = widget.shelves.values.len().max(1);
    (0..datasets.len())
        .map(|i| {
            if i < primary_count {
                AxisRole::Primary
            } else {
                AxisRole::Secondary
            }
        })
        .collect()
}

fn encode_cartesian(widget: &Widget, frame: &Frame, data: &ChartData) -> CartesianPlan {
    let chart_type = widget.chart_type;
    let stacked = widget.stacking_enabled();
    let dual = chart_type == ChartType::DualAxis;
    let roles = if dual {
        dual_axis_roles(widget, &data.datasets)
    } else {
        vec![AxisRole::Primary; data.datasets.len()]
    };

    let series = data
        .datasets
        .iter()
        .enumerate()
        .map(|(i, dataset)| {
            let axis = roles[i];
            let kind = match (chart_type, axis) {
                (ChartType::DualAxis, AxisRole::Primary) => SeriesKind::Bar,
                (ChartType::DualAxis, AxisRole::Secondary) => SeriesKind::Line,
                (ChartType::Line, _) => SeriesKind::Line,
                (ChartType::Area, _) => SeriesKind::Area,
                _ => SeriesKind::Bar,
            };
            let pill = pill_for_dataset(&widget.shelves, dataset, i);
            let values: Vec<Option<f64>> = (0..data.labels.len())
                .map(|j| {
                    let raw = dataset.data.get(j).and_then(DataPoint::value);
                    if stacked {
                        Some(raw.unwrap_or(0.0))
                    } else {
                        raw
                    }
                })
                .collect();
            let formatted = values
                .iter()
                .map(|v| match v {
                    Some(n) => format_with(pill, *n),
                    None => engine::MISSING_VALUE.to_string(),
                })
                .collect();
            SeriesPlan {
                name: dataset.label.clone(),
                kind,
                axis,
                color: frame.palette.color(i),
                values,
                formatted,
                stacked,
            }
        })
        .collect();

    let mut value_axes = vec![AxisPlan {
        role: AxisRole::Primary,
        pill: axis_pill(widget, &data.datasets, &roles, AxisRole::Primary).cloned(),
    }];
    if dual {
        value_axes.push(AxisPlan {
            role: AxisRole::Secondary,
            pill: axis_pill(widget, &data.datasets, &roles, AxisRole::Secondary).cloned(),
        });
    }

    CartesianPlan {
        orientation: bar_orientation(widget),
        stacked,
        smooth: matches!(chart_type, ChartType::Line | ChartType::Area | ChartType::DualAxis),
        categories: data.labels.clone(),
        series,
        value_axes,
    }
}

/// Label for the `i`-th item of a first-dataset encoding.
fn item_name(data: &ChartData, point: &DataPoint, i: usize) -> String {
    match point {
        DataPoint::Named { name, .. } => name.clone(),
        _ => data.labels.get(i).cloned().unwrap_or_default(),
    }
}

fn first_dataset_slices(widget: &Widget, frame: &Frame, data: &ChartData) -> (String, Vec<SlicePlan>) {
    let Some(dataset) = data.datasets.first() else {
        return (String::new(), Vec::new());
    };
    let pill = pill_for_dataset(&widget.shelves, dataset, 0);
    let slices = dataset
        .data
        .iter()
        .enumerate()
        .filter_map(|(i, point)| {
            let value = point.value()?;
            Some(SlicePlan {
                name: item_name(data, point, i),
                value,
                formatted: format_with(pill, value),
                color: frame.palette.color(i),
                index: i,
            })
        })
        .collect();
    (dataset.label.clone(), slices)
}

fn encode_pie(widget: &Widget, frame: &Frame, data: &ChartData) -> PiePlan {
    let (series_name, slices) = first_dataset_slices(widget, frame, data);
    PiePlan {
        series_name,
        donut: widget.chart_type == ChartType::Donut,
        slices,
    }
}

fn encode_treemap(widget: &Widget, frame: &Frame, data: &ChartData) -> PiePlan {
    let (series_name, slices) = first_dataset_slices(widget, frame, data);
    PiePlan {
        series_name,
        donut: false,
        slices,
    }
}

fn encode_funnel(widget: &Widget, frame: &Frame, data: &ChartData) -> PiePlan {
    let (series_name, mut slices) = first_dataset_slices(widget, frame, data);
    slices.sort_by(|a, b| b.value.total_cmp(&a.value));
    PiePlan {
        series_name,
        donut: false,
        slices,
    }
}

fn encode_scatter(widget: &Widget, frame: &Frame, data: &ChartData) -> Result<ScatterPlan, Placeholder> {
    let bubble = widget.chart_type == ChartType::Bubble;
    let values = &widget.shelves.values;
    if values.len() < 2 {
        return Err(Placeholder::instruction(format!(
            "{} charts need an X measure and a Y measure on the values shelf",
            if bubble { "Bubble" } else { "Scatter" }
        )));
    }
    if bubble && values.len() < 3 {
        return Err(Placeholder::instruction(
            "Bubble charts need a third measure for the bubble size",
        ));
    }

    let x_pill = &values[0];
    let y_pill = &values[1];
    let r_pill = values.get(2);

    let series = data
        .datasets
        .iter()
        .enumerate()
        .map(|(s, dataset)| {
            let points = dataset
                .data
                .iter()
                .enumerate()
                .filter_map(|(i, point)| {
                    let (x, y, r) = match *point {
                        DataPoint::Point { x, y } => (x, y, None),
                        DataPoint::Bubble { x, y, r } => (x, y, Some(r)),
                        _ => return None,
                    };
                    if bubble && r.is_none() {
                        return None;
                    }
                    let label = data.labels.get(i).cloned().unwrap_or_default();
                    let mut tooltip = format!(
                        "{}\n{}: {}\n{}: {}",
                        label,
                        x_pill.display_name(),
                        format_with(Some(x_pill), x),
                        y_pill.display_name(),
                        format_with(Some(y_pill), y)
                    );
                    if let (Some(r), Some(r_pill)) = (r, r_pill) {
                        tooltip.push_str(&format!(
                            "\n{}: {}",
                            r_pill.display_name(),
                            format_with(Some(r_pill), r)
                        ));
                    }
                    Some(ScatterPoint {
                        x,
                        y,
                        r,
                        radius: if bubble { r.map(bubble_radius) } else { None },
                        label,
                        tooltip,
                        index: i,
                    })
                })
                .collect();
            ScatterSeries {
                name: dataset.label.clone(),
                color: frame.palette.color(s),
                points,
            }
        })
        .collect();

    Ok(ScatterPlan {
        bubble,
        x_axis: AxisPlan {
            role: AxisRole::Primary,
            pill: Some(x_pill.clone()),
        },
        y_axis: AxisPlan {
            role: AxisRole::Primary,
            pill: Some(y_pill.clone()),
        },
        series,
    })
}

fn encode_box_plot(widget: &Widget, frame: &Frame, data: &ChartData) -> BoxPlotPlan {
    let dataset = data.datasets.first();
    let pill = dataset.and_then(|d| pill_for_dataset(&widget.shelves, d, 0));
    let items = dataset
        .map(|d| {
            d.data
                .iter()
                .enumerate()
                .filter_map(|(i, point)| match point {
                    DataPoint::BoxPlot(summary) => {
                        let category = data.labels.get(i).cloned().unwrap_or_default();
                        Some(BoxPlotItem {
                            tooltip: format!("{}\n{}", category, box_plot_tooltip(summary, pill)),
                            category,
                            summary: *summary,
                            index: i,
                        })
                    }
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    BoxPlotPlan {
        series_name: dataset.map(|d| d.label.clone()).unwrap_or_default(),
        color: frame.palette.color(0),
        items,
        axis: AxisPlan {
            role: AxisRole::Primary,
            pill: pill.cloned(),
        },
    }
}

fn encode_radar(widget: &Widget, frame: &Frame, data: &ChartData) -> RadarPlan {
    let series = data
        .datasets
        .iter()
        .enumerate()
        .map(|(i, dataset)| {
            let pill = pill_for_dataset(&widget.shelves, dataset, i);
            let values: Vec<Option<f64>> = (0..data.labels.len())
                .map(|j| dataset.data.get(j).and_then(DataPoint::value))
                .collect();
            let formatted = values
                .iter()
                .map(|v| match v {
                    Some(n) => format_with(pill, *n),
                    None => engine::MISSING_VALUE.to_string(),
                })
                .collect();
            SeriesPlan {
                name: dataset.label.clone(),
                kind: SeriesKind::Area,
                axis: AxisRole::Primary,
                color: frame.palette.color(i),
                values,
                formatted,
                stacked: false,
            }
        })
        .collect();

    RadarPlan {
        indicators: data.labels.clone(),
        max: radar_max(&data.datasets),
        series,
    }
}

fn encode_gauge(widget: &Widget, frame: &Frame, data: &ChartData) -> Result<GaugePlan, Placeholder> {
    let dataset = data.datasets.first().ok_or_else(Placeholder::empty)?;
    let value = dataset
        .data
        .iter()
        .find_map(DataPoint::value)
        .ok_or_else(Placeholder::empty)?;
    let pill = widget.shelves.values.first();
    let max = widget
        .settings()
        .gauge_max
        .filter(|m| *m > 0.0)
        .unwrap_or_else(|| gauge_ceiling(value));

    Ok(GaugePlan {
        label: pill
            .map(|p| p.display_name().to_string())
            .unwrap_or_else(|| dataset.label.clone()),
        value,
        max,
        formatted: format_with(pill, value),
        color: frame.palette.color(0),
    })
}

/// Round gauge maximum with some headroom above the value.
fn gauge_ceiling(value: f64) -> f64 {
    if value <= 0.0 || !value.is_finite() {
        return 100.0;
    }
    let target = value * 1.2;
    let magnitude = 10f64.powf(target.log10().floor());
    (target / magnitude).ceil() * magnitude
}

fn encode_sankey(data: &SankeyData) -> Result<Encoding, Placeholder> {
    if data.links.is_empty() {
        return Err(Placeholder::empty());
    }
    let link_tooltips = data
        .links
        .iter()
        .map(|l| format!("{} → {}: {}", l.source, l.target, format_f64(l.value, None, None)))
        .collect();
    Ok(Encoding::Sankey(SankeyPlan {
        nodes: data.nodes.iter().map(|n| n.name.clone()).collect(),
        links: data.links.clone(),
        link_tooltips,
    }))
}
