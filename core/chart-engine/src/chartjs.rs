//! FILENAME: core/chart-engine/src/chartjs.rs
//! PURPOSE: Chart.js configuration builder.
//! CONTEXT: Treemap and box plot rely on the community controller plugins
//! (`treemap`, `boxplot` types). There is no gauge controller, so gauges are
//! drawn as a half doughnut. Sankey is not supported.

use engine::{AxisRole, ChartLibrary, ChartType, LegendPosition};
use serde_json::{json, Map, Value};

use crate::backend::{index_field, ChartBackend};
use crate::encoding::{
    AxisPlan, BoxPlotPlan, CartesianPlan, EncodedChart, Encoding, Frame, GaugePlan, Hit,
    Orientation, PiePlan, RadarPlan, ScatterPlan, SeriesKind, AREA_FILL_OPACITY,
};

/// Track color behind the gauge arc.
const GAUGE_TRACK_COLOR: &str = "#e5e7eb";

#[derive(Debug, Default, Clone, Copy)]
pub struct ChartJsBackend;

impl ChartBackend for ChartJsBackend {
    fn library(&self) -> ChartLibrary {
        ChartLibrary::Chartjs
    }

    fn supports(&self, chart_type: ChartType) -> bool {
        !matches!(
            chart_type,
            ChartType::Sankey | ChartType::Map | ChartType::Table | ChartType::Kpi | ChartType::Heatmap
        )
    }

    fn translate(&self, encoded: &EncodedChart) -> Value {
        let frame = &encoded.frame;
        let mut config = match &encoded.encoding {
            Encoding::Cartesian(plan) => cartesian(frame, plan),
            Encoding::Pie(plan) => pie(plan),
            Encoding::Scatter(plan) => scatter(frame, plan),
            Encoding::Treemap(plan) => treemap(plan),
            Encoding::BoxPlot(plan) => box_plot(frame, plan),
            Encoding::Funnel(plan) => funnel(plan),
            Encoding::Radar(plan) => radar(plan),
            Encoding::Gauge(plan) => gauge(plan),
            // excluded by supports()
            Encoding::Sankey(_) => return Value::Null,
        };
        let options = &mut config["options"];
        options["responsive"] = json!(true);
        options["maintainAspectRatio"] = json!(false);
        options["plugins"]["legend"] = json!({
            "display": frame.show_legend,
            "position": legend_position(frame.legend_position),
        });
        options["plugins"]["datalabels"] = json!({ "display": frame.show_data_labels });
        config
    }

    /// Active elements: `[{ "datasetIndex": 0, "index": 3 }]`
    fn resolve_hit(&self, native: &Value) -> Option<Hit> {
        let element = match native {
            Value::Array(elements) => elements.first()?,
            other => other,
        };
        Some(Hit {
            series: index_field(element, "datasetIndex").unwrap_or(0),
            data: index_field(element, "index")?,
        })
    }
}

fn legend_position(position: LegendPosition) -> &'static str {
    position.as_str()
}

/// Intl.NumberFormat options for tick labels.
fn tick_format(axis: &AxisPlan) -> Value {
    if axis.is_percent() {
        return json!({ "style": "percent", "maximumFractionDigits": 2 });
    }
    let format = axis.pill.as_ref().and_then(|p| p.formatting.as_ref());
    match format.and_then(|f| f.decimal_places) {
        Some(places) => json!({ "minimumFractionDigits": places, "maximumFractionDigits": places }),
        None => json!({
            "maximumFractionDigits": format.and_then(|f| f.maximum_fraction_digits).unwrap_or(2)
        }),
    }
}

fn title(text: Option<&str>) -> Value {
    match text {
        Some(text) => json!({ "display": true, "text": text }),
        None => json!({ "display": false }),
    }
}

fn cartesian(frame: &Frame, plan: &CartesianPlan) -> Value {
    let horizontal = plan.orientation == Orientation::Horizontal;
    let datasets: Vec<Value> = plan
        .series
        .iter()
        .map(|s| {
            let area = s.kind == SeriesKind::Area;
            let mut dataset = json!({
                "label": s.name,
                "type": if s.kind == SeriesKind::Bar { "bar" } else { "line" },
                "data": s.values,
                "formattedValues": s.formatted,
                "borderColor": s.color,
                "backgroundColor": if area { engine::translucent(s.color, AREA_FILL_OPACITY) } else { s.color.to_string() },
                "yAxisID": if s.axis == AxisRole::Secondary { "y1" } else { "y" },
            });
            if s.kind != SeriesKind::Bar {
                dataset["fill"] = if area { json!("origin") } else { json!(false) };
                dataset["tension"] = json!(if plan.smooth { 0.3 } else { 0.0 });
                dataset["spanGaps"] = json!(!s.stacked);
            }
            if s.stacked {
                dataset["stack"] = json!("total");
            }
            dataset
        })
        .collect();

    let mut scales = Map::new();
    let category_key = if horizontal { "y" } else { "x" };
    scales.insert(
        category_key.to_string(),
        json!({ "stacked": plan.stacked, "title": title(frame.x_axis_title.as_deref()) }),
    );
    for axis in &plan.value_axes {
        let (key, position) = match (axis.role, horizontal) {
            (AxisRole::Primary, true) => ("x", "bottom"),
            (AxisRole::Primary, false) => ("y", "left"),
            (AxisRole::Secondary, _) => ("y1", "right"),
        };
        let mut scale = json!({
            "type": "linear",
            "position": position,
            "stacked": plan.stacked,
            "beginAtZero": true,
            "ticks": { "format": tick_format(axis) },
            "title": title(frame.y_axis_title.as_deref().filter(|_| axis.role == AxisRole::Primary)),
        });
        if axis.role == AxisRole::Secondary {
            scale["grid"] = json!({ "drawOnChartArea": false });
        }
        scales.insert(key.to_string(), scale);
    }

    json!({
        "type": "bar",
        "data": { "labels": plan.categories, "datasets": datasets },
        "options": {
            "indexAxis": if horizontal { "y" } else { "x" },
            "scales": scales,
            "plugins": { "tooltip": { "mode": "nearest", "intersect": true } },
        }
    })
}

fn slice_labels(plan: &PiePlan) -> (Vec<&str>, Vec<f64>, Vec<&str>, Vec<&str>) {
    let mut labels = Vec::with_capacity(plan.slices.len());
    let mut values = Vec::with_capacity(plan.slices.len());
    let mut colors = Vec::with_capacity(plan.slices.len());
    let mut formatted = Vec::with_capacity(plan.slices.len());
    for slice in &plan.slices {
        labels.push(slice.name.as_str());
        values.push(slice.value);
        colors.push(slice.color);
        formatted.push(slice.formatted.as_str());
    }
    (labels, values, colors, formatted)
}

fn pie(plan: &PiePlan) -> Value {
    let (labels, values, colors, formatted) = slice_labels(plan);
    json!({
        "type": if plan.donut { "doughnut" } else { "pie" },
        "data": {
            "labels": labels,
            "datasets": [{
                "label": plan.series_name,
                "data": values,
                "backgroundColor": colors,
                "formattedValues": formatted,
            }]
        },
        "options": { "plugins": {} }
    })
}

fn scatter(frame: &Frame, plan: &ScatterPlan) -> Value {
    let datasets: Vec<Value> = plan
        .series
        .iter()
        .map(|s| {
            let data: Vec<Value> = s
                .points
                .iter()
                .map(|p| match p.radius {
                    Some(radius) => json!({ "x": p.x, "y": p.y, "r": radius }),
                    None => json!({ "x": p.x, "y": p.y }),
                })
                .collect();
            let tooltips: Vec<&str> = s.points.iter().map(|p| p.tooltip.as_str()).collect();
            json!({
                "label": s.name,
                "data": data,
                "tooltips": tooltips,
                "backgroundColor": engine::translucent(s.color, if plan.bubble { 0.7 } else { 1.0 }),
                "borderColor": s.color,
            })
        })
        .collect();

    json!({
        "type": if plan.bubble { "bubble" } else { "scatter" },
        "data": { "datasets": datasets },
        "options": {
            "scales": {
                "x": { "type": "linear", "ticks": { "format": tick_format(&plan.x_axis) },
                       "title": title(frame.x_axis_title.as_deref().or(plan.x_axis.title())) },
                "y": { "type": "linear", "ticks": { "format": tick_format(&plan.y_axis) },
                       "title": title(frame.y_axis_title.as_deref().or(plan.y_axis.title())) },
            },
            "plugins": {},
        }
    })
}

fn treemap(plan: &PiePlan) -> Value {
    let tree: Vec<Value> = plan
        .slices
        .iter()
        .map(|s| json!({ "name": s.name, "value": s.value, "formatted": s.formatted }))
        .collect();
    let colors: Vec<&str> = plan.slices.iter().map(|s| s.color).collect();
    json!({
        "type": "treemap",
        "data": {
            "datasets": [{
                "label": plan.series_name,
                "tree": tree,
                "key": "value",
                "backgroundColor": colors,
                "labels": { "display": true, "formatter": "name" },
            }]
        },
        "options": { "plugins": {} }
    })
}

fn box_plot(frame: &Frame, plan: &BoxPlotPlan) -> Value {
    let labels: Vec<&str> = plan.items.iter().map(|i| i.category.as_str()).collect();
    let data: Vec<Value> = plan
        .items
        .iter()
        .map(|i| {
            let s = &i.summary;
            json!({ "min": s.min, "q1": s.q1, "median": s.median, "q3": s.q3, "max": s.max })
        })
        .collect();
    let tooltips: Vec<&str> = plan.items.iter().map(|i| i.tooltip.as_str()).collect();
    json!({
        "type": "boxplot",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": plan.series_name,
                "data": data,
                "tooltips": tooltips,
                "backgroundColor": engine::translucent(plan.color, AREA_FILL_OPACITY),
                "borderColor": plan.color,
            }]
        },
        "options": {
            "scales": {
                "y": { "ticks": { "format": tick_format(&plan.axis) },
                       "title": title(frame.y_axis_title.as_deref()) },
            },
            "plugins": {},
        }
    })
}

/// Sorted horizontal bars.
fn funnel(plan: &PiePlan) -> Value {
    let (labels, values, colors, formatted) = slice_labels(plan);
    json!({
        "type": "bar",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": plan.series_name,
                "data": values,
                "backgroundColor": colors,
                "formattedValues": formatted,
                "barPercentage": 1.0,
                "categoryPercentage": 0.9,
            }]
        },
        "options": {
            "indexAxis": "y",
            "scales": { "x": { "display": false }, "y": { "grid": { "display": false } } },
            "plugins": {},
        }
    })
}

fn radar(plan: &RadarPlan) -> Value {
    let datasets: Vec<Value> = plan
        .series
        .iter()
        .map(|s| {
            json!({
                "label": s.name,
                "data": s.values,
                "formattedValues": s.formatted,
                "borderColor": s.color,
                "backgroundColor": engine::translucent(s.color, AREA_FILL_OPACITY),
                "fill": true,
                "spanGaps": true,
            })
        })
        .collect();
    json!({
        "type": "radar",
        "data": { "labels": plan.indicators, "datasets": datasets },
        "options": {
            "scales": { "r": { "min": 0, "max": plan.max, "beginAtZero": true } },
            "plugins": {},
        }
    })
}

/// Half doughnut: value arc plus the remaining track.
fn gauge(plan: &GaugePlan) -> Value {
    let filled = plan.value.clamp(0.0, plan.max);
    json!({
        "type": "doughnut",
        "data": {
            "labels": [plan.label, ""],
            "datasets": [{
                "data": [filled, plan.max - filled],
                "backgroundColor": [plan.color, GAUGE_TRACK_COLOR],
                "borderWidth": 0,
                "circumference": 180,
                "rotation": 270,
                "cutout": "75%",
            }]
        },
        "options": {
            "plugins": {
                "tooltip": { "enabled": false },
                "centerText": { "text": plan.formatted, "subtext": plan.label },
            },
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{Aggregation, ChartData, ChartDataset, Pill, ProcessedData, Widget};

    fn render(widget: &Widget, data: ChartData) -> Value {
        ChartJsBackend
            .render(widget, &ProcessedData::Chart(data))
            .options()
            .cloned()
            .expect("chart config")
    }

    fn widget(chart_type: ChartType) -> Widget {
        let mut w = Widget::new("w1", chart_type);
        w.shelves.columns.push(Pill::dimension("c1", "Region"));
        w.shelves.values.push(Pill::measure("v1", "Sales", Aggregation::Sum));
        w
    }

    fn data() -> ChartData {
        ChartData {
            labels: vec!["East".into(), "West".into(), "North".into()],
            datasets: vec![ChartDataset::numbers("Sales", &[Some(5.0), None, Some(7.0)])],
        }
    }

    #[test]
    fn test_stacked_area_fill() {
        let mut w = widget(ChartType::Area);
        w.is_stacked = true;
        let config = render(&w, data());
        let dataset = &config["data"]["datasets"][0];
        assert_eq!(dataset["fill"], "origin");
        assert_eq!(dataset["data"], json!([5.0, 0.0, 7.0]));
        assert_eq!(config["options"]["scales"]["y"]["stacked"], true);
    }

    #[test]
    fn test_line_spans_gaps() {
        let config = render(&widget(ChartType::Line), data());
        let dataset = &config["data"]["datasets"][0];
        assert_eq!(dataset["spanGaps"], true);
        assert!(dataset["data"][1].is_null());
    }

    #[test]
    fn test_gauge_is_half_doughnut() {
        let config = render(&widget(ChartType::Gauge), data());
        assert_eq!(config["type"], "doughnut");
        assert_eq!(config["data"]["datasets"][0]["circumference"], 180);
    }

    #[test]
    fn test_legend_hidden() {
        let mut w = widget(ChartType::Pie);
        w.chart_settings = Some(engine::ChartSettings {
            show_legend: Some(false),
            ..Default::default()
        });
        let config = render(&w, data());
        assert_eq!(config["options"]["plugins"]["legend"]["display"], false);
        assert_eq!(config["options"]["plugins"]["legend"]["position"], "bottom");
    }

    #[test]
    fn test_resolve_active_elements() {
        let hit = ChartJsBackend.resolve_hit(&json!([{ "datasetIndex": 0, "index": 2 }]));
        assert_eq!(hit, Some(Hit { series: 0, data: 2 }));
        assert_eq!(ChartJsBackend.resolve_hit(&json!([])), None);
    }
}
