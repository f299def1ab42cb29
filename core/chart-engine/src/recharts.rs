//! FILENAME: core/chart-engine/src/recharts.rs
//! PURPOSE: Recharts component-tree descriptor builder.
//! CONTEXT: The host mounts the descriptor as React components. Recharts
//! reads row-oriented data, so series values are pivoted into one object per
//! category keyed `s0`, `s1`, ... (dots in a dataKey would be read as a path).
//! No gauge or sankey component exists; box plots are stacked bar segments.

use engine::{AxisRole, ChartLibrary, ChartType, LegendPosition};
use serde_json::{json, Map, Value};

use crate::backend::{index_field, ChartBackend};
use crate::encoding::{
    AxisPlan, BoxPlotPlan, CartesianPlan, EncodedChart, Encoding, Frame, Hit, Orientation,
    PiePlan, RadarPlan, ScatterPlan, SeriesKind, AREA_FILL_OPACITY,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct RechartsBackend;

impl ChartBackend for RechartsBackend {
    fn library(&self) -> ChartLibrary {
        ChartLibrary::Recharts
    }

    fn supports(&self, chart_type: ChartType) -> bool {
        !matches!(
            chart_type,
            ChartType::Gauge
                | ChartType::Sankey
                | ChartType::Map
                | ChartType::Table
                | ChartType::Kpi
                | ChartType::Heatmap
        )
    }

    fn translate(&self, encoded: &EncodedChart) -> Value {
        let frame = &encoded.frame;
        let mut tree = match &encoded.encoding {
            Encoding::Cartesian(plan) => cartesian(frame, plan),
            Encoding::Pie(plan) => pie(frame, plan),
            Encoding::Scatter(plan) => scatter(frame, plan),
            Encoding::Treemap(plan) => treemap(plan),
            Encoding::BoxPlot(plan) => box_plot(frame, plan),
            Encoding::Funnel(plan) => funnel(frame, plan),
            Encoding::Radar(plan) => radar(plan),
            // excluded by supports()
            Encoding::Gauge(_) | Encoding::Sankey(_) => return Value::Null,
        };
        if frame.show_legend {
            tree["legend"] = legend(frame.legend_position);
        }
        tree["tooltip"] = json!({ "formatterSuffix": FORMATTED_SUFFIX });
        tree
    }

    /// `{ "activeTooltipIndex": 2 }` from chart-level handlers, or
    /// `{ "seriesIndex": 0, "index": 2 }` from element handlers.
    fn resolve_hit(&self, native: &Value) -> Option<Hit> {
        let data = index_field(native, "activeTooltipIndex").or_else(|| index_field(native, "index"))?;
        Some(Hit {
            series: index_field(native, "seriesIndex").unwrap_or(0),
            data,
        })
    }
}

/// Key suffix carrying the formatted twin of a value field.
const FORMATTED_SUFFIX: &str = "__formatted";

fn series_key(index: usize) -> String {
    format!("s{}", index)
}

fn legend(position: LegendPosition) -> Value {
    match position {
        LegendPosition::Top | LegendPosition::Bottom => json!({
            "verticalAlign": position.as_str(),
            "align": "center",
            "layout": "horizontal",
        }),
        LegendPosition::Left | LegendPosition::Right => json!({
            "verticalAlign": "middle",
            "align": position.as_str(),
            "layout": "vertical",
        }),
    }
}

fn tick_format(axis: &AxisPlan) -> Value {
    json!({
        "prefix": axis.prefix(),
        "suffix": axis.suffix(),
        "percent": axis.is_percent(),
    })
}

fn cartesian(frame: &Frame, plan: &CartesianPlan) -> Value {
    let rows: Vec<Value> = plan
        .categories
        .iter()
        .enumerate()
        .map(|(j, category)| {
            let mut row = Map::new();
            row.insert("name".to_string(), json!(category));
            for (i, s) in plan.series.iter().enumerate() {
                let key = series_key(i);
                row.insert(format!("{}{}", key, FORMATTED_SUFFIX), json!(s.formatted.get(j)));
                row.insert(key, json!(s.values.get(j).copied().flatten()));
            }
            Value::Object(row)
        })
        .collect();

    let series: Vec<Value> = plan
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let component = match s.kind {
                SeriesKind::Bar => "Bar",
                SeriesKind::Line => "Line",
                SeriesKind::Area => "Area",
            };
            let mut element = json!({
                "component": component,
                "dataKey": series_key(i),
                "name": s.name,
                "yAxisId": if s.axis == AxisRole::Secondary { "right" } else { "left" },
                "label": frame.show_data_labels,
            });
            match s.kind {
                SeriesKind::Bar => element["fill"] = json!(s.color),
                SeriesKind::Line | SeriesKind::Area => {
                    element["stroke"] = json!(s.color);
                    element["type"] = json!(if plan.smooth { "monotone" } else { "linear" });
                    element["connectNulls"] = json!(!s.stacked);
                    if s.kind == SeriesKind::Area {
                        element["fill"] = json!(s.color);
                        element["fillOpacity"] = json!(AREA_FILL_OPACITY);
                    }
                }
            }
            if s.stacked {
                element["stackId"] = json!("total");
            }
            element
        })
        .collect();

    let component = if plan.is_dual_axis() {
        "ComposedChart"
    } else {
        match plan.series.first().map(|s| s.kind) {
            Some(SeriesKind::Line) => "LineChart",
            Some(SeriesKind::Area) => "AreaChart",
            _ => "BarChart",
        }
    };

    let category_axis = json!({
        "type": "category",
        "dataKey": "name",
        "label": frame.x_axis_title,
    });
    let value_axes: Vec<Value> = plan
        .value_axes
        .iter()
        .map(|axis| {
            let secondary = axis.role == AxisRole::Secondary;
            json!({
                "type": "number",
                "yAxisId": if secondary { "right" } else { "left" },
                "orientation": if secondary { "right" } else { "left" },
                "tickFormat": tick_format(axis),
                "label": if secondary { None } else { frame.y_axis_title.as_deref() },
            })
        })
        .collect();

    // Recharts "vertical" layout draws bars along the x axis
    let (layout, x_axis, y_axis) = match plan.orientation {
        Orientation::Vertical => ("horizontal", json!([category_axis]), json!(value_axes)),
        Orientation::Horizontal => ("vertical", json!(value_axes), json!([category_axis])),
    };

    json!({
        "component": component,
        "layout": layout,
        "data": rows,
        "xAxis": x_axis,
        "yAxis": y_axis,
        "series": series,
    })
}

fn slice_rows(plan: &PiePlan, value_key: &str) -> Vec<Value> {
    plan.slices
        .iter()
        .map(|s| {
            let mut row = Map::new();
            row.insert("name".to_string(), json!(s.name));
            row.insert(value_key.to_string(), json!(s.value));
            row.insert(format!("{}{}", value_key, FORMATTED_SUFFIX), json!(s.formatted));
            row.insert("fill".to_string(), json!(s.color));
            Value::Object(row)
        })
        .collect()
}

fn pie(frame: &Frame, plan: &PiePlan) -> Value {
    json!({
        "component": "PieChart",
        "data": slice_rows(plan, "value"),
        "series": [{
            "component": "Pie",
            "dataKey": "value",
            "nameKey": "name",
            "name": plan.series_name,
            "innerRadius": if plan.donut { "45%" } else { "0%" },
            "outerRadius": "70%",
            "label": frame.show_data_labels,
        }]
    })
}

fn scatter(frame: &Frame, plan: &ScatterPlan) -> Value {
    let series: Vec<Value> = plan
        .series
        .iter()
        .map(|s| {
            let data: Vec<Value> = s
                .points
                .iter()
                .map(|p| {
                    json!({
                        "x": p.x,
                        "y": p.y,
                        "z": p.radius,
                        "name": p.label,
                        "tooltip": p.tooltip,
                    })
                })
                .collect();
            json!({
                "component": "Scatter",
                "name": s.name,
                "data": data,
                "fill": s.color,
                "fillOpacity": if plan.bubble { 0.7 } else { 1.0 },
            })
        })
        .collect();

    let mut tree = json!({
        "component": "ScatterChart",
        "xAxis": [{ "type": "number", "dataKey": "x", "tickFormat": tick_format(&plan.x_axis),
                    "label": frame.x_axis_title.as_deref().or(plan.x_axis.title()) }],
        "yAxis": [{ "type": "number", "dataKey": "y", "tickFormat": tick_format(&plan.y_axis),
                    "label": frame.y_axis_title.as_deref().or(plan.y_axis.title()) }],
        "series": series,
    });
    if plan.bubble {
        // radius is precomputed, so the z axis maps it through unchanged
        tree["zAxis"] = json!({ "type": "number", "dataKey": "z", "scale": "identity" });
    }
    tree
}

fn treemap(plan: &PiePlan) -> Value {
    json!({
        "component": "Treemap",
        "data": slice_rows(plan, "size"),
        "dataKey": "size",
        "nameKey": "name",
        "isAnimationActive": false,
    })
}

/// Stacked segments: transparent base to min, whisker, two box halves, whisker.
fn box_plot(frame: &Frame, plan: &BoxPlotPlan) -> Value {
    let rows: Vec<Value> = plan
        .items
        .iter()
        .map(|item| {
            let s = &item.summary;
            json!({
                "name": item.category,
                "base": s.min,
                "lowerWhisker": s.q1 - s.min,
                "lowerBox": s.median - s.q1,
                "upperBox": s.q3 - s.median,
                "upperWhisker": s.max - s.q3,
                "tooltip": item.tooltip,
            })
        })
        .collect();
    let segment = |key: &str, fill: &str, whisker: bool| {
        json!({
            "component": "Bar",
            "dataKey": key,
            "stackId": "box",
            "fill": fill,
            "stroke": if fill == "transparent" { "none" } else { plan.color },
            "shape": if whisker { "whisker" } else { "rect" },
        })
    };
    let box_fill = engine::translucent(plan.color, AREA_FILL_OPACITY);

    json!({
        "component": "ComposedChart",
        "layout": "horizontal",
        "data": rows,
        "xAxis": [{ "type": "category", "dataKey": "name", "label": frame.x_axis_title }],
        "yAxis": [{ "type": "number", "tickFormat": tick_format(&plan.axis), "label": frame.y_axis_title }],
        "series": [
            segment("base", "transparent", false),
            segment("lowerWhisker", "transparent", true),
            segment("lowerBox", &box_fill, false),
            segment("upperBox", &box_fill, false),
            segment("upperWhisker", "transparent", true),
        ],
    })
}

fn funnel(frame: &Frame, plan: &PiePlan) -> Value {
    json!({
        "component": "FunnelChart",
        "data": slice_rows(plan, "value"),
        "series": [{
            "component": "Funnel",
            "dataKey": "value",
            "nameKey": "name",
            "name": plan.series_name,
            "label": { "position": if frame.show_data_labels { "center" } else { "right" } },
        }]
    })
}

fn radar(plan: &RadarPlan) -> Value {
    let rows: Vec<Value> = plan
        .indicators
        .iter()
        .enumerate()
        .map(|(j, indicator)| {
            let mut row = Map::new();
            row.insert("name".to_string(), json!(indicator));
            for (i, s) in plan.series.iter().enumerate() {
                let key = series_key(i);
                row.insert(format!("{}{}", key, FORMATTED_SUFFIX), json!(s.formatted.get(j)));
                row.insert(key, json!(s.values.get(j).copied().flatten()));
            }
            Value::Object(row)
        })
        .collect();
    let series: Vec<Value> = plan
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            json!({
                "component": "Radar",
                "dataKey": series_key(i),
                "name": s.name,
                "stroke": s.color,
                "fill": s.color,
                "fillOpacity": AREA_FILL_OPACITY,
            })
        })
        .collect();
    json!({
        "component": "RadarChart",
        "data": rows,
        "angleAxis": { "dataKey": "name" },
        "radiusAxis": { "domain": [0.0, plan.max] },
        "series": series,
    })
}
