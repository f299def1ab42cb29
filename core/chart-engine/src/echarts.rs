//! FILENAME: core/chart-engine/src/echarts.rs
//! PURPOSE: Apache ECharts option builder.
//! CONTEXT: The only backend with a native sankey series. Tooltips use
//! item triggers with per-datum formatter strings so every tooltip carries
//! the pill-formatted value.

use engine::{AxisRole, ChartLibrary, ChartType, LegendPosition};
use serde_json::{json, Value};

use crate::backend::{index_field, ChartBackend};
use crate::encoding::{
    AxisPlan, BoxPlotPlan, CartesianPlan, EncodedChart, Encoding, Frame, GaugePlan, Hit,
    Orientation, PiePlan, RadarPlan, SankeyPlan, ScatterPlan, SeriesKind, AREA_FILL_OPACITY,
};

/// Symbol size for plain scatter points.
const SCATTER_SYMBOL_SIZE: f64 = 10.0;

#[derive(Debug, Default, Clone, Copy)]
pub struct EchartsBackend;

impl ChartBackend for EchartsBackend {
    fn library(&self) -> ChartLibrary {
        ChartLibrary::Echarts
    }

    fn supports(&self, chart_type: ChartType) -> bool {
        !matches!(
            chart_type,
            ChartType::Map | ChartType::Table | ChartType::Kpi | ChartType::Heatmap
        )
    }

    fn translate(&self, encoded: &EncodedChart) -> Value {
        let frame = &encoded.frame;
        let mut options = match &encoded.encoding {
            Encoding::Cartesian(plan) => cartesian(frame, plan),
            Encoding::Pie(plan) => pie(frame, plan),
            Encoding::Scatter(plan) => scatter(frame, plan),
            Encoding::Treemap(plan) => treemap(plan),
            Encoding::BoxPlot(plan) => box_plot(frame, plan),
            Encoding::Funnel(plan) => funnel(frame, plan),
            Encoding::Radar(plan) => radar(plan),
            Encoding::Gauge(plan) => gauge(plan),
            Encoding::Sankey(plan) => sankey(plan),
        };
        options["color"] = json!(frame.palette.colors());
        options["legend"] = legend(frame);
        options["tooltip"] = json!({ "trigger": "item", "confine": true });
        options
    }

    /// `{ "seriesIndex": 0, "dataIndex": 3, "dataType": "node" }`
    fn resolve_hit(&self, native: &Value) -> Option<Hit> {
        if native.get("dataType").and_then(Value::as_str) == Some("edge") {
            return None;
        }
        Some(Hit {
            series: index_field(native, "seriesIndex").unwrap_or(0),
            data: index_field(native, "dataIndex")?,
        })
    }
}

fn legend(frame: &Frame) -> Value {
    let mut legend = json!({ "show": frame.show_legend, "type": "scroll" });
    match frame.legend_position {
        LegendPosition::Top => legend["top"] = json!(0),
        LegendPosition::Bottom => legend["bottom"] = json!(0),
        LegendPosition::Left | LegendPosition::Right => {
            legend[frame.legend_position.as_str()] = json!(0);
            legend["orient"] = json!("vertical");
            legend["top"] = json!("middle");
        }
    }
    legend
}

fn value_axis(axis: &AxisPlan, title: Option<&str>) -> Value {
    json!({
        "type": "value",
        "name": title.or(axis.title()).unwrap_or(""),
        "position": if axis.role == AxisRole::Secondary { "right" } else { "left" },
        "axisLabel": { "formatter": format!("{}{{value}}{}", axis.prefix(), axis.suffix()) },
        "splitLine": { "show": axis.role == AxisRole::Primary },
    })
}

fn cartesian(frame: &Frame, plan: &CartesianPlan) -> Value {
    let category_axis = json!({
        "type": "category",
        "data": plan.categories,
        "name": frame.x_axis_title.as_deref().unwrap_or(""),
    });
    let mut value_axes: Vec<Value> = plan
        .value_axes
        .iter()
        .map(|axis| {
            let title = match axis.role {
                AxisRole::Primary => frame.y_axis_title.as_deref(),
                AxisRole::Secondary => None,
            };
            value_axis(axis, title)
        })
        .collect();

    let (x_axis, y_axis) = match plan.orientation {
        Orientation::Vertical => {
            let y = if value_axes.len() == 1 {
                value_axes.remove(0)
            } else {
                Value::Array(value_axes)
            };
            (category_axis, y)
        }
        Orientation::Horizontal => (
            value_axes.into_iter().next().unwrap_or(Value::Null),
            category_axis,
        ),
    };

    let label_position = match plan.orientation {
        Orientation::Vertical => "top",
        Orientation::Horizontal => "right",
    };

    let series: Vec<Value> = plan
        .series
        .iter()
        .map(|s| {
            let data: Vec<Value> = s
                .values
                .iter()
                .zip(&s.formatted)
                .zip(&plan.categories)
                .map(|((value, formatted), category)| {
                    json!({
                        "value": value,
                        "tooltip": { "formatter": format!("{}<br/>{}: {}", category, s.name, formatted) },
                    })
                })
                .collect();
            let mut series = json!({
                "name": s.name,
                "type": if s.kind == SeriesKind::Bar { "bar" } else { "line" },
                "data": data,
                "itemStyle": { "color": s.color },
                "label": { "show": frame.show_data_labels, "position": label_position },
            });
            if s.stacked {
                series["stack"] = json!("total");
            }
            if s.kind != SeriesKind::Bar {
                series["smooth"] = json!(plan.smooth);
                series["connectNulls"] = json!(!s.stacked);
            }
            if s.kind == SeriesKind::Area {
                series["areaStyle"] = json!({ "color": engine::translucent(s.color, AREA_FILL_OPACITY) });
            }
            if s.axis == AxisRole::Secondary {
                series["yAxisIndex"] = json!(1);
            }
            series
        })
        .collect();

    json!({
        "grid": { "containLabel": true, "left": 16, "right": 16, "top": 32, "bottom": 40 },
        "xAxis": x_axis,
        "yAxis": y_axis,
        "series": series,
    })
}

fn slice_data(plan: &PiePlan) -> Vec<Value> {
    plan.slices
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "value": s.value,
                "itemStyle": { "color": s.color },
                "tooltip": { "formatter": format!("{}: {}", s.name, s.formatted) },
            })
        })
        .collect()
}

fn pie(frame: &Frame, plan: &PiePlan) -> Value {
    let radius = if plan.donut { json!(["45%", "70%"]) } else { json!("70%") };
    json!({
        "series": [{
            "name": plan.series_name,
            "type": "pie",
            "radius": radius,
            "data": slice_data(plan),
            "label": { "show": frame.show_data_labels },
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
                    let value = match p.r {
                        Some(r) => json!([p.x, p.y, r]),
                        None => json!([p.x, p.y]),
                    };
                    json!({
                        "name": p.label,
                        "value": value,
                        "symbolSize": p.radius.map(|r| r * 2.0).unwrap_or(SCATTER_SYMBOL_SIZE),
                        "tooltip": { "formatter": p.tooltip.replace('\n', "<br/>") },
                    })
                })
                .collect();
            json!({
                "name": s.name,
                "type": "scatter",
                "data": data,
                "itemStyle": { "color": s.color, "opacity": if plan.bubble { 0.7 } else { 1.0 } },
            })
        })
        .collect();

    json!({
        "grid": { "containLabel": true, "left": 16, "right": 16, "top": 32, "bottom": 40 },
        "xAxis": value_axis(&plan.x_axis, frame.x_axis_title.as_deref()),
        "yAxis": value_axis(&plan.y_axis, frame.y_axis_title.as_deref()),
        "series": series,
    })
}

fn treemap(plan: &PiePlan) -> Value {
    json!({
        "series": [{
            "name": plan.series_name,
            "type": "treemap",
            "roam": false,
            "nodeClick": false,
            "breadcrumb": { "show": false },
            "data": slice_data(plan),
        }]
    })
}

fn box_plot(frame: &Frame, plan: &BoxPlotPlan) -> Value {
    let data: Vec<Value> = plan
        .items
        .iter()
        .map(|item| {
            let s = &item.summary;
            json!({
                "value": [s.min, s.q1, s.median, s.q3, s.max],
                "tooltip": { "formatter": item.tooltip.replace('\n', "<br/>") },
            })
        })
        .collect();
    let categories: Vec<&str> = plan.items.iter().map(|i| i.category.as_str()).collect();
    json!({
        "grid": { "containLabel": true, "left": 16, "right": 16, "top": 32, "bottom": 40 },
        "xAxis": { "type": "category", "data": categories, "name": frame.x_axis_title.as_deref().unwrap_or("") },
        "yAxis": value_axis(&plan.axis, frame.y_axis_title.as_deref()),
        "series": [{
            "name": plan.series_name,
            "type": "boxplot",
            "itemStyle": { "color": engine::translucent(plan.color, AREA_FILL_OPACITY), "borderColor": plan.color },
            "data": data,
        }]
    })
}

fn funnel(frame: &Frame, plan: &PiePlan) -> Value {
    json!({
        "series": [{
            "name": plan.series_name,
            "type": "funnel",
            "sort": "none",
            "gap": 2,
            "label": { "show": true, "position": if frame.show_data_labels { "inside" } else { "right" } },
            "data": slice_data(plan),
        }]
    })
}

fn radar(plan: &RadarPlan) -> Value {
    let indicator: Vec<Value> = plan
        .indicators
        .iter()
        .map(|name| json!({ "name": name, "max": plan.max }))
        .collect();
    let data: Vec<Value> = plan
        .series
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "value": s.values,
                "itemStyle": { "color": s.color },
                "areaStyle": { "color": engine::translucent(s.color, AREA_FILL_OPACITY) },
            })
        })
        .collect();
    json!({
        "radar": { "indicator": indicator },
        "series": [{ "type": "radar", "data": data }]
    })
}

fn gauge(plan: &GaugePlan) -> Value {
    json!({
        "series": [{
            "type": "gauge",
            "min": 0,
            "max": plan.max,
            "progress": { "show": true },
            "itemStyle": { "color": plan.color },
            "detail": { "formatter": plan.formatted, "valueAnimation": true },
            "data": [{ "value": plan.value, "name": plan.label }],
        }]
    })
}

fn sankey(plan: &SankeyPlan) -> Value {
    let nodes: Vec<Value> = plan.nodes.iter().map(|n| json!({ "name": n })).collect();
    let links: Vec<Value> = plan
        .links
        .iter()
        .zip(&plan.link_tooltips)
        .map(|(l, tooltip)| {
            json!({
                "source": l.source,
                "target": l.target,
                "value": l.value,
                "tooltip": { "formatter": tooltip },
            })
        })
        .collect();
    json!({
        "series": [{
            "type": "sankey",
            "emphasis": { "focus": "adjacency" },
            "data": nodes,
            "links": links,
        }]
    })
}
