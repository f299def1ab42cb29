//! FILENAME: core/engine/src/widget.rs
//! PURPOSE: Widget configuration - what a dashboard tile IS.
//! CONTEXT: Widgets are immutable snapshots of user intent. Every interaction
//! that changes one (sort, drill, column order, subtotal toggles) produces an
//! updated copy that is handed back to the host for saving.

use serde::{Deserialize, Serialize};

use crate::filter::DrillPath;
use crate::pill::Shelves;

// ============================================================================
// CHART SELECTION
// ============================================================================

/// Visual encoding of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChartType {
    Table,
    Bar,
    Line,
    Area,
    Pie,
    Donut,
    Scatter,
    Bubble,
    Treemap,
    Boxplot,
    Funnel,
    DualAxis,
    Radar,
    Gauge,
    Sankey,
    Kpi,
    Heatmap,
    Map,
}

impl ChartType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ChartType::Table => "table",
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Pie => "pie",
            ChartType::Donut => "donut",
            ChartType::Scatter => "scatter",
            ChartType::Bubble => "bubble",
            ChartType::Treemap => "treemap",
            ChartType::Boxplot => "box plot",
            ChartType::Funnel => "funnel",
            ChartType::DualAxis => "dual axis",
            ChartType::Radar => "radar",
            ChartType::Gauge => "gauge",
            ChartType::Sankey => "sankey",
            ChartType::Kpi => "KPI",
            ChartType::Heatmap => "heatmap",
            ChartType::Map => "map",
        }
    }

    /// Stacking is only meaningful for bars and areas.
    pub fn supports_stacking(&self) -> bool {
        matches!(self, ChartType::Bar | ChartType::Area)
    }

    /// Scatter-like charts resolve clicks against the category shelf.
    pub fn is_point_cloud(&self) -> bool {
        matches!(self, ChartType::Scatter | ChartType::Bubble)
    }
}

/// Charting backend a widget renders through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChartLibrary {
    #[default]
    Echarts,
    Chartjs,
    Recharts,
}

impl ChartLibrary {
    pub fn display_name(&self) -> &'static str {
        match self {
            ChartLibrary::Echarts => "ECharts",
            ChartLibrary::Chartjs => "Chart.js",
            ChartLibrary::Recharts => "Recharts",
        }
    }
}

// ============================================================================
// SETTINGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl LegendPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegendPosition::Top => "top",
            LegendPosition::Bottom => "bottom",
            LegendPosition::Left => "left",
            LegendPosition::Right => "right",
        }
    }
}

/// Presentation settings. Every field is optional; absent means default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartSettings {
    pub show_legend: Option<bool>,
    pub legend_position: Option<LegendPosition>,
    pub show_data_labels: Option<bool>,
    pub x_axis_title: Option<String>,
    pub y_axis_title: Option<String>,
    pub gauge_max: Option<f64>,
}

impl ChartSettings {
    pub fn legend_visible(&self) -> bool {
        self.show_legend.unwrap_or(true)
    }

    pub fn legend_position(&self) -> LegendPosition {
        self.legend_position.unwrap_or_default()
    }
}

/// Which total rows/columns a table widget shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubtotalSettings {
    pub show_row_subtotals: bool,
    pub show_column_totals: bool,
    pub show_grand_totals: bool,
}

impl Default for SubtotalSettings {
    fn default() -> Self {
        SubtotalSettings {
            show_row_subtotals: true,
            show_column_totals: true,
            show_grand_totals: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(&self) -> SortOrder {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// The single active sort of a widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub field_name: String,
    pub order: SortOrder,
}

// ============================================================================
// CONDITIONAL FORMATTING
// ============================================================================

/// Comparison used by a conditional formatting rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleCondition {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = "!=")]
    NotEqual,
}

impl RuleCondition {
    pub fn compare(&self, cell: f64, threshold: f64) -> bool {
        match self {
            RuleCondition::GreaterThan => cell > threshold,
            RuleCondition::LessThan => cell < threshold,
            RuleCondition::Equal => cell == threshold,
            RuleCondition::GreaterThanOrEqual => cell >= threshold,
            RuleCondition::LessThanOrEqual => cell <= threshold,
            RuleCondition::NotEqual => cell != threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    pub measure_field: String,
    pub condition: RuleCondition,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

// ============================================================================
// WIDGET
// ============================================================================

/// One dashboard tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub chart_type: ChartType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_library: Option<ChartLibrary>,
    #[serde(default)]
    pub data_source_id: String,
    #[serde(default)]
    pub shelves: Shelves,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub drill_path: DrillPath,
    #[serde(default)]
    pub is_stacked: bool,
    #[serde(default)]
    pub is_cross_filter_source: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_settings: Option<ChartSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal_settings: Option<SubtotalSettings>,
    #[serde(default)]
    pub conditional_formatting: Vec<ConditionalRule>,
    /// User-defined leaf column order for table widgets.
    #[serde(default)]
    pub column_order: Vec<String>,
}

/// The fields of a widget whose change requires a refetch.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigKey<'a> {
    id: &'a str,
    chart_type: ChartType,
    data_source_id: &'a str,
    shelves: &'a Shelves,
    sort: &'a Option<SortSpec>,
    drill_path: &'a DrillPath,
    subtotal_settings: &'a Option<SubtotalSettings>,
    conditional_formatting: &'a [ConditionalRule],
}

impl Widget {
    pub fn new(id: impl Into<String>, chart_type: ChartType) -> Self {
        Widget {
            id: id.into(),
            title: String::new(),
            chart_type,
            chart_library: None,
            data_source_id: String::new(),
            shelves: Shelves::default(),
            sort: None,
            drill_path: DrillPath::default(),
            is_stacked: false,
            is_cross_filter_source: false,
            color_palette: None,
            chart_settings: None,
            subtotal_settings: None,
            conditional_formatting: Vec::new(),
            column_order: Vec::new(),
        }
    }

    pub fn with_shelves(mut self, shelves: Shelves) -> Self {
        self.shelves = shelves;
        self
    }

    pub fn as_cross_filter_source(mut self) -> Self {
        self.is_cross_filter_source = true;
        self
    }

    pub fn settings(&self) -> ChartSettings {
        self.chart_settings.clone().unwrap_or_default()
    }

    pub fn subtotals(&self) -> SubtotalSettings {
        self.subtotal_settings.unwrap_or_default()
    }

    /// Stacking applies only when requested and the chart type supports it.
    pub fn stacking_enabled(&self) -> bool {
        self.is_stacked && self.chart_type.supports_stacking()
    }

    /// Stable key over every field that affects the fetched data.
    pub fn config_key(&self) -> String {
        let key = ConfigKey {
            id: &self.id,
            chart_type: self.chart_type,
            data_source_id: &self.data_source_id,
            shelves: &self.shelves,
            sort: &self.sort,
            drill_path: &self.drill_path,
            subtotal_settings: &self.subtotal_settings,
            conditional_formatting: &self.conditional_formatting,
        };
        serde_json::to_string(&key).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DrillStep;

    #[test]
    fn test_stacking_only_for_bar_and_area() {
        let mut widget = Widget::new("w1", ChartType::Line);
        widget.is_stacked = true;
        assert!(!widget.stacking_enabled());
        widget.chart_type = ChartType::Area;
        assert!(widget.stacking_enabled());
    }

    #[test]
    fn test_config_key_ignores_presentation() {
        let mut widget = Widget::new("w1", ChartType::Bar);
        let before = widget.config_key();
        widget.title = "Renamed".to_string();
        widget.color_palette = Some("ocean".to_string());
        assert_eq!(before, widget.config_key());

        widget.drill_path.drill_down(DrillStep::new("Region", "East"));
        assert_ne!(before, widget.config_key());
    }

    #[test]
    fn test_rule_condition_json() {
        let rule: ConditionalRule = serde_json::from_str(
            r##"{"measureField": "Sales", "condition": ">=", "value": 10, "backgroundColor": "#f00"}"##,
        )
        .unwrap();
        assert_eq!(rule.condition, RuleCondition::GreaterThanOrEqual);
        assert!(rule.condition.compare(10.0, 10.0));
    }

    #[test]
    fn test_equality_rules_compare_exactly() {
        assert!(RuleCondition::Equal.compare(1_250_000.0, 1_250_000.0));
        assert!(!RuleCondition::Equal.compare(1e-17, 0.0));
        assert!(RuleCondition::NotEqual.compare(1e-17, 0.0));
        assert!(!RuleCondition::NotEqual.compare(42.5, 42.5));
    }

    #[test]
    fn test_settings_defaults() {
        let widget = Widget::new("w1", ChartType::Pie);
        let settings = widget.settings();
        assert!(settings.legend_visible());
        assert_eq!(settings.legend_position(), LegendPosition::Bottom);
        assert!(widget.subtotals().show_grand_totals);
    }
}
