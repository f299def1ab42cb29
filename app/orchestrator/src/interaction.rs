//! FILENAME: app/orchestrator/src/interaction.rs
//! PURPOSE: Turns chart and table events into cross-filter, drill and
//! widget-setting mutations on the host.
//! CONTEXT: Every function here reads the current state from the host and
//! writes back through its mutation entry points; nothing is cached.

use std::sync::Arc;

use chart_engine::{ChartHandlers, PointerEvent};
use engine::{CrossFilter, DrillStep, DrillUpTarget, FieldValue, Pill, TableRow, Widget};
use table_engine::{reorder_columns, row_action, toggle_sort, ColumnView, RowAction, TableError};

use crate::host::DashboardHost;
use crate::logging::{DRILL, TABLE, XFILTER};
use crate::menu::open_chart_menu;
use crate::{log_debug, log_info, log_warn};

// ============================================================================
// CROSS-FILTER
// ============================================================================

/// The dimension a chart's labels belong to.
pub fn chart_dimension(widget: &Widget) -> Option<&Pill> {
    if widget.chart_type.is_point_cloud() {
        if let Some(pill) = widget.shelves.category.first() {
            return Some(pill);
        }
    }
    widget.drill_path.current_dimension(&widget.shelves)
}

/// Installs, replaces or clears the cross-filter for a click on `value`.
/// Returns the cross-filter now in effect.
pub fn toggle_cross_filter(
    host: &dyn DashboardHost,
    widget: &Widget,
    dimension: &Pill,
    value: FieldValue,
) -> Option<CrossFilter> {
    let current = host.cross_filter();
    let next = match &current {
        Some(active) if active.is_same_selection(&widget.id, &value) => {
            log_info!(XFILTER, "widget {} cleared {}={}", widget.id, dimension.name, value);
            None
        }
        _ => {
            log_info!(XFILTER, "widget {} set {}={}", widget.id, dimension.name, value);
            Some(CrossFilter::from_click(&widget.id, dimension, value))
        }
    };
    host.set_cross_filter(next.clone());
    next
}

/// Clears the active cross-filter if `widget` installed it.
pub fn clear_own_cross_filter(host: &dyn DashboardHost, widget: &Widget) -> Option<CrossFilter> {
    let current = host.cross_filter();
    match current {
        Some(active) if active.source_widget_id == widget.id => {
            host.set_cross_filter(None);
            None
        }
        other => other,
    }
}

/// Click on a chart element (or on empty space when `index` is `None`).
pub fn handle_chart_click(
    host: &dyn DashboardHost,
    widget: &Widget,
    labels: &[String],
    index: Option<usize>,
) -> Option<CrossFilter> {
    if !widget.is_cross_filter_source {
        return host.cross_filter();
    }
    let label = match index {
        Some(i) if i < labels.len() => &labels[i],
        Some(i) => {
            // may also be a click racing a re-render with fewer labels
            log_warn!(
                XFILTER,
                "widget {} click index {} outside {} labels",
                widget.id,
                i,
                labels.len()
            );
            return clear_own_cross_filter(host, widget);
        }
        None => return clear_own_cross_filter(host, widget),
    };
    let Some(dimension) = chart_dimension(widget) else {
        log_debug!(XFILTER, "widget {} has no dimension to filter on", widget.id);
        return host.cross_filter();
    };
    toggle_cross_filter(host, widget, dimension, FieldValue::text(label.as_str()))
}

// ============================================================================
// DRILL
// ============================================================================

/// Appends a step for the dimension currently shown. `None` when there is
/// no further dimension to drill into.
pub fn drill_down(host: &dyn DashboardHost, widget: &Widget, value: FieldValue) -> Option<Widget> {
    let dimension = widget.drill_path.next_dimension(&widget.shelves)?;
    let mut updated = widget.clone();
    updated
        .drill_path
        .drill_down(DrillStep::new(dimension.name.clone(), value));
    log_info!(
        DRILL,
        "widget {} drilled {} (depth {})",
        widget.id,
        dimension.name,
        updated.drill_path.len()
    );
    host.save_widget(updated.clone());
    Some(updated)
}

pub fn drill_up(host: &dyn DashboardHost, widget: &Widget, target: DrillUpTarget) -> Widget {
    let mut updated = widget.clone();
    updated.drill_path.drill_up(target);
    log_info!(DRILL, "widget {} drilled up to depth {}", widget.id, updated.drill_path.len());
    host.save_widget(updated.clone());
    updated
}

// ============================================================================
// TABLE
// ============================================================================

/// Click on a body row: expand/collapse first, cross-filter otherwise.
pub fn handle_row_click(host: &dyn DashboardHost, widget: &Widget, row: &TableRow) -> RowAction {
    let action = row_action(widget, row);
    match &action {
        RowAction::ToggleExpand(path) => {
            log_debug!(TABLE, "widget {} toggled {}", widget.id, path);
            host.toggle_row_collapse(&widget.id, path);
        }
        RowAction::CrossFilter { dimension, value } => {
            toggle_cross_filter(host, widget, dimension, value.clone());
        }
        RowAction::None => {}
    }
    action
}

/// Click on a header cell. Measure-group headers are not sortable.
pub fn handle_header_click(host: &dyn DashboardHost, widget: &Widget, column: &ColumnView) -> Option<Widget> {
    if !column.sortable {
        return None;
    }
    let mut updated = widget.clone();
    updated.sort = Some(toggle_sort(widget.sort.as_ref(), &column.key));
    log_debug!(TABLE, "widget {} sort {:?}", widget.id, updated.sort);
    host.save_widget(updated.clone());
    Some(updated)
}

/// Drop of header `dragged` onto header `target`, given the displayed order.
pub fn handle_column_drop(
    host: &dyn DashboardHost,
    widget: &Widget,
    displayed: &[String],
    dragged: &str,
    target: &str,
) -> Result<Widget, TableError> {
    let mut updated = widget.clone();
    updated.column_order = reorder_columns(displayed, dragged, target)?;
    log_debug!(TABLE, "widget {} moved {} to {}", widget.id, dragged, target);
    host.save_widget(updated.clone());
    Ok(updated)
}

// ============================================================================
// CHART WIRING
// ============================================================================

/// Handlers that route a mounted chart's events to the host.
pub fn chart_handlers(host: Arc<dyn DashboardHost>, widget: &Widget, labels: &[String]) -> ChartHandlers {
    let click_host = Arc::clone(&host);
    let click_widget = widget.clone();
    let click_labels = labels.to_vec();
    let menu_widget = widget.clone();
    let menu_labels = labels.to_vec();

    ChartHandlers::default()
        .on_click(move |index| {
            handle_chart_click(click_host.as_ref(), &click_widget, &click_labels, index);
        })
        .on_context_menu(move |event: &PointerEvent, index| {
            let label = index.and_then(|i| menu_labels.get(i)).map(String::as_str);
            open_chart_menu(host.as_ref(), &menu_widget, label, event);
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::create_dashboard_state;
    use engine::{Aggregation, ChartType, FilterCondition};

    fn bar_widget() -> Widget {
        let mut widget = Widget::new("w1", ChartType::Bar).as_cross_filter_source();
        widget.shelves.rows = vec![Pill::dimension("r1", "Region")];
        widget.shelves.values = vec![Pill::measure("v1", "Sales", Aggregation::Sum)];
        widget
    }

    fn labels() -> Vec<String> {
        vec!["East".to_string(), "West".to_string()]
    }

    #[test]
    fn test_click_installs_then_clears() {
        let state = create_dashboard_state();
        let widget = bar_widget();

        let installed = handle_chart_click(&state, &widget, &labels(), Some(1)).unwrap();
        assert_eq!(installed.source_widget_id, "w1");
        assert_eq!(installed.filter.name, "Region");
        let filter = installed.filter.filter.as_ref().unwrap();
        assert_eq!(filter.condition, FilterCondition::IsOneOf);
        assert_eq!(filter.values, vec![FieldValue::text("West")]);

        assert!(handle_chart_click(&state, &widget, &labels(), Some(1)).is_none());
        assert!(state.cross_filter().is_none());
    }

    #[test]
    fn test_other_value_replaces() {
        let state = create_dashboard_state();
        let widget = bar_widget();
        handle_chart_click(&state, &widget, &labels(), Some(0));
        let next = handle_chart_click(&state, &widget, &labels(), Some(1)).unwrap();
        assert_eq!(next.value(), Some(&FieldValue::text("West")));
    }

    #[test]
    fn test_non_source_widget_ignores_clicks() {
        let state = create_dashboard_state();
        let mut widget = bar_widget();
        widget.is_cross_filter_source = false;
        assert!(handle_chart_click(&state, &widget, &labels(), Some(0)).is_none());
        assert!(state.cross_filter().is_none());
    }

    #[test]
    fn test_out_of_range_clears_only_own_filter() {
        let state = create_dashboard_state();
        let widget = bar_widget();
        handle_chart_click(&state, &widget, &labels(), Some(0));
        assert!(handle_chart_click(&state, &widget, &labels(), Some(7)).is_none());

        let foreign = CrossFilter::from_click("other", &Pill::dimension("c1", "City"), FieldValue::text("Oslo"));
        state.set_cross_filter(Some(foreign.clone()));
        assert_eq!(handle_chart_click(&state, &widget, &labels(), None), Some(foreign));
    }

    #[test]
    fn test_scatter_uses_category_shelf() {
        let mut widget = Widget::new("s1", ChartType::Scatter);
        widget.shelves.rows = vec![Pill::dimension("r1", "Region")];
        widget.shelves.category = vec![Pill::dimension("c1", "Customer")];
        assert_eq!(chart_dimension(&widget).unwrap().name, "Customer");
    }

    #[test]
    fn test_drill_down_requires_further_dimension() {
        let state = create_dashboard_state();
        let mut widget = bar_widget();
        assert!(drill_down(&state, &widget, FieldValue::text("East")).is_none());

        widget.shelves.rows.push(Pill::dimension("r2", "City"));
        let drilled = drill_down(&state, &widget, FieldValue::text("East")).unwrap();
        assert_eq!(drilled.drill_path.steps(), &[DrillStep::new("Region", "East")]);
        assert_eq!(state.widget("w1").unwrap().drill_path.len(), 1);

        let restored = drill_up(&state, &drilled, DrillUpTarget::from_level(-1));
        assert!(restored.drill_path.is_empty());
    }

    #[test]
    fn test_drilled_chart_filters_on_shown_dimension() {
        let state = create_dashboard_state();
        let mut widget = bar_widget();
        widget.shelves.rows.push(Pill::dimension("r2", "City"));
        let drilled = drill_down(&state, &widget, FieldValue::text("East")).unwrap();
        let cities = vec!["Boston".to_string()];
        let filter = handle_chart_click(&state, &drilled, &cities, Some(0)).unwrap();
        assert_eq!(filter.filter.name, "City");
    }

    #[test]
    fn test_header_click_toggles_sort() {
        let state = create_dashboard_state();
        let widget = Widget::new("t1", ChartType::Table);
        let column = ColumnView {
            key: "Sales".into(),
            label: "Sales".into(),
            measure: Some("Sales".into()),
            pinned: false,
            sortable: true,
            sort: None,
        };
        let first = handle_header_click(&state, &widget, &column).unwrap();
        let second = handle_header_click(&state, &first, &column).unwrap();
        assert_eq!(second.sort.unwrap().order, engine::SortOrder::Desc);

        let group = ColumnView { sortable: false, ..column };
        assert!(handle_header_click(&state, &widget, &group).is_none());
    }

    #[test]
    fn test_column_drop_persists_order() {
        let state = create_dashboard_state();
        let widget = Widget::new("t1", ChartType::Table);
        let displayed: Vec<String> = ["Region", "Sales", "Profit"].iter().map(|s| s.to_string()).collect();
        let updated = handle_column_drop(&state, &widget, &displayed, "Profit", "Region").unwrap();
        assert_eq!(updated.column_order, vec!["Profit", "Region", "Sales"]);
        assert_eq!(state.widget("t1").unwrap().column_order, updated.column_order);
        assert!(handle_column_drop(&state, &widget, &displayed, "Nope", "Region").is_err());
    }

    #[test]
    fn test_row_click_expands_or_filters() {
        let state = create_dashboard_state();
        let mut widget = Widget::new("t1", ChartType::Table).as_cross_filter_source();
        widget.shelves.rows = vec![Pill::dimension("r1", "Region")];

        let parent = TableRow::data(Some("East"), 0).with_value("Region", "East").expandable();
        handle_row_click(&state, &widget, &parent);
        assert!(state.collapsed_rows("t1").contains("East"));

        let leaf = TableRow::data(Some("West"), 0).with_value("Region", "West");
        handle_row_click(&state, &widget, &leaf);
        assert_eq!(state.cross_filter().unwrap().value(), Some(&FieldValue::text("West")));
    }
}
