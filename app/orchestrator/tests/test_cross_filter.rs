//! FILENAME: tests/test_cross_filter.rs
//! Integration tests for click-to-filter on charts and tables.

mod common;

use common::{
    region_bar_widget, region_city_table, region_city_table_widget, region_sales_chart,
    TestHarness,
};
use engine::{Aggregation, FieldValue, FilterCondition, TableRow};
use orchestrator::{handle_chart_click, handle_row_click, DashboardHost, FetchOutcome, SharedInputs};
use serde_json::json;
use table_engine::RowAction;

// ============================================================================
// CHART CLICKS
// ============================================================================

#[tokio::test]
async fn test_bar_click_sets_and_clears_region_filter() {
    let harness = TestHarness::new(region_sales_chart());
    let controller = harness.controller(region_bar_widget());
    assert_eq!(controller.refresh(&SharedInputs::default()).await, FetchOutcome::Committed);

    let mounted = controller.mount_chart().expect("chart result mounts");
    mounted.with_chart(|chart| chart.handle_click(Some(&json!({ "seriesIndex": 0, "dataIndex": 1 }))));

    let filter = harness.state.cross_filter().expect("cross-filter installed");
    assert_eq!(filter.source_widget_id, "w-bar");
    assert_eq!(filter.filter.name, "Region");
    assert_eq!(filter.filter.aggregation, Some(Aggregation::Count));
    let condition = filter.filter.filter.as_ref().unwrap();
    assert_eq!(condition.condition, FilterCondition::IsOneOf);
    assert_eq!(condition.values, vec![FieldValue::text("West")]);

    mounted.with_chart(|chart| chart.handle_click(Some(&json!({ "seriesIndex": 0, "dataIndex": 1 }))));
    assert!(harness.state.cross_filter().is_none());
}

#[tokio::test]
async fn test_empty_area_click_clears_selection() {
    let harness = TestHarness::new(region_sales_chart());
    let controller = harness.controller(region_bar_widget());
    controller.refresh(&SharedInputs::default()).await;

    let mounted = controller.mount_chart().unwrap();
    mounted.with_chart(|chart| chart.handle_click(Some(&json!({ "dataIndex": 0 }))));
    assert!(harness.state.cross_filter().is_some());

    mounted.with_chart(|chart| chart.handle_click(None));
    assert!(harness.state.cross_filter().is_none());
}

#[test]
fn test_toggle_law_for_every_label() {
    let harness = TestHarness::new(region_sales_chart());
    let widget = region_bar_widget();
    let labels = vec!["East".to_string(), "West".to_string()];

    for index in 0..labels.len() {
        handle_chart_click(&*harness.state, &widget, &labels, Some(index));
        handle_chart_click(&*harness.state, &widget, &labels, Some(index));
        assert!(harness.state.cross_filter().is_none());
    }
}

#[tokio::test]
async fn test_cross_filter_change_triggers_refetch_elsewhere() {
    let harness = TestHarness::new(region_sales_chart());
    let source = harness.controller(region_bar_widget());
    let mut other_widget = region_bar_widget();
    other_widget.id = "w-other".into();
    let other = harness.controller(other_widget);

    let mut inputs = SharedInputs::default();
    other.refresh(&inputs).await;
    source.refresh(&inputs).await;
    assert_eq!(harness.source.calls(), 2);

    let labels = vec!["East".to_string(), "West".to_string()];
    handle_chart_click(&*harness.state, &source.widget(), &labels, Some(0));
    inputs.cross_filter = harness.state.cross_filter();

    assert_eq!(other.refresh(&inputs).await, FetchOutcome::Committed);
    assert_eq!(harness.source.calls(), 3);
}

// ============================================================================
// TABLE ROW CLICKS
// ============================================================================

#[test]
fn test_table_leaf_row_filters_on_its_level() {
    let harness = TestHarness::new(region_city_table());
    let widget = region_city_table_widget();
    let boston = TableRow::data(Some("East|Boston"), 1)
        .with_value("Region", "East")
        .with_value("City", "Boston");

    let action = handle_row_click(&*harness.state, &widget, &boston);
    assert!(matches!(action, RowAction::CrossFilter { .. }));
    let filter = harness.state.cross_filter().unwrap();
    assert_eq!(filter.filter.name, "City");
    assert_eq!(filter.value(), Some(&FieldValue::text("Boston")));

    handle_row_click(&*harness.state, &widget, &boston);
    assert!(harness.state.cross_filter().is_none());
}

#[test]
fn test_expandable_row_toggles_instead_of_filtering() {
    let harness = TestHarness::new(region_city_table());
    let widget = region_city_table_widget();
    let east = TableRow::data(Some("East"), 0).with_value("Region", "East").expandable();

    assert_eq!(
        handle_row_click(&*harness.state, &widget, &east),
        RowAction::ToggleExpand("East".into())
    );
    assert!(harness.state.collapsed_rows("w-table").contains("East"));
    assert!(harness.state.cross_filter().is_none());
}
