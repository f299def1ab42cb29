//! FILENAME: tests/test_fetch_lifecycle.rs
//! Integration tests for fetch deduplication, stale results and dispatch.

mod common;

use std::time::Duration;

use common::{
    city_sales_chart, flow_sankey, region_bar_widget, region_city_table, region_city_table_widget,
    region_sales_chart, TestHarness,
};
use engine::{
    ChartLibrary, ChartType, FieldValue, HeatmapData, KpiData, KpiValue, ProcessedData, Widget,
};
use orchestrator::{
    dispatch, DashboardConfig, DashboardHost, FetchError, FetchOutcome, SharedInputs, SkeletonKind,
    WidgetView, LOADING_MESSAGE,
};
use table_engine::CollapsedSet;

// ============================================================================
// DEDUPLICATION
// ============================================================================

#[tokio::test]
async fn test_unchanged_inputs_skip_the_fetch() {
    let harness = TestHarness::new(region_sales_chart());
    let controller = harness.controller(region_bar_widget());
    let inputs = SharedInputs::default();

    assert_eq!(controller.refresh(&inputs).await, FetchOutcome::Committed);
    assert_eq!(controller.refresh(&inputs).await, FetchOutcome::Skipped);
    assert_eq!(harness.source.calls(), 1);
    assert_eq!(controller.fetch_count(), 1);
}

#[tokio::test]
async fn test_refetch_counter_forces_a_new_fetch() {
    let harness = TestHarness::new(region_sales_chart());
    let controller = harness.controller(region_bar_widget());
    let mut inputs = SharedInputs::default();

    controller.refresh(&inputs).await;
    inputs.refetch += 1;
    assert_eq!(controller.refresh(&inputs).await, FetchOutcome::Committed);
    assert_eq!(harness.source.calls(), 2);
}

#[tokio::test]
async fn test_config_change_fetches_again() {
    let harness = TestHarness::new(region_sales_chart());
    let controller = harness.controller(region_bar_widget());
    let inputs = SharedInputs::default();
    controller.refresh(&inputs).await;

    let mut widget = controller.widget();
    widget.chart_type = ChartType::Line;
    controller.set_widget(widget);
    assert_eq!(controller.refresh(&inputs).await, FetchOutcome::Committed);
    assert_eq!(harness.source.calls(), 2);
}

// ============================================================================
// ORDERING AND TEARDOWN
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_slow_stale_result_is_discarded() {
    let harness = TestHarness::new(region_sales_chart());
    harness.source.push(200, Ok(region_sales_chart()));
    harness.source.push(20, Ok(city_sales_chart()));
    let controller = harness.controller(region_bar_widget());

    let first = SharedInputs::default();
    let second = SharedInputs {
        refetch: 1,
        ..SharedInputs::default()
    };
    let (slow, fast) = tokio::join!(controller.refresh(&first), controller.refresh(&second));

    assert_eq!(slow, FetchOutcome::Discarded);
    assert_eq!(fast, FetchOutcome::Committed);
    assert_eq!(controller.data(), Some(city_sales_chart()));
    assert!(!controller.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_teardown_blocks_commit() {
    let harness = TestHarness::new(region_sales_chart());
    harness.source.push(50, Ok(region_sales_chart()));
    let controller = harness.controller(region_bar_widget());

    let handle = controller.spawn_refresh(SharedInputs::default());
    controller.teardown();

    assert_eq!(handle.await.unwrap(), FetchOutcome::Discarded);
    assert!(controller.data().is_none());
    assert!(harness.state.fetch_time("w-bar").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_fetch_time_is_reported() {
    let harness = TestHarness::new(region_sales_chart());
    harness.source.push(250, Ok(region_sales_chart()));
    let controller = harness.controller(region_bar_widget());

    controller.refresh(&SharedInputs::default()).await;

    let elapsed = harness.state.fetch_time("w-bar").unwrap();
    assert!(elapsed >= Duration::from_millis(250));
    assert_eq!(controller.last_fetch_time(), Some(elapsed));
}

// ============================================================================
// VIEWS
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_loading_view_while_fetch_in_flight() {
    let harness = TestHarness::new(region_sales_chart());
    let controller = harness.controller(region_bar_widget());

    match controller.view() {
        WidgetView::Loading(placeholder) => {
            assert_eq!(placeholder.kind, SkeletonKind::Chart);
            assert_eq!(placeholder.message, LOADING_MESSAGE);
        }
        other => panic!("expected loading view, got {:?}", other),
    }

    controller.refresh(&SharedInputs::default()).await;
    assert!(matches!(controller.view(), WidgetView::Chart(_)));

    harness.source.push(100, Ok(region_sales_chart()));
    let handle = controller.spawn_refresh(SharedInputs {
        refetch: 1,
        ..SharedInputs::default()
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(controller.is_loading());
    assert!(matches!(controller.view(), WidgetView::Loading(_)));

    assert_eq!(handle.await.unwrap(), FetchOutcome::Committed);
    assert!(matches!(controller.view(), WidgetView::Chart(_)));
}

#[tokio::test]
async fn test_failed_fetch_shows_configured_message() {
    let config = DashboardConfig {
        nodata_message: "No rows for this widget".into(),
        ..DashboardConfig::default()
    };
    let harness = TestHarness::with_config(region_sales_chart(), config);
    harness
        .source
        .push(0, Err(FetchError::Query("connection reset".into())));
    let controller = harness.controller(region_bar_widget());

    assert_eq!(controller.refresh(&SharedInputs::default()).await, FetchOutcome::Committed);
    let view = controller.view();
    assert!(matches!(view, WidgetView::NoData { .. }));
    assert_eq!(view.message(), Some("No rows for this widget"));
}

#[tokio::test]
async fn test_sankey_on_unsupported_library_shows_placeholder() {
    let harness = TestHarness::new(flow_sankey());
    let mut widget = Widget::new("w-flow", ChartType::Sankey);
    widget.chart_library = Some(ChartLibrary::Chartjs);
    let controller = harness.controller(widget);
    controller.refresh(&SharedInputs::default()).await;

    assert_eq!(
        controller.view().message(),
        Some("Chart.js does not support sankey charts")
    );
}

#[tokio::test]
async fn test_sankey_renders_on_default_library() {
    let harness = TestHarness::new(flow_sankey());
    let controller = harness.controller(Widget::new("w-flow", ChartType::Sankey));
    controller.refresh(&SharedInputs::default()).await;

    match controller.view() {
        WidgetView::Chart(render) => assert!(render.options().is_some()),
        other => panic!("expected chart view, got {:?}", other),
    }
    assert!(controller.mount_chart().is_some());
}

#[tokio::test]
async fn test_table_view_follows_collapsed_rows() {
    let harness = TestHarness::new(region_city_table());
    let controller = harness.controller(region_city_table_widget());
    controller.refresh(&SharedInputs::default()).await;

    let WidgetView::Table(expanded) = controller.view() else {
        panic!("expected table view");
    };
    assert_eq!(expanded.body.len(), 3);
    assert_eq!(expanded.footer.len(), 1);
    assert_eq!(expanded.pinned_columns, 2);

    harness.state.toggle_row_collapse("w-table", "East");
    let WidgetView::Table(collapsed) = controller.view() else {
        panic!("expected table view");
    };
    assert_eq!(collapsed.body.len(), 1);
    assert!(collapsed.body[0].is_collapsed);
    assert!(controller.mount_chart().is_none());
    assert!(controller.mount_table().is_some());
}

#[test]
fn test_dispatch_kpi_and_heatmap() {
    let kpi = ProcessedData::Kpi(KpiData {
        primary_value: KpiValue {
            label: "Orders".into(),
            value: FieldValue::Number(42.0),
            formatted: "42".into(),
        },
        secondary_value: None,
    });
    let widget = Widget::new("w-kpi", ChartType::Kpi);
    match dispatch(&widget, &kpi, &CollapsedSet::default()) {
        WidgetView::Kpi(card) => assert_eq!(card.primary, "42"),
        other => panic!("expected kpi view, got {:?}", other),
    }

    let heatmap = ProcessedData::Heatmap(HeatmapData {
        row_labels: vec!["Mon".into()],
        col_labels: vec!["AM".into(), "PM".into()],
        data: vec![vec![Some(1.0), None]],
        value_pill: None,
    });
    let widget = Widget::new("w-heat", ChartType::Heatmap);
    match dispatch(&widget, &heatmap, &CollapsedSet::default()) {
        WidgetView::Heatmap(view) => assert_eq!(view.cells[0][1].text, "-"),
        other => panic!("expected heatmap view, got {:?}", other),
    }
}

#[test]
fn test_dispatch_no_data_message() {
    let widget = region_bar_widget();
    let view = dispatch(
        &widget,
        &ProcessedData::no_data("Select a measure"),
        &CollapsedSet::default(),
    );
    assert_eq!(view.message(), Some("Select a measure"));
}
