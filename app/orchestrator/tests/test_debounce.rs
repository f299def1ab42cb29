//! FILENAME: tests/test_debounce.rs
//! Integration tests for debounced chart resizes and sticky-column offsets.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::{region_bar_widget, region_city_table, region_city_table_widget, region_sales_chart, TestHarness};
use orchestrator::{Debouncer, MountedChart, SharedInputs};
use tokio::time::sleep;

async fn mounted_bar(harness: &TestHarness) -> MountedChart {
    let controller = harness.controller(region_bar_widget());
    controller.refresh(&SharedInputs::default()).await;
    controller.mount_chart().expect("chart mounts")
}

// ============================================================================
// CHART RESIZE
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_resize_burst_redraws_once_with_last_size() {
    let harness = TestHarness::new(region_sales_chart());
    let mut mounted = mounted_bar(&harness).await;

    mounted.observe_resize(100.0, 100.0);
    mounted.observe_resize(200.0, 120.0);
    mounted.observe_resize(320.0, 240.0);
    assert!(mounted.resize_pending());

    sleep(Duration::from_millis(160)).await;

    assert!(!mounted.resize_pending());
    mounted.with_chart(|chart| {
        assert_eq!(chart.redraw_count(), 1);
        let size = chart.size().unwrap();
        assert_eq!((size.width, size.height), (320.0, 240.0));
    });
}

#[tokio::test(start_paused = true)]
async fn test_new_notification_restarts_the_window() {
    let harness = TestHarness::new(region_sales_chart());
    let mut mounted = mounted_bar(&harness).await;

    mounted.observe_resize(100.0, 100.0);
    sleep(Duration::from_millis(100)).await;
    mounted.observe_resize(400.0, 300.0);
    sleep(Duration::from_millis(100)).await;
    assert_eq!(mounted.with_chart(|chart| chart.redraw_count()), 0);

    sleep(Duration::from_millis(60)).await;
    assert_eq!(mounted.with_chart(|chart| chart.redraw_count()), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unmount_before_deadline_is_safe() {
    let harness = TestHarness::new(region_sales_chart());
    let mut mounted = mounted_bar(&harness).await;

    mounted.observe_resize(640.0, 480.0);
    drop(mounted);
    sleep(Duration::from_millis(500)).await;
}

#[tokio::test(start_paused = true)]
async fn test_dropped_debouncer_never_runs_its_task() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new(Duration::from_millis(150));
    let counter = Arc::clone(&runs);
    debouncer.schedule(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    drop(debouncer);

    sleep(Duration::from_millis(300)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_debouncer_runs_only_the_last_task() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new(Duration::from_millis(150));
    for step in 1..=3 {
        let counter = Arc::clone(&runs);
        debouncer.schedule(move || {
            counter.fetch_add(step, Ordering::SeqCst);
        });
    }

    sleep(Duration::from_millis(200)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 3);
    assert!(!debouncer.is_pending());
}

// ============================================================================
// STICKY OFFSETS
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_sticky_offsets_recomputed_after_delay() {
    let harness = TestHarness::new(region_city_table());
    let controller = harness.controller(region_city_table_widget());
    controller.refresh(&SharedInputs::default()).await;
    let mut table = controller.mount_table().expect("table mounts");

    table.observe_widths(vec![90.0, 90.0, 60.0]);
    table.observe_widths(vec![120.0, 80.0, 60.0]);
    assert!(table.recompute_pending());
    assert!(table.offsets().is_empty());

    sleep(Duration::from_millis(160)).await;
    assert_eq!(table.offsets(), vec![0.0, 120.0]);

    table.set_pinned(1);
    table.observe_widths(vec![150.0, 80.0, 60.0]);
    sleep(Duration::from_millis(160)).await;
    assert_eq!(table.offsets(), vec![0.0]);
}
