//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for orchestrator integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use engine::{
    Aggregation, ChartData, ChartDataset, ChartType, HeaderCell, Pill, ProcessedData, RowType,
    SankeyData, SankeyLink, SankeyNode, TableData, TableRow, Widget,
};
use orchestrator::{
    create_dashboard_state, DashboardConfig, DashboardHost, DashboardState, FetchError,
    SharedInputs, WidgetController, WidgetDataSource,
};

/// Data source that replays queued responses, each after an optional delay.
pub struct ScriptedSource {
    responses: Mutex<VecDeque<(Duration, Result<ProcessedData, FetchError>)>>,
    fallback: ProcessedData,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(fallback: ProcessedData) -> Self {
        ScriptedSource {
            responses: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, delay_ms: u64, result: Result<ProcessedData, FetchError>) {
        self.responses
            .lock()
            .unwrap()
            .push_back((Duration::from_millis(delay_ms), result));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WidgetDataSource for ScriptedSource {
    async fn fetch_widget_data(
        &self,
        _widget: &Widget,
        _inputs: &SharedInputs,
    ) -> Result<ProcessedData, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some((delay, result)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Test harness wiring an in-memory host to a scripted source.
pub struct TestHarness {
    pub state: Arc<DashboardState>,
    pub source: Arc<ScriptedSource>,
    pub config: Arc<DashboardConfig>,
}

impl TestHarness {
    pub fn new(fallback: ProcessedData) -> Self {
        TestHarness {
            state: Arc::new(create_dashboard_state()),
            source: Arc::new(ScriptedSource::new(fallback)),
            config: Arc::new(DashboardConfig::default()),
        }
    }

    pub fn with_config(fallback: ProcessedData, config: DashboardConfig) -> Self {
        TestHarness {
            config: Arc::new(config),
            ..Self::new(fallback)
        }
    }

    pub fn host(&self) -> Arc<dyn DashboardHost> {
        self.state.clone()
    }

    pub fn controller(&self, widget: Widget) -> Arc<WidgetController> {
        Arc::new(WidgetController::new(
            widget,
            self.source.clone(),
            self.host(),
            self.config.clone(),
        ))
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// BAR over Region with SUM(Sales), flagged as a cross-filter source.
pub fn region_bar_widget() -> Widget {
    let mut widget = Widget::new("w-bar", ChartType::Bar).as_cross_filter_source();
    widget.shelves.rows = vec![Pill::dimension("r1", "Region")];
    widget.shelves.values = vec![Pill::measure("v1", "Sales", Aggregation::Sum)];
    widget
}

pub fn region_sales_chart() -> ProcessedData {
    ProcessedData::Chart(ChartData {
        labels: vec!["East".to_string(), "West".to_string()],
        datasets: vec![ChartDataset::numbers("Sales", &[Some(100.0), Some(200.0)])],
    })
}

pub fn city_sales_chart() -> ProcessedData {
    ProcessedData::Chart(ChartData {
        labels: vec!["Boston".to_string(), "Salem".to_string()],
        datasets: vec![ChartDataset::numbers("Sales", &[Some(60.0), Some(40.0)])],
    })
}

pub fn flow_sankey() -> ProcessedData {
    ProcessedData::Sankey(SankeyData {
        nodes: vec![
            SankeyNode { name: "Visit".into() },
            SankeyNode { name: "Cart".into() },
        ],
        links: vec![SankeyLink {
            source: "Visit".into(),
            target: "Cart".into(),
            value: 40.0,
        }],
    })
}

/// Table over Region > City with a subtotal and a grand total.
pub fn region_city_table_widget() -> Widget {
    let mut widget = Widget::new("w-table", ChartType::Table).as_cross_filter_source();
    widget.shelves.rows = vec![Pill::dimension("r1", "Region"), Pill::dimension("r2", "City")];
    widget.shelves.values = vec![Pill::measure("v1", "Sales", Aggregation::Sum)];
    widget
}

pub fn region_city_table() -> ProcessedData {
    ProcessedData::Table(TableData {
        header_rows: vec![vec![
            HeaderCell::new("Region", "Region"),
            HeaderCell::new("City", "City"),
            HeaderCell::new("Sales", "Sales"),
        ]],
        rows: vec![
            TableRow::data(Some("East"), 0)
                .with_value("Region", "East")
                .with_value("Sales", 1000.0)
                .expandable(),
            TableRow::data(Some("East|Boston"), 1)
                .with_value("Region", "East")
                .with_value("City", "Boston")
                .with_value("Sales", 600.0),
            TableRow::data(Some("East|Salem"), 1)
                .with_value("Region", "East")
                .with_value("City", "Salem")
                .with_value("Sales", 400.0),
            TableRow::data(None, 0)
                .of_type(RowType::Grandtotal)
                .with_value("Region", "Grand Total")
                .with_value("Sales", 1000.0),
        ],
        column_order: vec!["Region".into(), "City".into(), "Sales".into()],
    })
}
