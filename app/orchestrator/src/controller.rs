//! FILENAME: app/orchestrator/src/controller.rs
//! PURPOSE: Per-widget fetch lifecycle and dispatch to the right renderer.
//! CONTEXT: One controller per mounted widget. A fetch is issued only when
//! the widget's config key or the shared inputs change. Each fetch takes a
//! generation number; only the latest generation may commit, and nothing
//! commits after `teardown`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chart_engine::{backend_for, ChartBackend, ChartInstance, ChartRender};
use engine::{ProcessedData, TableRow, Widget};
use table_engine::{CollapsedSet, TableView};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::DashboardConfig;
use crate::debounce::{MountedChart, MountedTable};
use crate::host::DashboardHost;
use crate::interaction::chart_handlers;
use crate::logging::{FETCH, RENDER, TABLE};
use crate::source::{SharedInputs, WidgetDataSource};
use crate::views::{HeatmapView, KpiCard, LoadingPlaceholder};
use crate::{log_debug, log_enter, log_error, log_exit, log_perf};

pub const LOADING_MESSAGE: &str = "Loading...";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What the host draws for a widget right now.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    Loading(LoadingPlaceholder),
    NoData { message: String },
    Chart(ChartRender),
    Table(TableView),
    Kpi(KpiCard),
    Heatmap(HeatmapView),
}

impl WidgetView {
    /// Message for loading / no-data / placeholder views.
    pub fn message(&self) -> Option<&str> {
        match self {
            WidgetView::Loading(p) => Some(&p.message),
            WidgetView::NoData { message } => Some(message),
            WidgetView::Chart(render) => render.placeholder().map(|p| p.message.as_str()),
            WidgetView::Table(_) | WidgetView::Kpi(_) | WidgetView::Heatmap(_) => None,
        }
    }
}

/// Result of one `refresh` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Nothing relevant changed since the last fetch.
    Skipped,
    Committed,
    /// Superseded by a newer fetch, or the widget was torn down.
    Discarded,
}

#[derive(Debug, Default)]
struct FetchState {
    generation: u64,
    last_key: Option<String>,
    data: Option<ProcessedData>,
    loading: bool,
    last_elapsed: Option<Duration>,
    fetches: u64,
}

pub struct WidgetController {
    widget: Mutex<Widget>,
    source: Arc<dyn WidgetDataSource>,
    host: Arc<dyn DashboardHost>,
    config: Arc<DashboardConfig>,
    state: Mutex<FetchState>,
    alive: AtomicBool,
}

/// Key over the widget config and the shared inputs.
pub fn fetch_key(widget: &Widget, inputs: &SharedInputs) -> String {
    format!("{}#{}", widget.config_key(), inputs.fingerprint())
}

impl WidgetController {
    pub fn new(
        widget: Widget,
        source: Arc<dyn WidgetDataSource>,
        host: Arc<dyn DashboardHost>,
        config: Arc<DashboardConfig>,
    ) -> Self {
        WidgetController {
            widget: Mutex::new(widget),
            source,
            host,
            config,
            state: Mutex::new(FetchState::default()),
            alive: AtomicBool::new(true),
        }
    }

    pub fn widget(&self) -> Widget {
        lock(&self.widget).clone()
    }

    /// Replaces the configuration. The next `refresh` decides whether it
    /// needs a fetch.
    pub fn set_widget(&self, widget: Widget) {
        *lock(&self.widget) = widget;
    }

    pub fn data(&self) -> Option<ProcessedData> {
        lock(&self.state).data.clone()
    }

    pub fn is_loading(&self) -> bool {
        let state = lock(&self.state);
        state.loading || state.data.is_none()
    }

    pub fn last_fetch_time(&self) -> Option<Duration> {
        lock(&self.state).last_elapsed
    }

    /// Number of fetches issued so far.
    pub fn fetch_count(&self) -> u64 {
        lock(&self.state).fetches
    }

    /// Stops any in-flight fetch from committing.
    pub fn teardown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        log_debug!(FETCH, "widget {} torn down", lock(&self.widget).id);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub async fn refresh(&self, inputs: &SharedInputs) -> FetchOutcome {
        let widget = self.widget();
        let key = fetch_key(&widget, inputs);
        let generation = {
            let mut state = lock(&self.state);
            if state.last_key.as_deref() == Some(key.as_str()) {
                return FetchOutcome::Skipped;
            }
            state.last_key = Some(key);
            state.generation += 1;
            state.loading = true;
            state.fetches += 1;
            state.generation
        };
        log_enter!(FETCH, "refresh", "widget={} generation={}", widget.id, generation);

        let started = Instant::now();
        let result = self.source.fetch_widget_data(&widget, inputs).await;
        let elapsed = started.elapsed();

        if !self.is_alive() {
            log_debug!(FETCH, "widget {} result dropped after teardown", widget.id);
            return FetchOutcome::Discarded;
        }

        let data = match result {
            Ok(data) => data,
            Err(e) => {
                log_error!(FETCH, "widget {} fetch failed: {}", widget.id, e);
                ProcessedData::no_data(self.config.nodata_message.clone())
            }
        };

        {
            let mut state = lock(&self.state);
            if state.generation != generation {
                log_debug!(
                    FETCH,
                    "widget {} generation {} superseded by {}",
                    widget.id,
                    generation,
                    state.generation
                );
                return FetchOutcome::Discarded;
            }
            state.data = Some(data);
            state.loading = false;
            state.last_elapsed = Some(elapsed);
        }

        log_perf!(FETCH, &widget.id, elapsed);
        self.host.report_fetch_time(&widget.id, elapsed);
        log_exit!(FETCH, "refresh", "widget={} committed", widget.id);
        FetchOutcome::Committed
    }

    /// Runs `refresh` as its own task.
    pub fn spawn_refresh(self: &Arc<Self>, inputs: SharedInputs) -> JoinHandle<FetchOutcome> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.refresh(&inputs).await })
    }

    // ========================================================================
    // DISPATCH
    // ========================================================================

    pub fn view(&self) -> WidgetView {
        let widget = self.config.apply_defaults(&self.widget());
        let state = lock(&self.state);
        match (&state.data, state.loading) {
            (Some(data), false) => dispatch(&widget, data, &self.host.collapsed_rows(&widget.id)),
            _ => WidgetView::Loading(LoadingPlaceholder::for_widget(&widget, LOADING_MESSAGE)),
        }
    }

    /// Mounts an interactive chart for chart and sankey results.
    pub fn mount_chart(&self) -> Option<MountedChart> {
        let widget = self.config.apply_defaults(&self.widget());
        let data = self.data()?;
        let labels = match &data {
            ProcessedData::Chart(chart) => chart.labels.clone(),
            ProcessedData::Sankey(_) => Vec::new(),
            _ => return None,
        };
        let handlers = chart_handlers(Arc::clone(&self.host), &widget, &labels);
        let library = widget.chart_library.unwrap_or(self.config.default_library);
        let instance = ChartInstance::mount(backend_for(library), &widget, &data, handlers);
        log_debug!(RENDER, "widget {} mounted on {}", widget.id, library.display_name());
        Some(MountedChart::new(instance, self.config.resize_debounce()))
    }

    /// Sticky-offset tracker for a table result.
    pub fn mount_table(&self) -> Option<MountedTable> {
        match self.data()? {
            ProcessedData::Table(_) => Some(MountedTable::new(
                self.widget().shelves.rows.len(),
                self.config.sticky_debounce(),
            )),
            _ => None,
        }
    }

    /// Rows of the current table result, for header menus.
    pub fn table_rows(&self) -> Vec<TableRow> {
        match &lock(&self.state).data {
            Some(ProcessedData::Table(table)) => table.rows.clone(),
            _ => Vec::new(),
        }
    }
}

/// Picks the renderer for a processed result.
pub fn dispatch(widget: &Widget, data: &ProcessedData, collapsed: &CollapsedSet) -> WidgetView {
    match data {
        ProcessedData::Loading { message } => WidgetView::Loading(LoadingPlaceholder::for_widget(widget, message.as_str())),
        ProcessedData::NoData { message } => WidgetView::NoData {
            message: message.clone(),
        },
        ProcessedData::Table(table) => match TableView::build(table, widget, collapsed) {
            Ok(view) => WidgetView::Table(view),
            Err(e) => {
                log_error!(TABLE, "widget {} table rejected: {}", widget.id, e);
                WidgetView::NoData {
                    message: e.to_string(),
                }
            }
        },
        ProcessedData::Chart(_) | ProcessedData::Sankey(_) => {
            let backend: &dyn ChartBackend = backend_for(widget.chart_library.unwrap_or_default());
            WidgetView::Chart(backend.render(widget, data))
        }
        ProcessedData::Kpi(kpi) => WidgetView::Kpi(KpiCard::build(kpi, widget)),
        ProcessedData::Heatmap(heatmap) => WidgetView::Heatmap(HeatmapView::build(heatmap, widget)),
    }
}
