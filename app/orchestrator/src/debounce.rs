//! FILENAME: app/orchestrator/src/debounce.rs
//! PURPOSE: Debounced resize handling for mounted charts and tables.
//! CONTEXT: Each mounted view owns one `Debouncer`, so at most one
//! recompute is in flight per container. Scheduled tasks hold only a weak
//! reference to the view; after the view is dropped they do nothing, and
//! dropping the view aborts the pending task.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chart_engine::ChartInstance;
use table_engine::sticky_offsets;
use tokio::task::JoinHandle;

use crate::log_debug;
use crate::logging::RESIZE;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Single-slot delayed task. Scheduling again replaces the pending run.
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer { delay, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule<F>(&mut self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// MOUNTED CHART
// ============================================================================

/// A chart attached to a container whose size the host observes.
pub struct MountedChart {
    chart: Arc<Mutex<ChartInstance>>,
    debouncer: Debouncer,
}

impl MountedChart {
    pub fn new(chart: ChartInstance, delay: Duration) -> Self {
        MountedChart {
            chart: Arc::new(Mutex::new(chart)),
            debouncer: Debouncer::new(delay),
        }
    }

    /// Called for every size notification; the chart resizes once the
    /// notifications settle.
    pub fn observe_resize(&mut self, width: f64, height: f64) {
        let chart: Weak<Mutex<ChartInstance>> = Arc::downgrade(&self.chart);
        self.debouncer.schedule(move || {
            let Some(chart) = chart.upgrade() else {
                return;
            };
            let redrawn = lock(&chart).resize(width, height);
            log_debug!(RESIZE, "chart resize {}x{} redrawn={}", width, height, redrawn);
        });
    }

    pub fn resize_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn with_chart<R>(&self, f: impl FnOnce(&mut ChartInstance) -> R) -> R {
        f(&mut lock(&self.chart))
    }
}

impl Drop for MountedChart {
    fn drop(&mut self) {
        self.debouncer.cancel();
        lock(&self.chart).dispose();
    }
}

// ============================================================================
// MOUNTED TABLE
// ============================================================================

/// Sticky-column offsets of a mounted table, recomputed after width changes.
pub struct MountedTable {
    pinned: usize,
    offsets: Arc<Mutex<Vec<f64>>>,
    debouncer: Debouncer,
}

impl MountedTable {
    pub fn new(pinned: usize, delay: Duration) -> Self {
        MountedTable {
            pinned,
            offsets: Arc::new(Mutex::new(Vec::new())),
            debouncer: Debouncer::new(delay),
        }
    }

    /// Pinned column count changes with the row shelf.
    pub fn set_pinned(&mut self, pinned: usize) {
        self.pinned = pinned;
    }

    /// Measured column widths after a resize, data change or reorder.
    pub fn observe_widths(&mut self, widths: Vec<f64>) {
        let offsets = Arc::downgrade(&self.offsets);
        let pinned = self.pinned;
        self.debouncer.schedule(move || {
            let Some(offsets) = offsets.upgrade() else {
                return;
            };
            *lock(&offsets) = sticky_offsets(&widths, pinned);
            log_debug!(RESIZE, "sticky offsets recomputed for {} columns", pinned);
        });
    }

    pub fn offsets(&self) -> Vec<f64> {
        lock(&self.offsets).clone()
    }

    pub fn recompute_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
