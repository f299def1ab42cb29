//! FILENAME: app/orchestrator/src/host.rs
//! PURPOSE: Mutation entry points the page exposes to widgets.
//! CONTEXT: The cross-filter is page-wide and written only through
//! `set_cross_filter`; concurrent writers resolve last-write-wins.
//! Collapsed rows and saved widgets are keyed by widget id.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use engine::{CrossFilter, Widget};
use table_engine::CollapsedSet;

use crate::menu::MenuItem;

pub trait DashboardHost: Send + Sync {
    fn save_widget(&self, widget: Widget);

    fn set_cross_filter(&self, filter: Option<CrossFilter>);

    fn cross_filter(&self) -> Option<CrossFilter>;

    fn toggle_row_collapse(&self, widget_id: &str, path: &str);

    fn collapse_all_rows(&self, widget_id: &str, paths: Vec<String>);

    fn expand_all_rows(&self, widget_id: &str);

    fn collapsed_rows(&self, widget_id: &str) -> CollapsedSet;

    fn open_context_menu(&self, x: f64, y: f64, items: Vec<MenuItem>);

    /// Elapsed wall-clock time of a committed fetch.
    fn report_fetch_time(&self, _widget_id: &str, _elapsed: Duration) {}
}

/// A context menu the host is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenMenu {
    pub x: f64,
    pub y: f64,
    pub items: Vec<MenuItem>,
}

// ============================================================================
// IN-MEMORY HOST
// ============================================================================

#[derive(Debug, Default)]
pub struct DashboardState {
    pub cross_filter: Mutex<Option<CrossFilter>>,
    /// Collapsed ancestor paths per table widget
    pub collapsed_rows: Mutex<HashMap<String, CollapsedSet>>,
    /// Last saved configuration per widget
    pub widgets: Mutex<HashMap<String, Widget>>,
    pub open_menu: Mutex<Option<OpenMenu>>,
    pub fetch_times: Mutex<HashMap<String, Duration>>,
}

pub fn create_dashboard_state() -> DashboardState {
    DashboardState::default()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DashboardState {
    pub fn widget(&self, id: &str) -> Option<Widget> {
        lock(&self.widgets).get(id).cloned()
    }

    pub fn open_menu(&self) -> Option<OpenMenu> {
        lock(&self.open_menu).clone()
    }

    pub fn close_menu(&self) {
        *lock(&self.open_menu) = None;
    }

    pub fn fetch_time(&self, widget_id: &str) -> Option<Duration> {
        lock(&self.fetch_times).get(widget_id).copied()
    }
}

impl DashboardHost for DashboardState {
    fn save_widget(&self, widget: Widget) {
        lock(&self.widgets).insert(widget.id.clone(), widget);
    }

    fn set_cross_filter(&self, filter: Option<CrossFilter>) {
        *lock(&self.cross_filter) = filter;
    }

    fn cross_filter(&self) -> Option<CrossFilter> {
        lock(&self.cross_filter).clone()
    }

    fn toggle_row_collapse(&self, widget_id: &str, path: &str) {
        let mut all = lock(&self.collapsed_rows);
        let set = all.entry(widget_id.to_string()).or_default();
        if !set.remove(path) {
            set.insert(path.to_string());
        }
    }

    fn collapse_all_rows(&self, widget_id: &str, paths: Vec<String>) {
        lock(&self.collapsed_rows).insert(widget_id.to_string(), paths.into_iter().collect());
    }

    fn expand_all_rows(&self, widget_id: &str) {
        lock(&self.collapsed_rows).remove(widget_id);
    }

    fn collapsed_rows(&self, widget_id: &str) -> CollapsedSet {
        lock(&self.collapsed_rows).get(widget_id).cloned().unwrap_or_default()
    }

    fn open_context_menu(&self, x: f64, y: f64, items: Vec<MenuItem>) {
        *lock(&self.open_menu) = Some(OpenMenu { x, y, items });
    }

    fn report_fetch_time(&self, widget_id: &str, elapsed: Duration) {
        lock(&self.fetch_times).insert(widget_id.to_string(), elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{FieldValue, Pill};

    fn filter(source: &str, value: &str) -> CrossFilter {
        CrossFilter::from_click(source, &Pill::dimension("r1", "Region"), FieldValue::text(value))
    }

    #[test]
    fn test_cross_filter_last_write_wins() {
        let state = create_dashboard_state();
        state.set_cross_filter(Some(filter("a", "East")));
        state.set_cross_filter(Some(filter("b", "West")));
        assert_eq!(state.cross_filter().unwrap().source_widget_id, "b");
        state.set_cross_filter(None);
        assert!(state.cross_filter().is_none());
    }

    #[test]
    fn test_row_collapse_is_per_widget() {
        let state = create_dashboard_state();
        state.toggle_row_collapse("t1", "East");
        assert!(state.collapsed_rows("t1").contains("East"));
        assert!(state.collapsed_rows("t2").is_empty());

        state.toggle_row_collapse("t1", "East");
        assert!(state.collapsed_rows("t1").is_empty());

        state.collapse_all_rows("t1", vec!["East".into(), "West".into()]);
        assert_eq!(state.collapsed_rows("t1").len(), 2);
        state.expand_all_rows("t1");
        assert!(state.collapsed_rows("t1").is_empty());
    }
}
