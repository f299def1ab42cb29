//! FILENAME: app/orchestrator/src/menu.rs
//! PURPOSE: Context menus for chart elements and table headers.
//! CONTEXT: Menus are built as plain data and handed to the host, which
//! draws them and later reports the chosen action back through
//! `apply_menu_action`.

use chart_engine::PointerEvent;
use engine::{FieldValue, TableRow, Widget};
use serde::Serialize;
use table_engine::{expandable_paths, has_expandable_rows};

use crate::host::DashboardHost;
use crate::interaction::drill_down;
use crate::logging::MENU;
use crate::{log_debug, log_info};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum MenuAction {
    #[serde(rename_all = "camelCase")]
    DrillDown { field_name: String, value: FieldValue },
    KeepOnly,
    Exclude,
    ExpandAll,
    CollapseAll,
    ToggleRowSubtotals,
    ToggleColumnTotals,
    ToggleGrandTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
    pub disabled: bool,
    /// Check mark state for toggle entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl MenuItem {
    fn new(label: impl Into<String>, action: MenuAction) -> Self {
        MenuItem {
            label: label.into(),
            action,
            disabled: false,
            checked: None,
        }
    }

    fn disabled_if(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn toggle(label: &str, action: MenuAction, checked: bool) -> Self {
        MenuItem {
            checked: Some(checked),
            ..MenuItem::new(label, action)
        }
    }
}

// ============================================================================
// BUILDERS
// ============================================================================

/// Menu for a right-click on a chart. Empty when nothing was hit or the
/// widget has no row/column dimension.
pub fn chart_menu(widget: &Widget, label: Option<&str>) -> Vec<MenuItem> {
    let Some(label) = label else {
        return Vec::new();
    };
    let Some(current) = widget.drill_path.current_dimension(&widget.shelves) else {
        return Vec::new();
    };

    let drill = match widget.drill_path.next_dimension(&widget.shelves) {
        Some(dimension) => MenuItem::new(
            format!("Drill down on {}", label),
            MenuAction::DrillDown {
                field_name: dimension.name.clone(),
                value: FieldValue::text(label),
            },
        ),
        None => MenuItem::new(
            "Drill down (deepest level)",
            MenuAction::DrillDown {
                field_name: current.name.clone(),
                value: FieldValue::text(label),
            },
        )
        .disabled_if(true),
    };

    vec![
        drill,
        MenuItem::new(format!("Keep only {}", label), MenuAction::KeepOnly).disabled_if(true),
        MenuItem::new(format!("Exclude {}", label), MenuAction::Exclude).disabled_if(true),
    ]
}

/// Menu for a right-click on a table header.
pub fn header_menu(widget: &Widget, rows: &[TableRow]) -> Vec<MenuItem> {
    let no_groups = !has_expandable_rows(rows);
    let totals = widget.subtotals();
    vec![
        MenuItem::new("Expand all", MenuAction::ExpandAll).disabled_if(no_groups),
        MenuItem::new("Collapse all", MenuAction::CollapseAll).disabled_if(no_groups),
        MenuItem::toggle("Row subtotals", MenuAction::ToggleRowSubtotals, totals.show_row_subtotals),
        MenuItem::toggle("Column totals", MenuAction::ToggleColumnTotals, totals.show_column_totals),
        MenuItem::toggle("Grand totals", MenuAction::ToggleGrandTotals, totals.show_grand_totals),
    ]
}

pub fn open_chart_menu(host: &dyn DashboardHost, widget: &Widget, label: Option<&str>, event: &PointerEvent) {
    let items = chart_menu(widget, label);
    if items.is_empty() {
        log_debug!(MENU, "widget {} right-click without menu", widget.id);
        return;
    }
    host.open_context_menu(event.client_x, event.client_y, items);
}

pub fn open_header_menu(host: &dyn DashboardHost, widget: &Widget, rows: &[TableRow], event: &mut PointerEvent) {
    event.prevent_default();
    host.open_context_menu(event.client_x, event.client_y, header_menu(widget, rows));
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Runs a chosen menu action. Returns the widget when its configuration
/// changed and was saved.
pub fn apply_menu_action(
    host: &dyn DashboardHost,
    widget: &Widget,
    action: &MenuAction,
    rows: &[TableRow],
) -> Option<Widget> {
    log_info!(MENU, "widget {} action {:?}", widget.id, action);
    match action {
        MenuAction::DrillDown { value, .. } => drill_down(host, widget, value.clone()),
        MenuAction::KeepOnly | MenuAction::Exclude => None,
        MenuAction::ExpandAll => {
            host.expand_all_rows(&widget.id);
            None
        }
        MenuAction::CollapseAll => {
            host.collapse_all_rows(&widget.id, expandable_paths(rows));
            None
        }
        MenuAction::ToggleRowSubtotals | MenuAction::ToggleColumnTotals | MenuAction::ToggleGrandTotals => {
            let mut totals = widget.subtotals();
            match action {
                MenuAction::ToggleRowSubtotals => totals.show_row_subtotals = !totals.show_row_subtotals,
                MenuAction::ToggleColumnTotals => totals.show_column_totals = !totals.show_column_totals,
                _ => totals.show_grand_totals = !totals.show_grand_totals,
            }
            let mut updated = widget.clone();
            updated.subtotal_settings = Some(totals);
            host.save_widget(updated.clone());
            Some(updated)
        }
    }
}
