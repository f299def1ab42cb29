//! FILENAME: core/engine/src/filter.rs
//! PURPOSE: Interaction state derived from clicks: cross-filters and drill paths.

use serde::{Deserialize, Serialize};

use crate::pill::{Aggregation, Pill, PillFilter, Shelves};
use crate::value::FieldValue;

// ============================================================================
// CROSS-FILTER
// ============================================================================

/// A transient filter emitted by clicking a source widget. At most one is
/// active system-wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossFilter {
    pub source_widget_id: String,
    pub filter: Pill,
}

impl CrossFilter {
    /// Builds the "is one of [value]" filter installed by a click.
    pub fn from_click(source_widget_id: &str, dimension: &Pill, value: FieldValue) -> Self {
        let mut filter = Pill::dimension(
            format!("cross-filter-{}-{}", source_widget_id, dimension.id),
            dimension.name.clone(),
        );
        filter.simple_name = dimension.display_name().to_string();
        filter.pill_type = dimension.pill_type;
        filter.aggregation = Some(Aggregation::Count);
        filter.filter = Some(PillFilter::is_one_of(vec![value]));

        CrossFilter {
            source_widget_id: source_widget_id.to_string(),
            filter,
        }
    }

    /// The selected value (first filter value).
    pub fn value(&self) -> Option<&FieldValue> {
        self.filter.filter.as_ref().and_then(|f| f.values.first())
    }

    /// Whether a click on `value` from `widget_id` would hit this same filter.
    pub fn is_same_selection(&self, widget_id: &str, value: &FieldValue) -> bool {
        self.source_widget_id == widget_id
            && self.value().map(|v| v.loosely_equals(value)).unwrap_or(false)
    }
}

// ============================================================================
// DRILL PATH
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillStep {
    pub field_name: String,
    pub value: FieldValue,
}

impl DrillStep {
    pub fn new(field_name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        DrillStep {
            field_name: field_name.into(),
            value: value.into(),
        }
    }
}

/// Where a drill-up lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillUpTarget {
    /// Clear the whole path.
    Root,
    /// Keep only the first `n` steps.
    Level(usize),
}

impl DrillUpTarget {
    /// Maps the host's signed level convention: negative means root.
    pub fn from_level(level: i64) -> Self {
        if level < 0 {
            DrillUpTarget::Root
        } else {
            DrillUpTarget::Level(level as usize)
        }
    }
}

/// Ordered dimension-value narrowings applied to one widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct DrillPath(pub Vec<DrillStep>);

impl DrillPath {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn steps(&self) -> &[DrillStep] {
        &self.0
    }

    pub fn drill_down(&mut self, step: DrillStep) {
        self.0.push(step);
    }

    pub fn drill_up(&mut self, target: DrillUpTarget) {
        match target {
            DrillUpTarget::Root => self.0.clear(),
            DrillUpTarget::Level(n) => self.0.truncate(n),
        }
    }

    /// Deepest reachable drill length: one less than the drillable count.
    pub fn max_depth(shelves: &Shelves) -> usize {
        shelves.drillable_dimensions().len().saturating_sub(1)
    }

    /// Drilling needs a further dimension beyond the one currently shown.
    pub fn can_drill_down(&self, shelves: &Shelves) -> bool {
        shelves.drillable_dimensions().len() > self.len() + 1
    }

    /// The dimension currently displayed at this drill depth.
    pub fn current_dimension<'a>(&self, shelves: &'a Shelves) -> Option<&'a Pill> {
        let dims = shelves.drillable_dimensions();
        if dims.is_empty() {
            return None;
        }
        let index = self.len().min(dims.len() - 1);
        Some(dims[index])
    }

    /// The dimension the next drill-down step narrows (the one shown now).
    pub fn next_dimension<'a>(&self, shelves: &'a Shelves) -> Option<&'a Pill> {
        if !self.can_drill_down(shelves) {
            return None;
        }
        shelves.drillable_dimensions().get(self.len()).copied()
    }
}
