//! FILENAME: core/engine/src/pill.rs
//! PURPOSE: Field bindings ("pills") and the shelves that hold them.
//! CONTEXT: Shelf order is significant everywhere downstream: it drives drill
//! order, column order and series order.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::value::FieldValue;

// ============================================================================
// PILL ATTRIBUTES
// ============================================================================

/// What kind of field a pill binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PillType {
    Dimension,
    Measure,
    Datetime,
}

/// Aggregation applied to a measure pill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Aggregation {
    #[default]
    Sum,
    Avg,
    Count,
    CountDistinct,
    Min,
    Max,
    Median,
    PercentOfTotal,
}

impl Aggregation {
    /// Short label used in series names ("SUM(Sales)").
    pub fn label(&self) -> &'static str {
        match self {
            Aggregation::Sum => "SUM",
            Aggregation::Avg => "AVG",
            Aggregation::Count => "COUNT",
            Aggregation::CountDistinct => "COUNTD",
            Aggregation::Min => "MIN",
            Aggregation::Max => "MAX",
            Aggregation::Median => "MEDIAN",
            Aggregation::PercentOfTotal => "% OF TOTAL",
        }
    }
}

/// Display formatting attached to a measure pill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValueFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Forces exactly this many fraction digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u8>,
    /// Upper bound on fraction digits when `decimal_places` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_fraction_digits: Option<u8>,
}

impl ValueFormat {
    pub fn with_decimal_places(decimal_places: u8) -> Self {
        ValueFormat {
            decimal_places: Some(decimal_places),
            ..Default::default()
        }
    }

    pub fn currency(symbol: &str) -> Self {
        ValueFormat {
            prefix: Some(symbol.to_string()),
            decimal_places: Some(2),
            ..Default::default()
        }
    }
}

// ============================================================================
// FILTERS
// ============================================================================

/// Filter condition carried by a filter pill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterCondition {
    IsOneOf,
    IsNotOneOf,
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Between,
    Contains,
}

/// A filter bound to a pill: one condition, at least one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillFilter {
    pub condition: FilterCondition,
    pub values: Vec<FieldValue>,
}

impl PillFilter {
    pub fn is_one_of(values: Vec<FieldValue>) -> Self {
        PillFilter {
            condition: FilterCondition::IsOneOf,
            values,
        }
    }
}

// ============================================================================
// PILL
// ============================================================================

/// A field reference bound to a shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pill {
    pub id: String,
    /// Field key in the dataset.
    pub name: String,
    /// Display label.
    #[serde(default)]
    pub simple_name: String,
    #[serde(rename = "type")]
    pub pill_type: PillType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatting: Option<ValueFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<PillFilter>,
}

impl Pill {
    pub fn dimension(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Pill {
            id: id.into(),
            simple_name: name.clone(),
            name,
            pill_type: PillType::Dimension,
            aggregation: None,
            formatting: None,
            filter: None,
        }
    }

    pub fn measure(id: impl Into<String>, name: impl Into<String>, aggregation: Aggregation) -> Self {
        let name = name.into();
        Pill {
            id: id.into(),
            simple_name: name.clone(),
            name,
            pill_type: PillType::Measure,
            aggregation: Some(aggregation),
            formatting: None,
            filter: None,
        }
    }

    pub fn with_formatting(mut self, formatting: ValueFormat) -> Self {
        self.formatting = Some(formatting);
        self
    }

    pub fn with_filter(mut self, filter: PillFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn is_measure(&self) -> bool {
        self.pill_type == PillType::Measure
    }

    /// Label shown in legends and headers. Falls back to the field key.
    pub fn display_name(&self) -> &str {
        if self.simple_name.is_empty() {
            &self.name
        } else {
            &self.simple_name
        }
    }

    /// Checks the pill invariants: measures carry an aggregation, filters
    /// carry at least one value.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.is_measure() && self.aggregation.is_none() {
            return Err(ModelError::MissingAggregation(self.name.clone()));
        }
        if let Some(filter) = &self.filter {
            if filter.values.is_empty() {
                return Err(ModelError::EmptyFilterValues(self.name.clone()));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SHELVES
// ============================================================================

/// Named shelf slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShelfRole {
    Rows,
    Columns,
    Values,
    Values2,
    Category,
    Filters,
}

/// Shelf role -> ordered pills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Shelves {
    pub rows: Vec<Pill>,
    pub columns: Vec<Pill>,
    pub values: Vec<Pill>,
    pub values2: Vec<Pill>,
    pub category: Vec<Pill>,
    pub filters: Vec<Pill>,
}

impl Shelves {
    pub fn pills(&self, role: ShelfRole) -> &[Pill] {
        match role {
            ShelfRole::Rows => &self.rows,
            ShelfRole::Columns => &self.columns,
            ShelfRole::Values => &self.values,
            ShelfRole::Values2 => &self.values2,
            ShelfRole::Category => &self.category,
            ShelfRole::Filters => &self.filters,
        }
    }

    /// Dimensions eligible for drill-down: rows first, then columns.
    pub fn drillable_dimensions(&self) -> Vec<&Pill> {
        self.rows.iter().chain(self.columns.iter()).collect()
    }

    /// All measure pills in series order: primary values, then secondary.
    pub fn value_pills(&self) -> Vec<&Pill> {
        self.values.iter().chain(self.values2.iter()).collect()
    }

    pub fn find_value_pill(&self, name: &str) -> Option<&Pill> {
        self.values
            .iter()
            .chain(self.values2.iter())
            .find(|p| p.name == name)
    }

    pub fn has_dimensions(&self) -> bool {
        !self.rows.is_empty() || !self.columns.is_empty()
    }

    /// Validates every pill; pills on the filters shelf must carry a filter.
    pub fn validate(&self) -> Result<(), ModelError> {
        for role in [
            ShelfRole::Rows,
            ShelfRole::Columns,
            ShelfRole::Values,
            ShelfRole::Values2,
            ShelfRole::Category,
        ] {
            for pill in self.pills(role) {
                pill.validate()?;
            }
        }
        for pill in &self.filters {
            if pill.filter.is_none() {
                return Err(ModelError::MissingFilter(pill.name.clone()));
            }
            pill.validate()?;
        }
        Ok(())
    }
}
