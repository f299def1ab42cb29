//! FILENAME: core/table-engine/src/conditional.rs
//! PURPOSE: Conditional formatting and row emphasis for table cells.
//! CONTEXT: Rules are evaluated in order and the first match wins; colors
//! from later matching rules are never merged in.

use engine::{ConditionalRule, FieldValue, Pill, PATH_DELIMITER};
use serde::Serialize;

/// Resolved style of a rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    pub bold: bool,
    pub shaded: bool,
}

impl CellStyle {
    pub fn from_rule(rule: &ConditionalRule) -> Self {
        CellStyle {
            background_color: rule.background_color.clone(),
            text_color: rule.text_color.clone(),
            ..Default::default()
        }
    }
}

/// Measure pill a column key belongs to: `Sales` or `<column path>|Sales`.
pub fn measure_for_column<'a>(key: &str, measures: &[&'a Pill]) -> Option<&'a Pill> {
    measures.iter().copied().find(|pill| {
        key == pill.name
            || key
                .strip_suffix(pill.name.as_str())
                .map(|head| head.ends_with(PATH_DELIMITER))
                .unwrap_or(false)
    })
}

/// First rule for `measure` that matches `value`. Non-numeric values never match.
pub fn matching_rule<'a>(
    rules: &'a [ConditionalRule],
    measure: &str,
    value: &FieldValue,
) -> Option<&'a ConditionalRule> {
    let number = value.as_f64().filter(|n| !n.is_nan())?;
    rules
        .iter()
        .filter(|rule| rule.measure_field == measure)
        .find(|rule| rule.condition.compare(number, rule.value))
}
