//! FILENAME: core/table-engine/src/view.rs
//! Table View - Renderable output for the frontend.
//!
//! Combines the header grid, the user's column order, row visibility and
//! cell formatting into one structure the host draws without further logic.
//! Rebuilt from scratch whenever the data, the widget or the collapsed set
//! changes.

use engine::{
    format_value, ConditionalRule, FieldValue, Pill, PillType, RowType, SortOrder, TableData, TableRow, Widget,
};
use serde::Serialize;

use crate::columns::{apply_column_order, sticky_offsets};
use crate::conditional::{matching_rule, measure_for_column, CellStyle};
use crate::error::TableError;
use crate::header::{HeaderGrid, HeaderSlot};
use crate::rows::{partition_rows, CollapsedSet};

/// Suffix on a subtotal row's own grouping column.
pub const SUBTOTAL_SUFFIX: &str = "Total";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub key: String,
    pub label: String,
    /// Name of the measure pill this column shows, if any.
    pub measure: Option<String>,
    pub pinned: bool,
    pub sortable: bool,
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub key: String,
    pub value: FieldValue,
    pub text: String,
    pub style: CellStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub path: Option<String>,
    pub level: usize,
    pub row_type: RowType,
    pub is_expandable: bool,
    pub is_collapsed: bool,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub header: Vec<Vec<HeaderSlot>>,
    pub columns: Vec<ColumnView>,
    pub body: Vec<RowView>,
    pub footer: Vec<RowView>,
    /// Leading dimension columns pinned to the left edge.
    pub pinned_columns: usize,
}

impl TableView {
    pub fn build(data: &TableData, widget: &Widget, collapsed: &CollapsedSet) -> Result<Self, TableError> {
        data.validate_hierarchy()?;

        let grid = if data.header_rows.is_empty() {
            HeaderGrid::from_keys(&fallback_keys(data))
        } else {
            HeaderGrid::build(&data.header_rows)
        };
        let natural = grid.leaf_keys();
        let order = apply_column_order(&natural, &widget.column_order);
        let header = grid.layout(&order);

        let pinned_columns = widget.shelves.rows.len().min(order.len());
        let measures = widget.shelves.value_pills();

        let mut bindings: Vec<ColumnBinding> = Vec::with_capacity(order.len());
        let columns: Vec<ColumnView> = order
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let leaf = grid.leaf(key);
                let binding = ColumnBinding::resolve(key, widget, &measures);
                bindings.push(binding);
                ColumnView {
                    key: key.clone(),
                    label: leaf.map(|c| c.label.clone()).unwrap_or_else(|| key.clone()),
                    measure: binding.measure.map(|p| p.name.clone()),
                    pinned: i < pinned_columns,
                    sortable: leaf.map(|c| !c.is_measure_group).unwrap_or(false),
                    sort: widget
                        .sort
                        .as_ref()
                        .filter(|s| &s.field_name == key)
                        .map(|s| s.order),
                }
            })
            .collect();

        let (body_rows, footer_rows) = partition_rows(&data.rows, collapsed);
        let render = |row: &TableRow| {
            render_row(row, &columns, &bindings, &widget.conditional_formatting, collapsed)
        };

        Ok(TableView {
            body: body_rows.into_iter().map(render).collect(),
            footer: footer_rows.into_iter().map(render).collect(),
            header,
            columns,
            pinned_columns,
        })
    }

    pub fn column_keys(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.key.as_str()).collect()
    }

    /// Left offsets of the pinned columns for the measured widths.
    pub fn sticky_offsets(&self, widths: &[f64]) -> Vec<f64> {
        sticky_offsets(widths, self.pinned_columns)
    }
}

/// What a column shows, resolved by key so it survives reordering.
#[derive(Debug, Clone, Copy)]
struct ColumnBinding<'a> {
    measure: Option<&'a Pill>,
    /// Row-shelf level and pill of a grouping column.
    dimension: Option<(usize, &'a Pill)>,
}

impl<'a> ColumnBinding<'a> {
    fn resolve(key: &str, widget: &'a Widget, measures: &[&'a Pill]) -> Self {
        let dimension = widget
            .shelves
            .rows
            .iter()
            .enumerate()
            .find(|(_, pill)| pill.name == key);
        match dimension {
            Some(dimension) => ColumnBinding {
                measure: None,
                dimension: Some(dimension),
            },
            None => ColumnBinding {
                measure: measure_for_column(key, measures),
                dimension: None,
            },
        }
    }
}

/// Column keys when the processor sent no header rows.
fn fallback_keys(data: &TableData) -> Vec<String> {
    if !data.column_order.is_empty() {
        return data.column_order.clone();
    }
    data.rows
        .first()
        .map(|r| r.values.keys().cloned().collect())
        .unwrap_or_default()
}

/// Display text of a grouping cell. Datetime dimensions render ISO text
/// as a date; other dimensions show the value as recorded.
fn dimension_text(value: &FieldValue, pill: &Pill) -> String {
    match (pill.pill_type, value.as_date()) {
        (PillType::Datetime, Some(date)) => format_value(&FieldValue::Date(date), None, None),
        _ => value.to_string(),
    }
}

fn render_row(
    row: &TableRow,
    columns: &[ColumnView],
    bindings: &[ColumnBinding],
    rules: &[ConditionalRule],
    collapsed: &CollapsedSet,
) -> RowView {
    let row_style = match row.row_type {
        RowType::Data => CellStyle::default(),
        RowType::Subtotal => CellStyle {
            bold: true,
            shaded: true,
            ..Default::default()
        },
        RowType::Grandtotal => CellStyle {
            bold: true,
            ..Default::default()
        },
    };

    let cells = columns
        .iter()
        .zip(bindings)
        .map(|(column, binding)| {
            let value = row.value(&column.key);
            let (text, style) = match binding.measure {
                Some(pill) => {
                    let text = format_value(value, pill.formatting.as_ref(), pill.aggregation);
                    let style = match row.row_type {
                        RowType::Data => matching_rule(rules, &pill.name, value)
                            .map(CellStyle::from_rule)
                            .unwrap_or_else(|| row_style.clone()),
                        _ => row_style.clone(),
                    };
                    (text, style)
                }
                None => {
                    let mut text = match binding.dimension {
                        Some((_, pill)) => dimension_text(value, pill),
                        None => value.to_string(),
                    };
                    let own_group = binding.dimension.map(|(level, _)| level == row.level).unwrap_or(false);
                    if row.row_type == RowType::Subtotal && own_group {
                        if text.is_empty() {
                            text = SUBTOTAL_SUFFIX.to_string();
                        } else {
                            text = format!("{} {}", text, SUBTOTAL_SUFFIX);
                        }
                    }
                    (text, row_style.clone())
                }
            };
            CellView {
                key: column.key.clone(),
                value: value.clone(),
                text,
                style,
            }
        })
        .collect();

    RowView {
        path: row.path.clone(),
        level: row.level,
        row_type: row.row_type,
        is_expandable: row.is_expandable,
        is_collapsed: row
            .path
            .as_deref()
            .map(|p| collapsed.contains(p))
            .unwrap_or(false),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{Aggregation, ChartType, HeaderCell, RuleCondition, SortSpec, ValueFormat};

    fn widget() -> Widget {
        let mut w = Widget::new("t1", ChartType::Table);
        w.shelves.rows = vec![Pill::dimension("r1", "Region"), Pill::dimension("r2", "City")];
        w.shelves.values = vec![
            Pill::measure("v1", "Sales", Aggregation::Sum).with_formatting(ValueFormat::with_decimal_places(1)),
        ];
        w
    }

    fn data() -> TableData {
        TableData {
            header_rows: vec![vec![
                HeaderCell::new("Region", "Region"),
                HeaderCell::new("City", "City"),
                HeaderCell::new("Sales", "Sales"),
            ]],
            rows: vec![
                TableRow::data(Some("East"), 0)
                    .with_value("Region", "East")
                    .with_value("Sales", 1234.5)
                    .expandable(),
                TableRow::data(Some("East|Boston"), 1)
                    .with_value("Region", "East")
                    .with_value("City", "Boston")
                    .with_value("Sales", 600.0),
                TableRow::data(Some("East|Salem"), 1)
                    .with_value("Region", "East")
                    .with_value("City", "Salem")
                    .with_value("Sales", 400.0),
                TableRow::data(Some("East"), 0)
                    .of_type(RowType::Subtotal)
                    .with_value("Region", "East")
                    .with_value("Sales", 1000.0),
                TableRow::data(None, 0)
                    .of_type(RowType::Grandtotal)
                    .with_value("Region", "Grand Total")
                    .with_value("Sales", 1234.5),
            ],
            column_order: vec!["Region".into(), "City".into(), "Sales".into()],
        }
    }

    #[test]
    fn test_conditional_background_on_threshold() {
        let mut w = widget();
        w.conditional_formatting = vec![ConditionalRule {
            measure_field: "Sales".into(),
            condition: RuleCondition::GreaterThan,
            value: 500.0,
            background_color: Some("#f00".into()),
            text_color: None,
        }];
        let view = TableView::build(&data(), &w, &CollapsedSet::default()).unwrap();
        let boston = &view.body[1].cells[2];
        let salem = &view.body[2].cells[2];
        assert_eq!(boston.style.background_color.as_deref(), Some("#f00"));
        assert_eq!(salem.style.background_color, None);
    }

    #[test]
    fn test_measure_cells_are_formatted() {
        let view = TableView::build(&data(), &widget(), &CollapsedSet::default()).unwrap();
        assert_eq!(view.body[0].cells[2].text, "1,234.5");
        assert_eq!(view.body[0].cells[1].text, "");
    }

    #[test]
    fn test_subtotal_row_styling() {
        let view = TableView::build(&data(), &widget(), &CollapsedSet::default()).unwrap();
        let subtotal = &view.body[3];
        assert_eq!(subtotal.row_type, RowType::Subtotal);
        assert_eq!(subtotal.cells[0].text, "East Total");
        assert!(subtotal.cells[0].style.bold && subtotal.cells[0].style.shaded);
        assert_eq!(view.footer.len(), 1);
        assert_eq!(view.footer[0].cells[0].text, "Grand Total");
    }

    #[test]
    fn test_collapse_hides_children_and_marks_parent() {
        let collapsed: CollapsedSet = ["East".to_string()].into_iter().collect();
        let view = TableView::build(&data(), &widget(), &collapsed).unwrap();
        assert_eq!(view.body.len(), 2);
        assert!(view.body[0].is_collapsed);
    }

    #[test]
    fn test_user_column_order_and_sort_marker() {
        let mut w = widget();
        w.column_order = vec!["Sales".into(), "Region".into()];
        w.sort = Some(SortSpec {
            field_name: "Sales".into(),
            order: SortOrder::Desc,
        });
        let view = TableView::build(&data(), &w, &CollapsedSet::default()).unwrap();
        assert_eq!(view.column_keys(), vec!["Sales", "Region", "City"]);
        assert_eq!(view.columns[0].sort, Some(SortOrder::Desc));
        assert_eq!(view.header[0][0].key, "Sales");
    }

    #[test]
    fn test_reordered_measure_keeps_format_and_rules() {
        let mut w = widget();
        w.column_order = vec!["Sales".into(), "Region".into(), "City".into()];
        w.conditional_formatting = vec![ConditionalRule {
            measure_field: "Sales".into(),
            condition: RuleCondition::GreaterThan,
            value: 500.0,
            background_color: Some("#f00".into()),
            text_color: None,
        }];
        let view = TableView::build(&data(), &w, &CollapsedSet::default()).unwrap();

        assert_eq!(view.columns[0].measure.as_deref(), Some("Sales"));
        assert!(view.columns[0].pinned);
        assert_eq!(view.columns[1].measure, None);
        assert_eq!(view.body[0].cells[0].text, "1,234.5");
        assert_eq!(view.body[1].cells[0].style.background_color.as_deref(), Some("#f00"));
        assert_eq!(view.body[2].cells[0].style.background_color, None);
    }

    #[test]
    fn test_reordered_subtotal_label_stays_on_group_column() {
        let mut w = widget();
        w.column_order = vec!["Sales".into(), "Region".into(), "City".into()];
        let view = TableView::build(&data(), &w, &CollapsedSet::default()).unwrap();

        let subtotal = &view.body[3];
        assert_eq!(subtotal.row_type, RowType::Subtotal);
        assert_eq!(subtotal.cells[0].text, "1,000.0");
        assert_eq!(subtotal.cells[1].text, "East Total");
        assert_eq!(subtotal.cells[2].text, "");
    }

    #[test]
    fn test_datetime_dimension_reads_iso_text() {
        let mut month = Pill::dimension("r1", "Month");
        month.pill_type = PillType::Datetime;
        let mut w = Widget::new("t2", ChartType::Table);
        w.shelves.rows = vec![month, Pill::dimension("r2", "Label")];
        let table = TableData {
            header_rows: Vec::new(),
            rows: vec![TableRow::data(Some("2024-03-01"), 0)
                .with_value("Month", "2024-03-01")
                .with_value("Label", "2024-03-01")],
            column_order: vec!["Month".into(), "Label".into()],
        };
        let view = TableView::build(&table, &w, &CollapsedSet::default()).unwrap();
        assert_eq!(view.body[0].cells[0].text, "3/1/2024");
        assert_eq!(view.body[0].cells[1].text, "2024-03-01");
    }

    #[test]
    fn test_sticky_offsets_cover_dimension_columns() {
        let view = TableView::build(&data(), &widget(), &CollapsedSet::default()).unwrap();
        assert_eq!(view.pinned_columns, 2);
        assert_eq!(view.sticky_offsets(&[100.0, 80.0, 60.0]), vec![0.0, 100.0]);
    }

    #[test]
    fn test_broken_hierarchy_is_an_error() {
        let mut table = data();
        table.rows.push(TableRow::data(Some("North|Oslo"), 1));
        assert!(matches!(
            TableView::build(&table, &widget(), &CollapsedSet::default()),
            Err(TableError::Hierarchy(_))
        ));
    }

    #[test]
    fn test_view_serializes_for_host() {
        let view = TableView::build(&data(), &widget(), &CollapsedSet::default()).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["pinnedColumns"], 2);
        assert_eq!(json["body"][0]["rowType"], "data");
    }
}
