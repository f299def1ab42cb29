//! FILENAME: core/chart-engine/src/tooltip.rs
//! PURPOSE: Resolves which measure pill formats a series, and formats values with it.
//! CONTEXT: Tooltips, data labels and axis ticks all format through the pill
//! that produced the series so "$1,200.00" reads the same everywhere.

use engine::{format_f64, AxisRole, BoxPlotSummary, ChartDataset, Pill, Shelves, Widget};

/// Pill for the `index`-th dataset: the one named by `valuePillName`, else
/// the positional value pill, else the first value pill.
pub fn pill_for_dataset<'a>(shelves: &'a Shelves, dataset: &ChartDataset, index: usize) -> Option<&'a Pill> {
    if let Some(pill) = dataset
        .value_pill_name
        .as_deref()
        .and_then(|name| shelves.find_value_pill(name))
    {
        return Some(pill);
    }
    let pills = shelves.value_pills();
    pills.get(index).or_else(|| pills.first()).copied()
}

/// Pill formatting ticks on a value axis.
pub fn axis_pill<'a>(
    widget: &'a Widget,
    datasets: &[ChartDataset],
    roles: &[AxisRole],
    role: AxisRole,
) -> Option<&'a Pill> {
    let shelf_pill = match role {
        AxisRole::Primary => widget.shelves.values.first(),
        AxisRole::Secondary => widget.shelves.values2.first(),
    };
    shelf_pill.or_else(|| {
        let index = roles.iter().position(|r| *r == role)?;
        pill_for_dataset(&widget.shelves, &datasets[index], index)
    })
}

pub fn format_with(pill: Option<&Pill>, value: f64) -> String {
    format_f64(
        value,
        pill.and_then(|p| p.formatting.as_ref()),
        pill.and_then(|p| p.aggregation),
    )
}

/// Five-number summary, largest first.
pub fn box_plot_tooltip(summary: &BoxPlotSummary, pill: Option<&Pill>) -> String {
    [
        ("Max", summary.max),
        ("Q3", summary.q3),
        ("Median", summary.median),
        ("Q1", summary.q1),
        ("Min", summary.min),
    ]
    .iter()
    .map(|(name, value)| format!("{}: {}", name, format_with(pill, *value)))
    .collect::<Vec<_>>()
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{Aggregation, ValueFormat};

    fn shelves() -> Shelves {
        Shelves {
            values: vec![
                Pill::measure("v1", "Sales", Aggregation::Sum).with_formatting(ValueFormat::currency("$")),
                Pill::measure("v2", "Units", Aggregation::Count),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_named_pill_wins() {
        let shelves = shelves();
        let mut dataset = ChartDataset::numbers("x", &[Some(1.0)]);
        dataset.value_pill_name = Some("Units".to_string());
        assert_eq!(pill_for_dataset(&shelves, &dataset, 0).unwrap().name, "Units");
    }

    #[test]
    fn test_positional_then_first() {
        let shelves = shelves();
        let dataset = ChartDataset::numbers("x", &[Some(1.0)]);
        assert_eq!(pill_for_dataset(&shelves, &dataset, 1).unwrap().name, "Units");
        assert_eq!(pill_for_dataset(&shelves, &dataset, 7).unwrap().name, "Sales");
        assert!(pill_for_dataset(&Shelves::default(), &dataset, 0).is_none());
    }

    #[test]
    fn test_unknown_pill_name_falls_back() {
        let shelves = shelves();
        let mut dataset = ChartDataset::numbers("x", &[Some(1.0)]);
        dataset.value_pill_name = Some("Nope".to_string());
        assert_eq!(pill_for_dataset(&shelves, &dataset, 0).unwrap().name, "Sales");
    }

    #[test]
    fn test_format_with_pill() {
        let shelves = shelves();
        assert_eq!(format_with(shelves.values.first(), 1200.0), "$1,200.00");
        assert_eq!(format_with(None, 1200.0), "1,200");
    }
}
