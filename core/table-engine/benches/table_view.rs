use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::{
    Aggregation, ChartType, ConditionalRule, HeaderCell, Pill, RowType, RuleCondition, TableData,
    TableRow, Widget,
};
use table_engine::{CollapsedSet, HeaderGrid, TableView};

const REGIONS: usize = 20;
const CITIES: usize = 50;
const YEARS: [&str; 4] = ["2021", "2022", "2023", "2024"];
const MEASURES: [&str; 2] = ["Sales", "Profit"];

fn widget() -> Widget {
    let mut w = Widget::new("bench", ChartType::Table);
    w.shelves.rows = vec![Pill::dimension("r1", "Region"), Pill::dimension("r2", "City")];
    w.shelves.values = MEASURES
        .iter()
        .map(|m| Pill::measure(*m, *m, Aggregation::Sum))
        .collect();
    w.conditional_formatting = vec![ConditionalRule {
        measure_field: "Sales".into(),
        condition: RuleCondition::GreaterThan,
        value: 500.0,
        background_color: Some("#fee2e2".into()),
        text_color: None,
    }];
    w
}

fn header_rows() -> Vec<Vec<HeaderCell>> {
    let mut top = vec![
        HeaderCell::new("Region", "Region").spanning(1, 2),
        HeaderCell::new("City", "City").spanning(1, 2),
    ];
    let mut bottom = Vec::new();
    for year in YEARS {
        top.push(HeaderCell::new(year, year).spanning(MEASURES.len() as u16, 1).measure_group());
        for measure in MEASURES {
            bottom.push(HeaderCell::new(&format!("{}|{}", year, measure), measure));
        }
    }
    vec![top, bottom]
}

fn table() -> TableData {
    let mut rows = Vec::new();
    for r in 0..REGIONS {
        let region = format!("Region {}", r);
        rows.push(TableRow::data(Some(region.as_str()), 0).with_value("Region", region.as_str()).expandable());
        for c in 0..CITIES {
            let city = format!("City {}", c);
            let path = format!("{}|{}", region, city);
            let mut row = TableRow::data(Some(path.as_str()), 1)
                .with_value("Region", region.as_str())
                .with_value("City", city.as_str());
            for (y, year) in YEARS.iter().enumerate() {
                for measure in MEASURES {
                    let v = ((r * 31 + c * 17 + y * 7) % 1000) as f64;
                    row = row.with_value(&format!("{}|{}", year, measure), v);
                }
            }
            rows.push(row);
        }
        rows.push(
            TableRow::data(Some(region.as_str()), 0)
                .of_type(RowType::Subtotal)
                .with_value("Region", region.as_str()),
        );
    }
    rows.push(TableRow::data(None, 0).of_type(RowType::Grandtotal).with_value("Region", "Grand Total"));
    TableData {
        header_rows: header_rows(),
        rows,
        column_order: Vec::new(),
    }
}

fn view_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_view");
    let data = table();
    let widget = widget();

    group.bench_function("build_expanded", |b| {
        let collapsed = CollapsedSet::default();
        b.iter(|| TableView::build(black_box(&data), black_box(&widget), &collapsed).unwrap());
    });

    group.bench_function("build_half_collapsed", |b| {
        let collapsed: CollapsedSet = (0..REGIONS).step_by(2).map(|r| format!("Region {}", r)).collect();
        b.iter(|| TableView::build(black_box(&data), black_box(&widget), &collapsed).unwrap());
    });

    group.bench_function("reordered_header_layout", |b| {
        let grid = HeaderGrid::build(&data.header_rows);
        let mut order: Vec<String> = grid.leaf_keys().iter().map(|k| k.to_string()).collect();
        order.reverse();
        b.iter(|| grid.layout(black_box(&order)));
    });

    group.finish();
}

criterion_group!(benches, view_benchmark);
criterion_main!(benches);
