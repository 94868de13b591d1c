use chiptools::core::{Cell, ConstantMap, Row, Table};
use chiptools::parsing::csv_parser::{parse_table_csv_str, table_to_csv_string, CsvOptions};
use chiptools::transformations::{ConstantColumnExtractor, DuplicateRowReducer};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// `rows` observations at 30 minute steps, so every other row repeats a key
/// once rounded to the hour. Column 0 is constant.
fn observation_table(rows: usize, cols: usize) -> Table {
    let start = NaiveDate::from_ymd_opt(2019, 4, 2)
        .and_then(|d| d.and_hms_opt(11, 0, 0))
        .unwrap();
    let columns: Vec<String> = (0..cols).map(|i| format!("c{}", i)).collect();
    let table_rows = (0..rows)
        .map(|i| {
            let key = start + Duration::hours((i / 2) as i64);
            let cells = (0..cols)
                .map(|c| {
                    if c == 0 {
                        Cell::present(1.0)
                    } else if (i + c) % 3 == 0 {
                        Cell::Missing
                    } else {
                        Cell::present((i * c) as f64)
                    }
                })
                .collect();
            Row::new(key, cells)
        })
        .collect();
    Table::new(columns, table_rows).with_label("time")
}

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_duplicates");
    let reducer = DuplicateRowReducer::new();

    for rows in [1_000usize, 10_000, 100_000] {
        let table = observation_table(rows, 8);
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| reducer.reduce(black_box(table)).unwrap());
        });
    }

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_constants");
    let extractor = ConstantColumnExtractor::new();

    for cols in [4usize, 32, 128] {
        let table = observation_table(10_000, cols);
        group.bench_with_input(BenchmarkId::new("columns", cols), &table, |b, table| {
            b.iter(|| {
                let mut mapping = ConstantMap::new();
                extractor.extract(black_box(table), &mut mapping).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_csv_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_parsing");
    let options = CsvOptions::default();
    let csv = table_to_csv_string(&observation_table(10_000, 8), &options).unwrap();

    group.bench_function("parse_10000_rows", |b| {
        b.iter(|| parse_table_csv_str(black_box(&csv), &options).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_reduce, bench_extract, bench_csv_parsing);
criterion_main!(benches);
