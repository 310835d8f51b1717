//! Benchmarks for heat map layout performance.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hotmap::csv::{parse_rows, Delimiter};
use hotmap::layout::{arrange_title, size_map};
use hotmap::{build_map, config::TextMetrics, CellSpan, HotmapConfig};

const CATEGORIES: [&str; 5] = ["Language", "Web", "Mobile", "DevOps", "Data/Analytics"];
const TITLES: [&str; 6] = [
    "Rust",
    "Java/Node.js",
    "Android and iOS",
    "Big Data Tools",
    "Elasticsearch",
    "Ruby on Rails",
];

/// Synthetic sheet of `n` technologies.
fn sheet(n: usize) -> String {
    let mut csv = String::from(
        "\"TC Community ready? (1 = VERY, 5 = Not possible)\",Technologies,Technology Type,\"Should we sell? (Yes/No/With Care)\",Widely Used on TC\n",
    );
    for i in 0..n {
        let title = TITLES[i % TITLES.len()];
        let category = CATEGORIES[i % CATEGORIES.len()];
        let sell = ["Y", "N", "WC"][i % 3];
        let ready = if i % 2 == 0 { "Y" } else { "" };
        csv.push_str(&format!("{},{title} {i},{category},{sell},{ready}\n", i % 5 + 1));
    }
    csv
}

/// Full pipeline: CSV parse, filter, sort, span, layout and render state.
fn bench_full_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_layout");
    for n in [50usize, 500, 5000] {
        let data = sheet(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| {
                build_map(black_box(data.as_bytes()), 1280.0, HotmapConfig::default())
                    .expect("layout failed")
            })
        });
    }
    group.finish();
}

/// Relayout of an already loaded map at alternating widths.
fn bench_relayout(c: &mut Criterion) {
    let data = sheet(500);
    let mut map = build_map(data.as_bytes(), 1280.0, HotmapConfig::default()).expect("layout failed");
    let mut wide = false;
    c.bench_function("relayout_500", |b| {
        b.iter(|| {
            wide = !wide;
            map.resize(black_box(if wide { 1920.0 } else { 800.0 }))
        })
    });
}

fn bench_csv(c: &mut Criterion) {
    let data = sheet(5000);
    c.bench_function("parse_csv_5000", |b| {
        b.iter(|| parse_rows(black_box(data.as_bytes()), Delimiter::Comma).expect("parse failed"))
    });
}

fn bench_text(c: &mut Criterion) {
    let metrics = TextMetrics::default();
    c.bench_function("arrange_titles", |b| {
        b.iter(|| {
            for title in TITLES {
                black_box(arrange_title(black_box(title), CellSpan::Single, &metrics));
            }
        })
    });
    c.bench_function("size_map", |b| {
        b.iter(|| size_map(black_box(1280.0), black_box(5000), &hotmap::config::LayoutMetrics::default()))
    });
}

criterion_group!(benches, bench_full_layout, bench_relayout, bench_csv, bench_text);
criterion_main!(benches);
