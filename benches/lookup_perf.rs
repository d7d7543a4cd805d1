use coverage_lookup::CoverageReport;
use criterion::{Criterion, criterion_group, criterion_main};

fn synthetic_report(records: usize) -> String {
    let entries: Vec<serde_json::Value> = (0..records)
        .map(|i| serde_json::json!({ "name": format!("module_{i}"), "lineCoverage": i as f64 / 10.0 }))
        .collect();
    serde_json::Value::Array(entries).to_string()
}

fn bench_lookup(c: &mut Criterion) {
    let input = synthetic_report(10_000);

    c.bench_function("parse_report_10k", |b| {
        b.iter(|| CoverageReport::parse(&input).unwrap())
    });

    let report = CoverageReport::parse(&input).unwrap();
    c.bench_function("lookup_last_of_10k", |b| {
        b.iter(|| report.lookup("module_9999").unwrap().clone())
    });
}

criterion_group!(benches, bench_lookup);
criterion_main!(benches);
