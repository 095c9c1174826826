//! Benchmark for log parsing and the full engine pass
//! Run: cargo bench -p skiplog-core --bench engine

use chrono::{NaiveDate, TimeDelta};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use skiplog_core::format::format_line;
use skiplog_core::{LogEngine, LogFilter, LogLevel, LogParser};
use std::hint::black_box;

const TRACKER_LINE: &str = "[10:17:20 AM.789] [WARNING] Rate limit exceeded, waiting for 10 seconds";
const PLAIN_LINE: &str = "Traceback (most recent call last): File \"playback.py\", line 42, in monitor";

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

// a log with two runs, most lines repeated like a polling loop would
fn sample_log(size: usize) -> Vec<String> {
    let start = day().and_hms_opt(8, 0, 0).unwrap();
    let levels = [LogLevel::Debug, LogLevel::Info, LogLevel::Info, LogLevel::Warning, LogLevel::Error];
    (0..size)
        .map(|i| {
            let mut at = start + TimeDelta::seconds(i as i64);
            if i > size / 2 {
                at += TimeDelta::hours(2);
            }
            let level = levels[i % levels.len()];
            format_line(&at, level, &format!("Polling playback state (track {})", i % 17))
        })
        .collect()
}

fn bench_parser(c: &mut Criterion) {
    let parser = LogParser::for_date(day());
    let mut group = c.benchmark_group("parser");

    group.bench_function("tracker_line", |b| b.iter(|| parser.parse(black_box(TRACKER_LINE))));
    group.bench_function("plain_line", |b| b.iter(|| parser.parse(black_box(PLAIN_LINE))));

    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let engine = LogEngine::new().with_date(day());
    let filter = LogFilter::new(LogLevel::Info, "playback");

    let mut group = c.benchmark_group("engine");

    for size in [100, 500, 5000] {
        let lines = sample_log(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("filtered_lines", size), &lines, |b, lines| {
            b.iter(|| engine.filtered_lines(black_box(lines), &filter))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parser, bench_engine);
criterion_main!(benches);
