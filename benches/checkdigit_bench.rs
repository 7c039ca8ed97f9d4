//! Performance benchmarks for check digit validation.
//!
//! The camera path validates at most one code per accepted scan, but
//! collaborators may re-validate whole import batches, so the per-code cost
//! should stay in the tens of nanoseconds.
//!
//! # Run Benchmarks
//!
//! ```sh
//! cargo bench --bench checkdigit_bench
//! cargo bench --bench checkdigit_bench -- auto_detect
//! ```

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use stockscan_symbology::{validate, validate_auto_detect};

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    let cases = [
        ("UPC_A", "036000291452"),
        ("EAN_13", "5901234123457"),
        ("UPC_E", "04252614"),
        ("ISBN_10", "155860832X"),
        ("QR_CODE", "https://example.com/item/42"),
    ];

    for (format, code) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(format), &code, |b, code| {
            b.iter(|| validate(black_box(code), black_box(format)))
        });
    }

    group.finish();
}

fn bench_auto_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("auto_detect");

    let cases = [
        ("isbn_13", "9780306406157"),
        ("upc_a", "036000291452"),
        ("eight_digit_upc_e", "04252614"),
        ("unknown", "WH-A12-BIN-07"),
    ];

    for (name, code) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &code, |b, code| {
            b.iter(|| validate_auto_detect(black_box(code)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_validate, bench_auto_detect);
criterion_main!(benches);
