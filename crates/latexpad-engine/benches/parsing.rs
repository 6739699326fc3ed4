use criterion::{Criterion, criterion_group, criterion_main};
use latexpad_syntax::parse;
mod common;

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let small = common::generate_latex_content(10);
    let large = common::generate_large_document();

    group.bench_function("parse_small", |b| {
        b.iter(|| parse(std::hint::black_box(&small)));
    });

    group.bench_function("parse_large", |b| {
        b.iter(|| parse(std::hint::black_box(&large)));
    });

    let mut broken = large.clone();
    broken.push_str("\\cmd{unterminated");
    group.bench_function("parse_error_at_end", |b| {
        b.iter(|| parse(std::hint::black_box(&broken)));
    });

    group.finish();
}

criterion_group!(benches, bench_parsing);
criterion_main!(benches);
