use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use latexpad_engine::editing::{Document, Position};
mod common;

fn bench_anchor_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchors");
    group.sample_size(10);

    let content = common::generate_structured_latex(20, 4);

    group.bench_function("create_anchors", |b| {
        b.iter_batched(
            || Document::new(&content),
            |mut doc| {
                let anchors: Vec<_> = (0..doc.len()).map(|row| doc.create_anchor(row, 3)).collect();
                std::hint::black_box((doc, anchors))
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("rebase_on_line_split", |b| {
        b.iter_batched(
            || {
                let mut doc = Document::new(&content);
                let anchors: Vec<_> = (0..doc.len()).map(|row| doc.create_anchor(row, 3)).collect();
                (doc, anchors)
            },
            |(mut doc, anchors)| {
                for _ in 0..10 {
                    doc.insert(Position::new(0, 5), "\n");
                }
                std::hint::black_box(anchors)
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_anchor_operations);
criterion_main!(benches);
