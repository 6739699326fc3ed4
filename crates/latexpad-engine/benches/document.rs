use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use latexpad_engine::editing::{Document, Position, Range};
mod common;

fn bench_document_editing(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");
    group.sample_size(10);

    let content = common::generate_large_document();

    group.bench_function("load", |b| {
        b.iter(|| Document::new(std::hint::black_box(&content)));
    });

    group.bench_function("typing_burst", |b| {
        b.iter_batched(
            || Document::new(&content),
            |mut doc| {
                let row = doc.len() / 2;
                for (column, ch) in "typed \\emph{word}".chars().enumerate() {
                    doc.insert(Position::new(row, column), &ch.to_string());
                }
                std::hint::black_box(doc)
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("multi_line_remove", |b| {
        b.iter_batched(
            || Document::new(&content),
            |mut doc| {
                let last = doc.len() - 1;
                doc.remove(Range::new(1, 3, last - 1, 2));
                std::hint::black_box(doc)
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("value", |b| {
        let doc = Document::new(&content);
        b.iter(|| std::hint::black_box(doc.value()));
    });

    group.finish();
}

criterion_group!(benches, bench_document_editing);
criterion_main!(benches);
