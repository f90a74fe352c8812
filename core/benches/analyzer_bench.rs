use criterion::{criterion_group, criterion_main, Criterion};
use sift_core::{Analyzer, Corpus, Document, ShardedIndex};

const WORDS: &[&str] = &[
    "wild", "cat", "felines", "hunting", "small", "mammal", "forest", "running", "species", "native",
    "domestic", "prey", "night", "europe", "africa", "asia", "the", "and", "of", "in",
];

fn synthetic_text(seed: usize, len: usize) -> String {
    (0..len)
        .map(|i| WORDS[(seed * 31 + i * 17) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_analyze(c: &mut Criterion) {
    let analyzer = Analyzer::default();
    let text = synthetic_text(7, 2_000);
    c.bench_function("analyze_2k_words", |b| b.iter(|| analyzer.analyze(&text)));
}

fn bench_search(c: &mut Criterion) {
    let corpus: Corpus = (0..10_000u32)
        .map(|id| Document::new(id, synthetic_text(id as usize, 40)))
        .collect();
    let index = ShardedIndex::new(8).expect("index");
    index.add(corpus.documents());
    c.bench_function("search_small_wild_cat", |b| {
        b.iter(|| index.search("Small wild cat", 10, &corpus))
    });
}

criterion_group!(benches, bench_analyze, bench_search);
criterion_main!(benches);
