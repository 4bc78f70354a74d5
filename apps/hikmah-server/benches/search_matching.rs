//! Search Matching Benchmarks
//!
//! The matcher rescans every chapter of a language on each query, so cost
//! grows with corpus size.
//!
//! Run with: `cargo bench --bench search_matching`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use hikmah_server::content::{Chapter, Language};
use hikmah_server::search::SearchMatcher;

const PARAGRAPHS: &[&str] = &[
    "Healthcare in Islam is not merely a physical endeavor but a holistic approach. It encompasses the spiritual, mental, and physical well-being of the individual.",
    "The Quran states that whoever saves a life, it is as though he has saved all of mankind. This verse encapsulates the sacred duty of preserving life!",
    "The balance between divine guidance and human choice forms the cornerstone of ethical practice. Is autonomy a gift or a trust?",
    "True healing encompasses not just the body, but the purification of the soul and the alignment of one's will with divine wisdom.",
];

/// `count` English chapters of eight paragraphs each
fn build_corpus(count: u32) -> Vec<Chapter> {
    (1..=count)
        .map(|id| Chapter {
            id,
            title: if id % 10 == 0 {
                format!("Healing and Mercy, Part {}", id)
            } else {
                format!("Chapter {}", id)
            },
            content: PARAGRAPHS
                .iter()
                .cycle()
                .take(8)
                .copied()
                .collect::<Vec<_>>()
                .join("\n\n"),
            language: Language::English,
        })
        .collect()
}

/// Phrase path: every chapter has sentence matches
fn bench_phrase_search(c: &mut Criterion) {
    let matcher = SearchMatcher::default();

    let mut group = c.benchmark_group("phrase_search");
    group.measurement_time(Duration::from_secs(10));

    for count in [10u32, 100, 500] {
        let corpus = build_corpus(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &corpus, |b, corpus| {
            b.iter(|| {
                let results = matcher.search(black_box("divine"), Language::English, corpus);
                black_box(results)
            })
        });
    }

    group.finish();
}

/// Word fallback path: the phrase never occurs, individual words do
fn bench_word_fallback(c: &mut Criterion) {
    let matcher = SearchMatcher::default();
    let corpus = build_corpus(100);

    let mut group = c.benchmark_group("word_fallback");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("three_words_100_chapters", |b| {
        b.iter(|| {
            let results = matcher.search(
                black_box("soul mercy autonomy"),
                Language::English,
                &corpus,
            );
            black_box(results)
        })
    });

    group.bench_function("no_match_100_chapters", |b| {
        b.iter(|| {
            let results = matcher.search(black_box("zzzz qqqq"), Language::English, &corpus);
            black_box(results)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_phrase_search, bench_word_fallback);
criterion_main!(benches);
