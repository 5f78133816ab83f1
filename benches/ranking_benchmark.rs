use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wine_rating_engine::{
    core::Candidate,
    normalize::{clean, extract_year},
    ranking::{rank, similarity},
};

fn create_test_candidates(count: usize) -> Vec<Candidate> {
    (0..count)
        .map(|i| {
            Candidate::new(
                format!("Domaine Test Cuvée {} {}", i, 2010 + (i % 10)),
                Some(3.0 + (i % 10) as f64 / 10.0),
                (i as u32) * 10,
            )
        })
        .collect()
}

fn bench_similarity(c: &mut Criterion) {
    c.bench_function("similarity_short", |b| {
        b.iter(|| black_box(similarity("Château Margaux 2015", "Château Margaux 2010")));
    });

    c.bench_function("similarity_long", |b| {
        b.iter(|| {
            black_box(similarity(
                "Estandon Vignerons Terres de Saint-Louis Rosé Côtes de Provence",
                "Estandon Terres de Saint-Louis Côtes de Provence Rosé 2022",
            ))
        });
    });
}

fn bench_rank(c: &mut Criterion) {
    let candidates = create_test_candidates(20);

    c.bench_function("rank_lookahead", |b| {
        b.iter(|| black_box(rank("Domaine Test Cuvée 3 2013", Some(2013), &candidates)));
    });
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("clean_name", |b| {
        b.iter(|| black_box(clean("Sauvignon Blanc Bag in Box 12,5% alc 3L")));
    });

    c.bench_function("extract_year", |b| {
        b.iter(|| black_box(extract_year("Château Margaux 2015 75cl")));
    });
}

criterion_group!(benches, bench_similarity, bench_rank, bench_normalize);
criterion_main!(benches);
