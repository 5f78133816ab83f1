use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wine_rating_engine::cache::{ScoreCache, SqliteCache};

async fn setup_cache() -> SqliteCache {
    let cache = SqliteCache::new(":memory:").await.unwrap();

    // Populate with test data
    for i in 0..100 {
        let matched = format!("Wine {}", i);
        cache
            .save(&format!("wine {}", i), "3.8", Some(matched.as_str()))
            .await
            .unwrap();
    }

    cache
}

fn bench_cache_get(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let cache = runtime.block_on(setup_cache());

    c.bench_function("cache_get_hit", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(cache.get("wine 50").await.unwrap())
        });
    });

    c.bench_function("cache_get_miss", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(cache.get("nonexistent").await.unwrap())
        });
    });
}

fn bench_cache_save(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("cache_save", |b| {
        b.to_async(&runtime).iter(|| async {
            let cache = SqliteCache::new(":memory:").await.unwrap();
            black_box(cache.save("Château Margaux 2015", "4.2", None).await.unwrap())
        });
    });
}

fn bench_cache_increment(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let cache = runtime.block_on(setup_cache());

    c.bench_function("cache_increment_hit", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(cache.increment_hit("wine 50").await.unwrap())
        });
    });
}

criterion_group!(benches, bench_cache_get, bench_cache_save, bench_cache_increment);
criterion_main!(benches);
