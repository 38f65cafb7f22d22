use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use whichhunt::{PatternCache, SearchOptionsBuilder, Strategy, WhichHunt};

fn bench_fixed_name(c: &mut Criterion) {
    let options = SearchOptionsBuilder::new().max_depth(4).build();
    let roots = vec!["."];

    c.bench_function("fixed_name", |b| {
        b.iter(|| {
            let result = WhichHunt::search_fixed(black_box("lib.rs"), black_box(&roots), &options);
            black_box(result.unwrap())
        })
    });
}

fn bench_glob(c: &mut Criterion) {
    let options = SearchOptionsBuilder::new().max_depth(4).build();
    let roots = vec!["."];

    c.bench_function("glob", |b| {
        b.iter(|| {
            let result = WhichHunt::search_glob(black_box("*.rs"), black_box(&roots), &options);
            black_box(result.unwrap())
        })
    });
}

fn bench_regex_cached(c: &mut Criterion) {
    let options = SearchOptionsBuilder::new()
        .max_depth(4)
        .ignore_case(true)
        .build();
    let roots = vec!["."];

    c.bench_function("regex_cached", |b| {
        b.iter(|| {
            let result =
                WhichHunt::search_regexp(black_box(r"^[a-z_]+\.(rs|toml)$"), black_box(&roots), &options);
            black_box(result.unwrap())
        })
    });
}

fn bench_regex_cold(c: &mut Criterion) {
    let roots = vec!["."];

    c.bench_function("regex_cold", |b| {
        b.iter(|| {
            let options = SearchOptionsBuilder::new()
                .max_depth(4)
                .strategy(Strategy::Regexp)
                .cache(Arc::new(PatternCache::new()))
                .build();
            let result = WhichHunt::search(black_box(r"^[a-z_]+\.(rs|toml)$"), black_box(&roots), &options);
            black_box(result.unwrap())
        })
    });
}

fn bench_following_links(c: &mut Criterion) {
    let options = SearchOptionsBuilder::new()
        .max_depth(4)
        .follow_symlinks(true)
        .max_follow(-1)
        .strategy(Strategy::Glob)
        .build();
    let roots = vec!["src", "tests", "benches"];

    c.bench_function("following_links", |b| {
        b.iter(|| {
            let result = WhichHunt::search(black_box("*.rs"), black_box(&roots), &options);
            black_box(result.unwrap())
        })
    });
}

#[cfg(feature = "async")]
fn bench_async_search(c: &mut Criterion) {
    use tokio::runtime::Runtime;

    let options = SearchOptionsBuilder::new()
        .max_depth(4)
        .strategy(Strategy::Glob)
        .build();
    let roots = vec!["."];
    let rt = Runtime::new().unwrap();

    c.bench_function("async_search", |b| {
        b.iter(|| {
            rt.block_on(async {
                let found = whichhunt::async_search::search(black_box("*.toml"), &roots, &options)
                    .await
                    .unwrap();
                black_box(found.paths.len())
            })
        })
    });
}

#[cfg(not(feature = "async"))]
criterion_group!(
    benches,
    bench_fixed_name,
    bench_glob,
    bench_regex_cached,
    bench_regex_cold,
    bench_following_links
);

#[cfg(feature = "async")]
criterion_group!(
    benches,
    bench_fixed_name,
    bench_glob,
    bench_regex_cached,
    bench_regex_cold,
    bench_following_links,
    bench_async_search
);

criterion_main!(benches);
