use std::{convert::Infallible, hint::black_box};

use async_trait::async_trait;
use batchfetch_lib::{Fetcher, Outcome, Requests, Status, Template, Transport, reorder};
use criterion::{Criterion, criterion_group, criterion_main};
use url::Url;

const BATCH_SIZE: usize = 10_000;

/// Answers instantly, so only the scheduling overhead is measured
struct Immediate;

#[async_trait]
impl Transport for Immediate {
    type Response = usize;
    type Error = Infallible;

    async fn fetch(&self, target: &Url) -> Result<usize, Infallible> {
        Ok(target.as_str().len())
    }
}

fn requests() -> Requests {
    let template = Template::default();
    Requests::from_identifiers((0..BATCH_SIZE).map(|i| format!("AS{i}")), &template).unwrap()
}

fn shuffled_outcomes() -> Vec<Outcome<(), Infallible>> {
    let mut outcomes: Vec<_> = requests()
        .into_iter()
        .map(|r| Outcome::new(r.position, r.label, Status::Success(())))
        .collect();
    // Deterministic interleaving of the two halves
    let back = outcomes.split_off(BATCH_SIZE / 2);
    outcomes
        .into_iter()
        .zip(back.into_iter().rev())
        .flat_map(|(a, b)| [b, a])
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("reorder shuffled batch", |b| {
        b.iter_batched(
            shuffled_outcomes,
            |outcomes| reorder(black_box(outcomes), BATCH_SIZE).unwrap(),
            criterion::BatchSize::LargeInput,
        );
    });

    let runtime = tokio::runtime::Runtime::new().unwrap();
    for max_concurrency in [1, 16, 256] {
        let fetcher = Fetcher::new(Immediate, max_concurrency).unwrap();
        c.bench_function(&format!("fetch_all with {max_concurrency} slots"), |b| {
            b.iter_batched(
                requests,
                |requests| runtime.block_on(fetcher.fetch_all(black_box(requests))).unwrap(),
                criterion::BatchSize::LargeInput,
            );
        });
    }
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = criterion_benchmark
);
criterion_main!(benches);
