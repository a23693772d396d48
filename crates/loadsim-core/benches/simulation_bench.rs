use criterion::{black_box, criterion_group, criterion_main, Criterion};
use loadsim_core::config::SimConfig;
use loadsim_policies::WeightedRandom;

fn bench_config(num_requests: u64) -> SimConfig {
    SimConfig::from_str(&format!(
        r#"
[simulation]
name = "bench"
seed = 42
num_requests = {num_requests}

[workload]
mean_interarrival = 1.0
mean_service = 3.0
snapshot_interval = 1.0

[[servers]]
id = "s1"
weight = 5

[[servers]]
id = "s2"
weight = 3

[[servers]]
id = "s3"
weight = 2
"#
    ))
    .unwrap()
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");

    for num_requests in [1_000u64, 10_000, 100_000] {
        group.bench_function(format!("weighted_{}_requests", num_requests), |b| {
            let config = bench_config(num_requests);
            b.iter(|| {
                let outcome =
                    loadsim_core::run_simulation(&config, Box::new(WeightedRandom::new()));
                black_box(outcome.report.final_time)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_simulation);
criterion_main!(benches);
