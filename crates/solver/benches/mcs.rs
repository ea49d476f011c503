use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mcs::{max_common_subgraph, McsConfig};
use mcs_graph::{Graph, GraphBuilder};
use nanorand::{Rng, WyRand};

fn random_graph(node_count: usize, edge_permille: u64, seed: u64) -> Graph {
    let mut rng = WyRand::new_seed(seed);
    let mut builder = GraphBuilder::new(node_count);
    for v in 0..node_count {
        for w in v + 1..node_count {
            if rng.generate_range(0..1000u64) < edge_permille {
                builder = builder.edge(v, w);
            }
        }
    }
    builder.build().unwrap()
}

fn bench_mcs(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_common_subgraph");

    for node_count in [8, 10, 12] {
        let g0 = random_graph(node_count, 300, 42);
        let g1 = random_graph(node_count, 300, 1337);

        group.bench_with_input(
            BenchmarkId::from_parameter(node_count),
            &node_count,
            |b, _| {
                b.iter(|| {
                    max_common_subgraph(
                        &g0,
                        &g1,
                        McsConfig {
                            threads: 1,
                            ..McsConfig::default()
                        },
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_mcs);
criterion_main!(benches);
