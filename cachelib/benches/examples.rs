use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use cachelib::config::{CacheConfig, MalformedLinePolicy, ReplacementPolicyConfig};
use cachelib::simulator::Simulator;
use cachelib::trace::{read_trace, Access};

/// A strided walk with some reuse, rendered in the trace format so parsing is measured too
fn synthetic_trace(accesses: usize) -> String {
    let mut out = String::with_capacity(accesses * 16);
    let mut address: u64 = 0x7fff_0000;
    for i in 0..accesses {
        let access = if i % 3 == 0 { Access::write(address) } else { Access::read(address) };
        out.push_str(&access.to_string());
        out.push('\n');
        address = if i % 7 == 0 { address.wrapping_sub(0x400) } else { address.wrapping_add(0x48) };
    }
    out
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let trace_text = synthetic_trace(100_000);
    let trace = read_trace(trace_text.as_bytes(), MalformedLinePolicy::Error).unwrap();

    let mut parse = c.benchmark_group("Parsing");
    parse.bench_function("read_trace", |bench| {
        bench.iter(|| read_trace(trace_text.as_bytes(), MalformedLinePolicy::Error).unwrap());
    });
    parse.finish();

    let mut group = c.benchmark_group("Simulation");
    for policy in [ReplacementPolicyConfig::Fifo, ReplacementPolicyConfig::Lru] {
        for prefetch in [false, true] {
            let config = CacheConfig {
                memory_size: 32 * 1024,
                block_size: 64,
                associativity: 8,
                prefetch,
                replacement_policy: policy,
                ..CacheConfig::default()
            };
            let id = BenchmarkId::new(format!("{policy:?}"), if prefetch { "prefetch" } else { "no prefetch" });
            group.bench_with_input(id, &(config, &trace), |bench, (conf, trace)| {
                bench.iter(|| {
                    Simulator::new(conf).unwrap().simulate(trace.iter().copied()).hits
                });
            });
        }
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default().significance_level(0.1).sample_size(10);
    targets = criterion_benchmark
);
criterion_main!(benches);
