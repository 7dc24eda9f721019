//! Benchmarks for registration and extraction throughput.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use trackalloc::{suppress_events, Encoding, ResourceRegistry};

fn bench_register_release(c: &mut Criterion) {
    suppress_events(true);
    let registry = ResourceRegistry::with_defaults();
    let payload = vec![0xA5u8; 256];

    c.bench_function("register_release_256b", |b| {
        b.iter(|| {
            let handle = registry.register(black_box(&payload)).unwrap();
            registry.release(handle);
        })
    });
}

fn bench_resize_cycle(c: &mut Criterion) {
    suppress_events(true);
    let registry = ResourceRegistry::with_defaults();

    c.bench_function("resize_grow_shrink", |b| {
        b.iter(|| {
            let handle = registry.register(black_box(&[1u8; 64])).unwrap();
            let handle = registry.resize(handle, 256).unwrap();
            let handle = registry.resize(handle, 32).unwrap();
            registry.release(handle);
        })
    });
}

fn bench_substring_utf8(c: &mut Criterion) {
    suppress_events(true);
    let registry = ResourceRegistry::with_defaults();
    let text = "안녕하세요 세상! Hello World! ".repeat(32);

    c.bench_function("substring_utf8", |b| {
        b.iter(|| {
            let handle = registry
                .substring(black_box(text.as_bytes()), 12, 40, Encoding::Utf8)
                .unwrap();
            registry.release(handle);
        })
    });
}

criterion_group!(
    benches,
    bench_register_release,
    bench_resize_cycle,
    bench_substring_utf8
);
criterion_main!(benches);
