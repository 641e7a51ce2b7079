//! Bind, lookup and emit costs over context chains of increasing depth
//!
//! Run with: `cargo bench -p reqtrace-core`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use reqtrace_core::Context;
use reqtrace_core::server::{HandlerDoneInfo, ServerTrace, server_trace};

fn observer() -> ServerTrace {
    ServerTrace::default().on_handler_done(|info| {
        black_box(info);
    })
}

fn chain(depth: usize) -> Context {
    (0..depth).fold(Context::background(), |ctx, _| ctx.with_hooks(&observer()))
}

fn bench_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind");
    for depth in [0, 1, 8, 32] {
        let ctx = chain(depth);
        let trace = observer();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &ctx, |b, ctx| {
            b.iter(|| black_box(ctx.with_hooks(&trace)));
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    for depth in [1, 8, 32] {
        let ctx = chain(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &ctx, |b, ctx| {
            b.iter(|| black_box(server_trace(ctx).is_some()));
        });
    }
    group.finish();
}

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit_handler_done");
    let info = HandlerDoneInfo::default();
    for depth in [1, 8, 32] {
        let ctx = chain(depth);
        let trace = server_trace(&ctx).expect("chain binds a trace").clone();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &trace, |b, trace| {
            b.iter(|| trace.emit_handler_done(black_box(&info)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bind, bench_lookup, bench_emit);
criterion_main!(benches);
