//! Criterion micro-benchmarks for gate decisions and the wrapper chain.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use perfix_bench::{aggressive_options, bench_context, quiet_options};
use perfix_core::{CallAttrs, Category, ConfigSnapshot, FnOperation, OptionKey, TickId};
use perfix_engine::{CallSite, EveryNth, ThrottleGate};

fn bench_every_nth(c: &mut Criterion) {
    let p = EveryNth::new(3, 0);
    c.bench_function("every_nth_1k_ticks", |b| {
        b.iter(|| {
            let mut hits = 0u32;
            for t in 0..1_000u64 {
                if p.hits(black_box(TickId(t))) {
                    hits += 1;
                }
            }
            black_box(hits)
        });
    });
}

fn bench_decide(c: &mut Criterion) {
    let quiet = ConfigSnapshot::default().with(OptionKey::ShowProfiler, true);
    let busy = OptionKey::ALL
        .iter()
        .fold(ConfigSnapshot::default(), |s, k| s.with(*k, true));
    let attrs = CallAttrs::default();

    c.bench_function("decide_all_sites_quiet", |b| {
        let mut gate = ThrottleGate::new(2);
        let mut tick = TickId(0);
        b.iter(|| {
            tick = tick.next();
            for site in CallSite::ALL {
                black_box(gate.decide(site, &attrs, &quiet, tick));
            }
        });
    });

    c.bench_function("decide_all_sites_throttled", |b| {
        let mut gate = ThrottleGate::new(2);
        let mut tick = TickId(0);
        b.iter(|| {
            tick = tick.next();
            for site in CallSite::ALL {
                black_box(gate.decide(site, &attrs, &busy, tick));
            }
        });
    });
}

fn bench_invoke(c: &mut Criterion) {
    let src = quiet_options();
    let (mut ctx, _clock) = bench_context(&src);
    ctx.begin_tick(0.004, &src);
    c.bench_function("invoke_timed_run", |b| {
        b.iter(|| black_box(ctx.invoke(CallSite::UpdateCamera, FnOperation::new(|| 1u32))));
    });

    let src = aggressive_options();
    let (mut ctx, _clock) = bench_context(&src);
    ctx.begin_tick(0.004, &src);
    c.bench_function("invoke_disabled_skip", |b| {
        b.iter(|| black_box(ctx.invoke(CallSite::ParticleUpdate, FnOperation::new(|| 1u32))));
    });

    let (mut ctx, _clock) = bench_context(&quiet_options());
    c.bench_function("scoped_timer", |b| {
        b.iter(|| {
            let _t = ctx.scoped(Category::Audio);
        });
    });
}

criterion_group!(benches, bench_every_nth, bench_decide, bench_invoke);
criterion_main!(benches);
