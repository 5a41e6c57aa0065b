use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::BTreeMap;

use knob::{
    Configuration, Context, LogLevel, Logger, MapEnvironment, OptionSpec, Value, ValueKind,
};

fn options(count: usize) -> Vec<OptionSpec> {
    (0..count)
        .map(|i| {
            OptionSpec::builder(format!("option_{i}"))
                .env_name(format!("OPTION_{i}"))
                .default_value(format!("default_{i}"))
                .verify(|v| match v.as_str() {
                    Some(s) if !s.is_empty() => Ok(()),
                    _ => Err("must not be empty".into()),
                })
                .build()
                .unwrap()
        })
        .collect()
}

fn context() -> Context {
    let env = (0..50).step_by(2).fold(MapEnvironment::new(), |env, i| {
        env.with(format!("OPTION_{i}"), format!("env_{i}"))
    });
    Context::new(Logger::new(LogLevel::Quiet), true).with_environment(env)
}

fn configuration(count: usize) -> Configuration {
    Configuration::new(options(count), BTreeMap::new(), context()).unwrap()
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for count in [10, 50, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || (options(count), context()),
                |(opts, ctx)| Configuration::new(black_box(opts), BTreeMap::new(), ctx),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_fetch(c: &mut Criterion) {
    let mut group = c.benchmark_group("fetch");
    let mut config = configuration(50);
    config.set("option_1", "stored").unwrap();

    // Stored value
    group.bench_function("stored", |b| {
        b.iter(|| config.fetch(black_box("option_1"), true));
    });

    // Environment fallback, validated on every fetch
    group.bench_function("environment", |b| {
        b.iter(|| config.fetch(black_box("option_2"), true));
    });

    // Default fallback
    group.bench_function("default", |b| {
        b.iter(|| config.fetch(black_box("option_3"), true));
    });

    group.finish();
}

fn bench_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("values");

    group.bench_function("cold", |b| {
        b.iter_batched(
            || configuration(50),
            |mut config| config.values(true),
            criterion::BatchSize::SmallInput,
        );
    });

    let mut warm = configuration(50);
    warm.values(true).unwrap();
    group.bench_function("cached", |b| {
        b.iter(|| warm.values(true));
    });

    group.finish();
}

fn bench_coercion(c: &mut Criterion) {
    let mut group = c.benchmark_group("coercion");

    group.bench_function("boolean", |b| {
        b.iter(|| ValueKind::Boolean.coerce(black_box(Value::from("yes"))));
    });

    group.bench_function("array", |b| {
        b.iter(|| ValueKind::Array.coerce(black_box(Value::from("App, Tests, UITests"))));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_fetch,
    bench_values,
    bench_coercion
);
criterion_main!(benches);
