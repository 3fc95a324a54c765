//! Benchmarks for configuration loading and entry resolution

use container_config::{
    ArrayConfiguration, Bindings, ClassMetadata, ClassRegistry, Compiler, Configuration, Container,
    ExtensionFn, FactoryContainer, FnFactory, MergedConfiguration, Value,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Map, Value as Json, json};
use std::hint::black_box;
use std::sync::Arc;

fn bindings() -> Arc<Bindings> {
    let classes = ClassRegistry::new()
        .with(ClassMetadata::interface("Listener"))
        .with(ClassMetadata::new("SystemClock", |_| Ok(Value::from("tick"))))
        .with(ClassMetadata::new("OnSave", |_| Ok(Value::from("on save"))).implements("Listener"));

    Arc::new(
        Bindings::new()
            .with_classes(Arc::new(classes))
            .with_factory(FnFactory::new("make_logger", |_| Ok(Value::from("logger"))))
            .with_extension(ExtensionFn::new("add_handlers", |_, logger| Ok(logger))),
    )
}

/// A document with `size` parameters and as many aliases
fn document(size: usize) -> Json {
    let parameters: Map<String, Json> = (0..size)
        .map(|i| (format!("param.{i}"), json!(format!("value {i}"))))
        .collect();
    let aliases: Map<String, Json> = (0..size)
        .map(|i| (format!("alias.{i}"), json!(format!("param.{i}"))))
        .collect();

    json!({
        "parameters": parameters,
        "aliases": aliases,
        "invokables": { "clock": "SystemClock", "OnSave": "OnSave" },
        "factories": { "logger.default": "make_logger" },
        "extensions": { "logger.default": "add_handlers" },
        "tags": { "params": ["param.0", "param.1"] },
        "mappers": { "listeners": "Listener" }
    })
}

fn bench_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("loading");
    let bindings = bindings();

    for size in [10, 100, 1000] {
        let configuration = ArrayConfiguration::new(Arc::clone(&bindings), "bench.json", document(size));

        group.throughput(Throughput::Elements(size as u64 * 2));
        group.bench_with_input(BenchmarkId::new("entry", size), &configuration, |b, configuration| {
            b.iter(|| black_box(configuration.entry().unwrap()))
        });
    }

    group.bench_function("merged_3_sources", |b| {
        let merged = MergedConfiguration::default()
            .with(ArrayConfiguration::new(Arc::clone(&bindings), "a.json", document(50)))
            .with(ArrayConfiguration::new(Arc::clone(&bindings), "b.json", document(50)))
            .with(ArrayConfiguration::new(Arc::clone(&bindings), "c.json", document(50)));

        b.iter(|| black_box(merged.entry().unwrap().factories()))
    });

    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");
    group.throughput(Throughput::Elements(1));

    let entry = ArrayConfiguration::new(bindings(), "bench.json", document(100))
        .entry()
        .unwrap();
    let factories = entry.factories();

    let cached = FactoryContainer::new(factories.clone());
    let _ = cached.get("alias.50");
    group.bench_function("alias_cached", |b| b.iter(|| black_box(cached.get("alias.50"))));

    let transient = FactoryContainer::transient(factories);
    group.bench_function("alias_transient", |b| {
        b.iter(|| black_box(transient.get("alias.50")))
    });
    group.bench_function("tag_transient", |b| b.iter(|| black_box(transient.get("params"))));
    group.bench_function("mapper_transient", |b| {
        b.iter(|| black_box(transient.get("listeners")))
    });

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let factories = ArrayConfiguration::new(
        Arc::new(Bindings::new()),
        "bench.json",
        json!({
            "parameters": { "host": "localhost", "url": "http://%{host}/" },
            "aliases": { "log": "logger.default" },
            "tags": { "all": ["host", "url"] }
        }),
    )
    .entry()
    .unwrap()
    .factories();

    c.bench_function("compile", |b| {
        b.iter(|| black_box(Compiler::new().compile(&factories).unwrap()))
    });
}

criterion_group!(benches, bench_loading, bench_resolution, bench_compile);

criterion_main!(benches);
