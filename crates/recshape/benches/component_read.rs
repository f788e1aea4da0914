// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Component Read Benchmark
//!
//! Measures the per-call cost of the two invocation backends:
//! - dispatch: pre-resolved per-type tables, name resolved via table slot
//! - lookup: name scan over the shape metadata on every call
//!
//! Construction latency is measured alongside since it follows the same
//! resolution paths.

use criterion::{criterion_group, criterion_main, Criterion};
use recshape::runtime::RecordRuntime;
use recshape::{RecordIntrospector, RecordShape, ShapeRegistry, TypeTag};
use std::any::{Any, TypeId};
use std::hint::black_box as bb;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Sample {
    seq: u64,
    value: f64,
    channel: u32,
    label: String,
}

fn sample_shape() -> RecordShape {
    RecordShape::builder::<Sample>()
        .component("seq", |s: &Sample| s.seq)
        .component("value", |s: &Sample| s.value)
        .component("channel", |s: &Sample| s.channel)
        .component("label", |s: &Sample| s.label.clone())
        .construct(|args| {
            Ok(Sample {
                seq: args.take()?,
                value: args.take()?,
                channel: args.take()?,
                label: args.take()?,
            })
        })
}

struct NoTables(ShapeRegistry);

impl RecordRuntime for NoTables {
    fn shape_of(&self, ty: TypeId) -> Option<Arc<RecordShape>> {
        self.0.get(ty)
    }

    fn dispatch_tables(&self) -> bool {
        false
    }
}

fn dispatch_introspector() -> &'static RecordIntrospector {
    let registry = ShapeRegistry::new();
    registry.register(sample_shape());
    let runtime: &'static ShapeRegistry = Box::leak(Box::new(registry));
    Box::leak(Box::new(RecordIntrospector::with_runtime(runtime)))
}

fn lookup_introspector() -> &'static RecordIntrospector {
    let registry = ShapeRegistry::new();
    registry.register(sample_shape());
    let runtime: &'static NoTables = Box::leak(Box::new(NoTables(registry)));
    Box::leak(Box::new(RecordIntrospector::with_runtime(runtime)))
}

fn bench_component_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("component_read");
    let sample = Sample {
        seq: 9001,
        value: 0.25,
        channel: 3,
        label: "bench".to_string(),
    };
    let tag = TypeTag::of::<Sample>();

    for (name, introspector) in [
        ("dispatch", dispatch_introspector()),
        ("lookup", lookup_introspector()),
    ] {
        let schema = introspector.components(tag).expect("components");
        // Last component: worst case for the name scan.
        let descriptor = schema.last().expect("descriptor").clone();
        group.bench_function(name, |b| {
            b.iter(|| {
                introspector
                    .component_value(bb(&sample), bb(&descriptor))
                    .expect("read")
            });
        });
    }
    group.finish();
}

fn bench_construct(c: &mut Criterion) {
    let mut group = c.benchmark_group("construct");
    let tag = TypeTag::of::<Sample>();

    for (name, introspector) in [
        ("dispatch", dispatch_introspector()),
        ("lookup", lookup_introspector()),
    ] {
        let schema = introspector.components(tag).expect("components");
        group.bench_function(name, |b| {
            b.iter(|| {
                let args: Vec<Box<dyn Any>> = vec![
                    Box::new(9001u64),
                    Box::new(0.25f64),
                    Box::new(3u32),
                    Box::new("bench".to_string()),
                ];
                introspector
                    .construct_as::<Sample>(bb(tag), bb(&schema), args)
                    .expect("construct")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_component_read, bench_construct);
criterion_main!(benches);
