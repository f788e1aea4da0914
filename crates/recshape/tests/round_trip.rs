// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Round-trip properties exercised through the process-global introspector
//! and the crate-level free functions, the way a serialization layer uses
//! them.

use recshape::{ComponentDescriptor, IntrospectError, RecordShape, TypeTag};
use std::any::Any;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, PartialEq)]
struct Telemetry {
    source: u16,
    voltage: f64,
    fault: bool,
}

struct Plain;

fn setup() {
    static SETUP: OnceLock<()> = OnceLock::new();
    SETUP.get_or_init(|| {
        let registry = recshape::runtime::init();
        registry.register(
            RecordShape::builder::<Point>()
                .component("x", |p: &Point| p.x)
                .component("y", |p: &Point| p.y)
                .construct(|args| {
                    Ok(Point {
                        x: args.take()?,
                        y: args.take()?,
                    })
                }),
        );
        registry.register(
            RecordShape::builder::<Telemetry>()
                .component("source", |t: &Telemetry| t.source)
                .component("voltage", |t: &Telemetry| t.voltage)
                .component("fault", |t: &Telemetry| t.fault)
                .construct(|args| {
                    Ok(Telemetry {
                        source: args.take()?,
                        voltage: args.take()?,
                        fault: args.take()?,
                    })
                }),
        );
    });
}

fn erased(values: Vec<Box<dyn Any>>) -> Vec<Box<dyn Any>> {
    values
}

#[test]
fn discovery_reports_canonical_schema() {
    setup();
    let schema = recshape::components(TypeTag::of::<Point>()).expect("components");
    assert_eq!(
        schema,
        vec![
            ComponentDescriptor::new("x", TypeTag::of::<i32>(), 0),
            ComponentDescriptor::new("y", TypeTag::of::<i32>(), 1),
        ]
    );
}

#[test]
fn serialize_then_deserialize() {
    setup();
    let tag = TypeTag::of::<Telemetry>();
    let original = Telemetry {
        source: 7,
        voltage: 11.8,
        fault: true,
    };

    // Serialize: one erased value per descriptor, in schema order.
    let schema = recshape::components(tag).expect("components");
    let values: Vec<Box<dyn Any>> = schema
        .iter()
        .map(|descriptor| recshape::component_value(&original, descriptor).expect("read"))
        .collect();

    // Deserialize: rebuild through the canonical constructor.
    let rebuilt = recshape::construct(tag, &schema, values).expect("construct");
    assert_eq!(*rebuilt.downcast::<Telemetry>().expect("telemetry"), original);
}

#[test]
fn reordered_schema_still_round_trips() {
    setup();
    let tag = TypeTag::of::<Point>();
    let reversed = recshape::components_ordered_by(tag, |a, b| b.name().cmp(a.name()))
        .expect("reordered");
    assert_eq!(reversed[0].name(), "y");
    assert_eq!(reversed[0].index(), 1);
    assert_eq!(reversed[1].name(), "x");
    assert_eq!(reversed[1].index(), 0);

    // Args aligned to the reversed sequence; repositioned internally.
    let rebuilt = recshape::construct(
        tag,
        &reversed,
        erased(vec![Box::new(4i32), Box::new(3i32)]),
    )
    .expect("construct");
    assert_eq!(*rebuilt.downcast::<Point>().expect("point"), Point { x: 3, y: 4 });
}

#[test]
fn plain_type_is_rejected() {
    setup();
    let tag = TypeTag::of::<Plain>();
    assert!(!recshape::is_record_type(tag));
    assert!(matches!(
        recshape::components(tag),
        Err(IntrospectError::NotARecord { .. })
    ));
}

#[test]
fn arity_mismatch_is_a_construction_error() {
    setup();
    let tag = TypeTag::of::<Point>();
    let schema = recshape::components(tag).expect("components");
    assert!(matches!(
        recshape::construct(tag, &schema, erased(vec![Box::new(3i32)])),
        Err(IntrospectError::Construction { .. })
    ));
}

#[test]
fn generated_values_round_trip() {
    setup();
    let tag = TypeTag::of::<Telemetry>();
    let schema = recshape::components(tag).expect("components");
    for _ in 0..64 {
        let original = Telemetry {
            source: fastrand::u16(..),
            voltage: fastrand::f64() * 48.0,
            fault: fastrand::bool(),
        };
        let values: Vec<Box<dyn Any>> = schema
            .iter()
            .map(|descriptor| recshape::component_value(&original, descriptor).expect("read"))
            .collect();
        let rebuilt = recshape::construct(tag, &schema, values).expect("construct");
        assert_eq!(*rebuilt.downcast::<Telemetry>().expect("telemetry"), original);
    }
}

#[cfg(feature = "dispatch-tables")]
#[test]
fn global_process_selects_dispatch_backend() {
    setup();
    // Force the probe, then inspect the selection.
    let _ = recshape::is_record_type(TypeTag::of::<Point>());
    assert_eq!(
        recshape::RecordIntrospector::global().backend_kind(),
        Some(recshape::BackendKind::Dispatch)
    );
}
