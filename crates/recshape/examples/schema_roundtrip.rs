// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Minimal serialization-layer flow: discover a schema, read every component
//! out of an instance, rebuild a new instance from the values.
//!
//! Run with: cargo run --example schema_roundtrip

use recshape::{RecordIntrospector, RecordShape, TypeTag};
use std::any::Any;

#[derive(Debug, Clone, PartialEq)]
struct Waypoint {
    id: u32,
    lat: f64,
    lon: f64,
    name: String,
}

fn main() -> recshape::Result<()> {
    let registry = recshape::runtime::init();
    registry.register(
        RecordShape::builder::<Waypoint>()
            .component("id", |w: &Waypoint| w.id)
            .component("lat", |w: &Waypoint| w.lat)
            .component("lon", |w: &Waypoint| w.lon)
            .component("name", |w: &Waypoint| w.name.clone())
            .construct(|args| {
                Ok(Waypoint {
                    id: args.take()?,
                    lat: args.take()?,
                    lon: args.take()?,
                    name: args.take()?,
                })
            }),
    );

    let tag = TypeTag::of::<Waypoint>();
    let schema = recshape::components(tag)?;
    println!("schema of {}:", tag);
    for descriptor in &schema {
        println!(
            "  [{}] {}: {}",
            descriptor.index(),
            descriptor.name(),
            descriptor.ty()
        );
    }

    let original = Waypoint {
        id: 17,
        lat: 59.3293,
        lon: 18.0686,
        name: "stockholm".to_string(),
    };

    // "Serialize": one erased value per component, in schema order.
    let values: Vec<Box<dyn Any>> = schema
        .iter()
        .map(|descriptor| recshape::component_value(&original, descriptor))
        .collect::<recshape::Result<_>>()?;

    // "Deserialize": rebuild through the canonical constructor.
    let rebuilt: Waypoint = RecordIntrospector::global().construct_as(tag, &schema, values)?;
    println!("rebuilt: {:?}", rebuilt);
    assert_eq!(rebuilt, original);
    Ok(())
}
