// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # recshape - runtime record introspection
//!
//! Lets a generic serialization layer read and reconstruct instances of
//! immutable, fixed-shape record-like types without compile-time knowledge
//! of their shape: discover an ordered name/type schema, read component
//! values out of an instance, and rebuild an instance through the type's
//! canonical all-components constructor.
//!
//! ## Quick Start
//!
//! ```rust
//! use recshape::{RecordShape, RecordIntrospector, TypeTag};
//! use std::any::Any;
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! fn main() -> recshape::Result<()> {
//!     // Install the process runtime and contribute a shape (startup, once).
//!     let registry = recshape::runtime::init();
//!     registry.register(
//!         RecordShape::builder::<Point>()
//!             .component("x", |p: &Point| p.x)
//!             .component("y", |p: &Point| p.y)
//!             .construct(|args| Ok(Point { x: args.take()?, y: args.take()? })),
//!     );
//!
//!     // Discover the schema, read an instance, rebuild another.
//!     let schema = recshape::components(TypeTag::of::<Point>())?;
//!     let origin = Point { x: 3, y: 4 };
//!     let x = recshape::component_value(&origin, &schema[0])?;
//!     assert_eq!(*x.downcast::<i32>().unwrap(), 3);
//!
//!     let rebuilt: Point = RecordIntrospector::global().construct_as(
//!         TypeTag::of::<Point>(),
//!         &schema,
//!         vec![Box::new(3i32) as Box<dyn Any>, Box::new(4i32) as Box<dyn Any>],
//!     )?;
//!     assert_eq!(rebuilt, origin);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                 Serialization layer (caller)                 |
//! +--------------------------------------------------------------+
//! |  RecordIntrospector  - facade, capability-gated dispatch     |
//! +--------------------------------------------------------------+
//! |  CapabilityProbe     - one-time backend selection            |
//! |  DispatchBackend     |  LookupBackend                        |
//! |  (pre-resolved       |  (per-call metadata                   |
//! |   dispatch tables)   |   lookup)                             |
//! +--------------------------------------------------------------+
//! |  RecordRuntime hooks - ShapeRegistry, registered shapes      |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RecordIntrospector`] | Entry point; also reachable via the crate-level free functions |
//! | [`ComponentDescriptor`] | Name, declared type, and canonical-constructor index of one component |
//! | [`TypeTag`] | Runtime identity of a type (`TypeId` plus rendered name) |
//! | [`RecordShape`] | Registered metadata of one record-like type |
//! | [`ShapeRegistry`] | Concurrent shape store; the standard [`RecordRuntime`] |
//!
//! ## Capability model
//!
//! The host installs a [`RecordRuntime`] once at startup
//! ([`runtime::init`] for the standard registry). The first introspection
//! call probes the process exactly once and memoizes the outcome: with no
//! runtime installed, `is_record_type` is `false` for every type and all
//! other operations fail with [`IntrospectError::Unsupported`] - permanently,
//! even if a runtime shows up later. Which of the two invocation backends
//! serves a supported process is an implementation-selection detail; both
//! produce identical observable results.

mod backend;
mod component;
mod error;
mod introspect;
mod probe;
/// Process-wide record runtime: installation and the standard registry.
pub mod runtime;
mod shape;


pub use component::{ComponentDescriptor, TypeTag};
pub use error::{IntrospectError, Result};
pub use introspect::{
    component_value, components, components_ordered_by, construct, is_record_type,
    RecordIntrospector,
};
pub use probe::BackendKind;
pub use runtime::{RecordRuntime, ShapeRegistry};
pub use shape::{ArgList, RecordShape, ShapeBuilder};
