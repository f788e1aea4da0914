// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide record runtime: the hook through which shapes are resolved.
//!
//! A process that never installs a runtime has no record feature at all; the
//! capability probe then reports every type as non-record. The common setup
//! is one [`init`] call at startup followed by shape registrations:
//!
//! ```rust
//! let registry = recshape::runtime::init();
//! // registry.register(...);
//! ```

use crate::shape::RecordShape;
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::{Arc, OnceLock};

static INSTALLED: OnceLock<&'static dyn RecordRuntime> = OnceLock::new();

/// Source of record metadata for one process.
///
/// Implemented by [`ShapeRegistry`]; embedders with their own metadata store
/// can implement it directly and [`install`] that instead.
pub trait RecordRuntime: Send + Sync {
    /// Resolve the shape registered for `ty`, if any.
    fn shape_of(&self, ty: TypeId) -> Option<Arc<RecordShape>>;

    /// Whether per-type dispatch tables may be pre-resolved from this
    /// runtime's shapes. Runtimes answering `false` are served through the
    /// per-call metadata-lookup backend.
    fn dispatch_tables(&self) -> bool {
        true
    }
}

/// Concurrent shape registry; the standard [`RecordRuntime`] implementation.
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: DashMap<TypeId, Arc<RecordShape>>,
}

impl ShapeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-global registry instance.
    pub fn global() -> &'static ShapeRegistry {
        static REGISTRY: OnceLock<ShapeRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ShapeRegistry::new)
    }

    /// Register a shape under its own type. Returns the displaced shape when
    /// one was already registered for that type (last registration wins).
    pub fn register(&self, shape: RecordShape) -> Option<Arc<RecordShape>> {
        let tag = shape.tag();
        let arity = shape.arity();
        let displaced = self.shapes.insert(tag.id(), Arc::new(shape));
        if displaced.is_some() {
            log::warn!(
                "[ShapeRegistry] replaced shape for {} ({} components)",
                tag.name(),
                arity
            );
        } else {
            log::debug!(
                "[ShapeRegistry] registered shape for {} ({} components)",
                tag.name(),
                arity
            );
        }
        displaced
    }

    /// Look up the shape registered for `ty`.
    pub fn get(&self, ty: TypeId) -> Option<Arc<RecordShape>> {
        self.shapes.get(&ty).map(|entry| Arc::clone(&entry))
    }

    /// Whether a shape is registered for `ty`.
    #[must_use]
    pub fn contains(&self, ty: TypeId) -> bool {
        self.shapes.contains_key(&ty)
    }

    /// Number of registered shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if no shapes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl RecordRuntime for ShapeRegistry {
    fn shape_of(&self, ty: TypeId) -> Option<Arc<RecordShape>> {
        self.get(ty)
    }
}

/// Install the process record runtime. At most one runtime can be installed
/// per process; returns `false` (leaving the existing one in place) on any
/// later attempt.
///
/// Installation must happen before the first introspection call: the
/// capability probe memoizes its outcome, and a process probed without a
/// runtime stays unsupported for its whole lifetime.
pub fn install(runtime: &'static dyn RecordRuntime) -> bool {
    let installed = INSTALLED.set(runtime).is_ok();
    if installed {
        log::info!(
            "[RecordRuntime] record runtime installed (dispatch_tables={})",
            runtime.dispatch_tables()
        );
    } else {
        log::warn!("[RecordRuntime] record runtime already installed; ignoring reinstall");
    }
    installed
}

/// Install the global [`ShapeRegistry`] as the process runtime and return it.
///
/// Idempotent: later calls return the same registry. If a different runtime
/// was installed first, the registry is still returned but is not the
/// installed runtime.
pub fn init() -> &'static ShapeRegistry {
    let registry = ShapeRegistry::global();
    let _ = install(registry);
    registry
}

pub(crate) fn installed() -> Option<&'static dyn RecordRuntime> {
    INSTALLED.get().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::TypeTag;

    #[derive(Debug)]
    struct Marker {
        flag: bool,
    }

    fn marker_shape() -> RecordShape {
        RecordShape::builder::<Marker>()
            .component("flag", |m: &Marker| m.flag)
            .construct(|args| Ok(Marker { flag: args.take()? }))
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ShapeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register(marker_shape()).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(TypeTag::of::<Marker>().id()));

        let shape = registry.get(TypeTag::of::<Marker>().id()).expect("shape");
        assert_eq!(shape.arity(), 1);
        assert!(registry.get(TypeTag::of::<u32>().id()).is_none());
    }

    #[test]
    fn test_reregistration_displaces() {
        let registry = ShapeRegistry::new();
        assert!(registry.register(marker_shape()).is_none());
        assert!(registry.register(marker_shape()).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_global_registry_is_one_instance() {
        let a = ShapeRegistry::global() as *const ShapeRegistry;
        let b = ShapeRegistry::global() as *const ShapeRegistry;
        assert_eq!(a, b);
    }

    #[test]
    fn test_install_is_once() {
        // Sole test touching the process-wide slot; later attempts must
        // leave the first runtime in place.
        let first: &'static ShapeRegistry = Box::leak(Box::new(ShapeRegistry::new()));
        let second: &'static ShapeRegistry = Box::leak(Box::new(ShapeRegistry::new()));
        let _ = install(first);
        assert!(!install(second));
        assert!(installed().is_some());
    }
}
