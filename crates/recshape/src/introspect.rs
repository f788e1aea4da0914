// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The introspection façade.
//!
//! [`RecordIntrospector`] is the single entry point for callers. On first use
//! it consults the capability probe; if the process has no record feature,
//! `is_record_type` answers `false` for every type and every other operation
//! fails with [`IntrospectError::Unsupported`] without attempting any
//! introspection. Otherwise every call is delegated verbatim to the selected
//! backend.

use crate::backend::lookup::LookupBackend;
use crate::backend::Backend;
use crate::component::{ComponentDescriptor, TypeTag};
use crate::error::{IntrospectError, Result};
use crate::probe::{BackendKind, CapabilityProbe};
use crate::runtime::{self, RecordRuntime};
use std::any::Any;
use std::cmp::Ordering;
use std::sync::OnceLock;

#[derive(Clone, Copy)]
enum RuntimeSource {
    /// The runtime installed process-wide via [`runtime::install`].
    Installed,
    /// An explicitly supplied runtime (embedders, tests).
    Fixed(&'static dyn RecordRuntime),
}

/// Façade over whichever invocation backend the capability probe selected.
///
/// The process-global instance is obtained with
/// [`global`](RecordIntrospector::global); it is bound to the runtime
/// installed via [`runtime::install`] / [`runtime::init`]. Additional
/// instances over explicit runtimes can be created with
/// [`with_runtime`](RecordIntrospector::with_runtime).
pub struct RecordIntrospector {
    source: RuntimeSource,
    probe: CapabilityProbe,
    backend: OnceLock<Option<Box<dyn Backend>>>,
}

impl RecordIntrospector {
    /// Introspector bound to the process-installed runtime.
    pub const fn new() -> Self {
        Self {
            source: RuntimeSource::Installed,
            probe: CapabilityProbe::new(),
            backend: OnceLock::new(),
        }
    }

    /// Introspector over an explicit runtime.
    pub const fn with_runtime(runtime: &'static dyn RecordRuntime) -> Self {
        Self {
            source: RuntimeSource::Fixed(runtime),
            probe: CapabilityProbe::new(),
            backend: OnceLock::new(),
        }
    }

    /// The process-global introspector.
    pub fn global() -> &'static RecordIntrospector {
        static INTROSPECTOR: RecordIntrospector = RecordIntrospector::new();
        &INTROSPECTOR
    }

    /// Which invocation backend serves this introspector. Probes on first
    /// call; `None` means the process has no record feature.
    pub fn backend_kind(&self) -> Option<BackendKind> {
        let _ = self.backend();
        self.probe.outcome().flatten()
    }

    /// True iff `ty` is a record-like type known to the runtime. Answers
    /// `false` for every type when the process has no record feature.
    pub fn is_record_type(&self, ty: TypeTag) -> bool {
        match self.backend() {
            Some(backend) => backend.is_record(ty),
            None => false,
        }
    }

    /// Ordered component schema of `ty`, in canonical-constructor order.
    pub fn components(&self, ty: TypeTag) -> Result<Vec<ComponentDescriptor>> {
        self.active()?.components(ty, None)
    }

    /// Component schema of `ty`, with the returned sequence reordered by
    /// `order`. Each descriptor's `index` is untouched by the reordering.
    pub fn components_ordered_by<F>(&self, ty: TypeTag, order: F) -> Result<Vec<ComponentDescriptor>>
    where
        F: Fn(&ComponentDescriptor, &ComponentDescriptor) -> Ordering,
    {
        self.active()?.components(ty, Some(&order))
    }

    /// Read one component value out of `instance`. The accessor is resolved
    /// on the instance's own runtime type, by the descriptor's name.
    pub fn component_value(
        &self,
        instance: &dyn Any,
        component: &ComponentDescriptor,
    ) -> Result<Box<dyn Any>> {
        self.active()?.component_value(instance, component)
    }

    /// [`component_value`](Self::component_value) with a typed result.
    pub fn component_value_as<T: 'static>(
        &self,
        instance: &dyn Any,
        component: &ComponentDescriptor,
    ) -> Result<T> {
        let value = self.component_value(instance, component)?;
        match value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(IntrospectError::access(
                "<instance>",
                component.name(),
                format!("component value is not a {}", std::any::type_name::<T>()),
            )),
        }
    }

    /// Invoke `ty`'s canonical constructor. `args[i]` corresponds to
    /// `components[i]`; the argument values are repositioned into canonical
    /// parameter order via each descriptor's `index` before invocation, so
    /// the descriptor sequence may be in any order.
    pub fn construct(
        &self,
        ty: TypeTag,
        components: &[ComponentDescriptor],
        args: Vec<Box<dyn Any>>,
    ) -> Result<Box<dyn Any>> {
        self.active()?.construct(ty, components, args)
    }

    /// [`construct`](Self::construct) with a typed result.
    pub fn construct_as<T: 'static>(
        &self,
        ty: TypeTag,
        components: &[ComponentDescriptor],
        args: Vec<Box<dyn Any>>,
    ) -> Result<T> {
        let instance = self.construct(ty, components, args)?;
        match instance.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(IntrospectError::construction(
                ty.name(),
                format!(
                    "constructed value is not a {}",
                    std::any::type_name::<T>()
                ),
            )),
        }
    }

    fn active(&self) -> Result<&dyn Backend> {
        self.backend().ok_or(IntrospectError::Unsupported)
    }

    fn backend(&self) -> Option<&dyn Backend> {
        self.backend
            .get_or_init(|| {
                let runtime = match self.source {
                    RuntimeSource::Installed => runtime::installed(),
                    RuntimeSource::Fixed(runtime) => Some(runtime),
                };
                let kind = self.probe.detect(runtime)?;
                let runtime = runtime?;
                Some(Self::build_backend(kind, runtime))
            })
            .as_deref()
    }

    fn build_backend(kind: BackendKind, runtime: &'static dyn RecordRuntime) -> Box<dyn Backend> {
        match kind {
            #[cfg(feature = "dispatch-tables")]
            BackendKind::Dispatch => {
                Box::new(crate::backend::dispatch::DispatchBackend::new(runtime))
            }
            _ => Box::new(LookupBackend::new(runtime)),
        }
    }
}

impl Default for RecordIntrospector {
    fn default() -> Self {
        Self::new()
    }
}

/// [`RecordIntrospector::is_record_type`] on the global introspector.
pub fn is_record_type(ty: TypeTag) -> bool {
    RecordIntrospector::global().is_record_type(ty)
}

/// [`RecordIntrospector::components`] on the global introspector.
pub fn components(ty: TypeTag) -> Result<Vec<ComponentDescriptor>> {
    RecordIntrospector::global().components(ty)
}

/// [`RecordIntrospector::components_ordered_by`] on the global introspector.
pub fn components_ordered_by<F>(ty: TypeTag, order: F) -> Result<Vec<ComponentDescriptor>>
where
    F: Fn(&ComponentDescriptor, &ComponentDescriptor) -> Ordering,
{
    RecordIntrospector::global().components_ordered_by(ty, order)
}

/// [`RecordIntrospector::component_value`] on the global introspector.
pub fn component_value(
    instance: &dyn Any,
    component: &ComponentDescriptor,
) -> Result<Box<dyn Any>> {
    RecordIntrospector::global().component_value(instance, component)
}

/// [`RecordIntrospector::construct`] on the global introspector.
pub fn construct(
    ty: TypeTag,
    components: &[ComponentDescriptor],
    args: Vec<Box<dyn Any>>,
) -> Result<Box<dyn Any>> {
    RecordIntrospector::global().construct(ty, components, args)
}
