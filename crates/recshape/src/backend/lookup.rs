// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Metadata-lookup backend.
//!
//! Walks the shape metadata on every call: accessors are found by name scan,
//! the canonical constructor by comparing the descriptor-derived signature
//! against the shape's parameter list. No per-type state is kept.

use crate::backend::{descriptor_sequence, index_ordered_args, Backend, ComponentOrder};
use crate::component::{ComponentDescriptor, TypeTag};
use crate::error::{IntrospectError, Result};
use crate::runtime::RecordRuntime;
use crate::shape::ArgList;
use std::any::Any;

pub(crate) struct LookupBackend {
    runtime: &'static dyn RecordRuntime,
}

impl LookupBackend {
    pub(crate) fn new(runtime: &'static dyn RecordRuntime) -> Self {
        Self { runtime }
    }
}

impl Backend for LookupBackend {
    fn is_record(&self, ty: TypeTag) -> bool {
        self.runtime.shape_of(ty.id()).is_some()
    }

    fn components(
        &self,
        ty: TypeTag,
        order: Option<ComponentOrder<'_>>,
    ) -> Result<Vec<ComponentDescriptor>> {
        let shape = self
            .runtime
            .shape_of(ty.id())
            .ok_or_else(|| IntrospectError::not_a_record(ty.name()))?;
        Ok(descriptor_sequence(shape.components(), order))
    }

    fn component_value(
        &self,
        instance: &dyn Any,
        component: &ComponentDescriptor,
    ) -> Result<Box<dyn Any>> {
        let Some(shape) = self.runtime.shape_of(instance.type_id()) else {
            return Err(IntrospectError::access(
                "<unknown>",
                component.name(),
                "instance type is not a registered record-like type",
            ));
        };
        let read = shape
            .accessor_named(component.name())
            .ok_or_else(|| {
                IntrospectError::access(
                    shape.type_name(),
                    component.name(),
                    "no accessor with this name",
                )
            })?
            .as_ref();
        read(instance).ok_or_else(|| {
            IntrospectError::access(
                shape.type_name(),
                component.name(),
                "accessor rejected the instance",
            )
        })
    }

    fn construct(
        &self,
        ty: TypeTag,
        components: &[ComponentDescriptor],
        args: Vec<Box<dyn Any>>,
    ) -> Result<Box<dyn Any>> {
        let shape = self
            .runtime
            .shape_of(ty.id())
            .ok_or_else(|| IntrospectError::not_a_record(ty.name()))?;
        let params: Vec<TypeTag> = shape
            .components()
            .iter()
            .map(|component| component.ty)
            .collect();
        let ordered = index_ordered_args(shape.type_name(), &params, components, args)?;
        let build = shape.ctor().as_ref();
        build(ArgList::new(shape.type_name(), ordered))
    }
}
