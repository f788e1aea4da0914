// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch-table backend.
//!
//! Resolves each type's accessors and constructor once into a dense,
//! index-addressed table and serves every later call through pre-resolved
//! slots. Tables are cached per `TypeId` in a concurrent map; resolution
//! happens at most once per type per process (a racing duplicate build is
//! harmless, the cache keeps one table).

use crate::backend::{descriptor_sequence, index_ordered_args, Backend, ComponentOrder};
use crate::component::{ComponentDescriptor, TypeTag};
use crate::error::{IntrospectError, Result};
use crate::runtime::RecordRuntime;
use crate::shape::{Accessor, ArgList, Ctor, RecordShape, ShapeComponent};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Pre-resolved invocation table for one record type.
struct DispatchTable {
    type_name: &'static str,
    components: Vec<ShapeComponent>,
    by_name: HashMap<String, usize>,
    accessors: Vec<Accessor>,
    params: Vec<TypeTag>,
    ctor: Ctor,
}

impl DispatchTable {
    fn resolve(shape: &RecordShape) -> Self {
        let components = shape.components().to_vec();
        let by_name = components
            .iter()
            .enumerate()
            .map(|(slot, component)| (component.name.clone(), slot))
            .collect();
        let accessors = (0..components.len())
            .filter_map(|slot| shape.accessor(slot).cloned())
            .collect();
        let params = components.iter().map(|component| component.ty).collect();
        log::debug!(
            "[DispatchBackend] resolved dispatch table for {} ({} slots)",
            shape.type_name(),
            components.len()
        );
        Self {
            type_name: shape.type_name(),
            components,
            by_name,
            accessors,
            params,
            ctor: Arc::clone(shape.ctor()),
        }
    }
}

pub(crate) struct DispatchBackend {
    runtime: &'static dyn RecordRuntime,
    tables: DashMap<TypeId, Arc<DispatchTable>>,
}

impl DispatchBackend {
    pub(crate) fn new(runtime: &'static dyn RecordRuntime) -> Self {
        Self {
            runtime,
            tables: DashMap::new(),
        }
    }

    fn table(&self, ty: TypeId) -> Option<Arc<DispatchTable>> {
        if let Some(table) = self.tables.get(&ty) {
            return Some(Arc::clone(&table));
        }
        let shape = self.runtime.shape_of(ty)?;
        let entry = self
            .tables
            .entry(ty)
            .or_insert_with(|| Arc::new(DispatchTable::resolve(&shape)));
        Some(Arc::clone(&entry))
    }
}

impl Backend for DispatchBackend {
    fn is_record(&self, ty: TypeTag) -> bool {
        self.table(ty.id()).is_some()
    }

    fn components(
        &self,
        ty: TypeTag,
        order: Option<ComponentOrder<'_>>,
    ) -> Result<Vec<ComponentDescriptor>> {
        let table = self
            .table(ty.id())
            .ok_or_else(|| IntrospectError::not_a_record(ty.name()))?;
        Ok(descriptor_sequence(&table.components, order))
    }

    fn component_value(
        &self,
        instance: &dyn Any,
        component: &ComponentDescriptor,
    ) -> Result<Box<dyn Any>> {
        let Some(table) = self.table(instance.type_id()) else {
            return Err(IntrospectError::access(
                "<unknown>",
                component.name(),
                "instance type is not a registered record-like type",
            ));
        };
        let slot = table.by_name.get(component.name()).copied().ok_or_else(|| {
            IntrospectError::access(
                table.type_name,
                component.name(),
                "no accessor with this name",
            )
        })?;
        let read = table
            .accessors
            .get(slot)
            .ok_or_else(|| {
                IntrospectError::access(
                    table.type_name,
                    component.name(),
                    "accessor slot out of range",
                )
            })?
            .as_ref();
        read(instance).ok_or_else(|| {
            IntrospectError::access(
                table.type_name,
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
        let table = self
            .table(ty.id())
            .ok_or_else(|| IntrospectError::not_a_record(ty.name()))?;
        let ordered = index_ordered_args(table.type_name, &table.params, components, args)?;
        let build = table.ctor.as_ref();
        build(ArgList::new(table.type_name, ordered))
    }
}
