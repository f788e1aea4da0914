// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Invocation backends.
//!
//! Both backends implement the same four-operation contract over one
//! dynamic-invocation mechanism: [`dispatch`] pre-resolves per-type tables
//! once and goes through dense slots afterwards, [`lookup`] walks the shape
//! metadata by name and signature on every call. Identical inputs produce
//! identical observable results on either; which one serves a process is
//! decided once by the capability probe.

use crate::component::{ComponentDescriptor, TypeTag};
use crate::error::{IntrospectError, Result};
use crate::shape::ShapeComponent;
use std::any::Any;
use std::cmp::Ordering;

#[cfg(feature = "dispatch-tables")]
pub(crate) mod dispatch;
pub(crate) mod lookup;

/// Caller-supplied ordering for a returned descriptor sequence.
pub(crate) type ComponentOrder<'a> =
    &'a dyn Fn(&ComponentDescriptor, &ComponentDescriptor) -> Ordering;

/// The uniform contract both invocation mechanisms implement.
pub(crate) trait Backend: Send + Sync {
    fn is_record(&self, ty: TypeTag) -> bool;

    fn components(
        &self,
        ty: TypeTag,
        order: Option<ComponentOrder<'_>>,
    ) -> Result<Vec<ComponentDescriptor>>;

    fn component_value(
        &self,
        instance: &dyn Any,
        component: &ComponentDescriptor,
    ) -> Result<Box<dyn Any>>;

    fn construct(
        &self,
        ty: TypeTag,
        components: &[ComponentDescriptor],
        args: Vec<Box<dyn Any>>,
    ) -> Result<Box<dyn Any>>;
}

/// Descriptor sequence in the shape's embedded order, indices assigned in
/// that order, then optionally reordered by the caller's comparator. The
/// sort is stable and never touches the `index` fields.
pub(crate) fn descriptor_sequence(
    components: &[ShapeComponent],
    order: Option<ComponentOrder<'_>>,
) -> Vec<ComponentDescriptor> {
    let mut sequence: Vec<ComponentDescriptor> = components
        .iter()
        .enumerate()
        .map(|(index, component)| {
            ComponentDescriptor::new(component.name.clone(), component.ty, index)
        })
        .collect();
    if let Some(order) = order {
        sequence.sort_by(|a, b| order(a, b));
    }
    sequence
}

/// Check the descriptor-derived signature against the canonical parameter
/// list and reposition `args` into index order. `args[i]` corresponds to
/// `components[i]`, which need not be sorted by index.
pub(crate) fn index_ordered_args(
    type_name: &str,
    params: &[TypeTag],
    components: &[ComponentDescriptor],
    args: Vec<Box<dyn Any>>,
) -> Result<Vec<Box<dyn Any>>> {
    let arity = params.len();
    if components.len() != arity {
        return Err(IntrospectError::construction(
            type_name,
            format!(
                "expected {} component descriptors, got {}",
                arity,
                components.len()
            ),
        ));
    }
    if args.len() != arity {
        return Err(IntrospectError::construction(
            type_name,
            format!("constructor takes {} arguments, got {}", arity, args.len()),
        ));
    }

    let mut slots: Vec<Option<Box<dyn Any>>> = Vec::with_capacity(arity);
    slots.resize_with(arity, || None);
    for (component, arg) in components.iter().zip(args) {
        let index = component.index();
        let declared = params.get(index).copied().ok_or_else(|| {
            IntrospectError::construction(
                type_name,
                format!(
                    "component `{}` has index {}, constructor arity is {}",
                    component.name(),
                    index,
                    arity
                ),
            )
        })?;
        if declared != component.ty() {
            return Err(IntrospectError::construction(
                type_name,
                format!(
                    "no canonical constructor takes {} at position {} (declared parameter is {})",
                    component.ty(),
                    index,
                    declared
                ),
            ));
        }
        if slots[index].replace(arg).is_some() {
            return Err(IntrospectError::construction(
                type_name,
                format!("duplicate component index {}", index),
            ));
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| {
                IntrospectError::construction(
                    type_name,
                    format!("no descriptor covers index {}", index),
                )
            })
        })
        .collect()
}
