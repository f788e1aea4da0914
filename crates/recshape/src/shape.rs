// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record shapes: the metadata a record-like type contributes at runtime.
//!
//! A shape is what the introspection backends consume: the ordered component
//! list of one type, a type-erased accessor per component, and the type's
//! canonical all-components constructor as an erased closure. Shapes are
//! built with [`RecordShape::builder`] and handed to a
//! [`ShapeRegistry`](crate::ShapeRegistry).

use crate::component::TypeTag;
use crate::error::{IntrospectError, Result};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased component accessor. Yields `None` when the instance is not of
/// the shape's type.
pub(crate) type Accessor = Arc<dyn Fn(&dyn Any) -> Option<Box<dyn Any>> + Send + Sync>;

/// Type-erased canonical constructor.
pub(crate) type Ctor = Arc<dyn Fn(ArgList) -> Result<Box<dyn Any>> + Send + Sync>;

/// One component as recorded in a shape. The position in the shape's
/// component list is the canonical-constructor parameter index.
#[derive(Clone)]
pub(crate) struct ShapeComponent {
    pub(crate) name: String,
    pub(crate) ty: TypeTag,
}

/// Runtime metadata of one record-like type.
///
/// Component order in the shape is canonical-constructor parameter order.
/// The finishing step of the builder supplies the constructor, so a shape
/// without a canonical constructor cannot exist.
pub struct RecordShape {
    tag: TypeTag,
    components: Vec<ShapeComponent>,
    accessors: Vec<Accessor>,
    ctor: Ctor,
}

impl RecordShape {
    /// Start building a shape for the record type `T`.
    pub fn builder<T: 'static>() -> ShapeBuilder<T> {
        ShapeBuilder::new()
    }

    /// Tag of the described type.
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Rendered name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.tag.name()
    }

    /// Number of components (canonical-constructor arity).
    pub fn arity(&self) -> usize {
        self.components.len()
    }

    pub(crate) fn components(&self) -> &[ShapeComponent] {
        &self.components
    }

    pub(crate) fn accessor(&self, index: usize) -> Option<&Accessor> {
        self.accessors.get(index)
    }

    /// Accessor lookup by component name (linear scan over the metadata).
    pub(crate) fn accessor_named(&self, name: &str) -> Option<&Accessor> {
        self.components
            .iter()
            .position(|component| component.name == name)
            .and_then(|index| self.accessors.get(index))
    }

    pub(crate) fn ctor(&self) -> &Ctor {
        &self.ctor
    }
}

impl fmt::Debug for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordShape")
            .field("type_name", &self.type_name())
            .field("arity", &self.arity())
            .finish_non_exhaustive()
    }
}

/// Fluent builder for [`RecordShape`].
///
/// `component` calls declare the components in canonical order; the finishing
/// [`construct`](ShapeBuilder::construct) call supplies the canonical
/// constructor and yields the shape.
pub struct ShapeBuilder<T: 'static> {
    components: Vec<ShapeComponent>,
    accessors: Vec<Accessor>,
    _record: PhantomData<fn() -> T>,
}

impl<T: 'static> ShapeBuilder<T> {
    fn new() -> Self {
        Self {
            components: Vec::new(),
            accessors: Vec::new(),
            _record: PhantomData,
        }
    }

    /// Declare the next component: its name, its declared type `C`, and how
    /// to read it out of an instance.
    pub fn component<C: 'static>(
        mut self,
        name: impl Into<String>,
        read: impl Fn(&T) -> C + Send + Sync + 'static,
    ) -> Self {
        self.components.push(ShapeComponent {
            name: name.into(),
            ty: TypeTag::of::<C>(),
        });
        self.accessors.push(Arc::new(move |instance: &dyn Any| {
            instance
                .downcast_ref::<T>()
                .map(|record| Box::new(read(record)) as Box<dyn Any>)
        }));
        self
    }

    /// Supply the canonical constructor and finish the shape.
    ///
    /// The constructor receives the component values repositioned into
    /// canonical parameter order and takes them one by one via
    /// [`ArgList::take`]. It must consume exactly the declared arity.
    pub fn construct(
        self,
        build: impl Fn(&mut ArgList) -> Result<T> + Send + Sync + 'static,
    ) -> RecordShape {
        let tag = TypeTag::of::<T>();
        let ctor: Ctor = Arc::new(move |mut args: ArgList| {
            let record = build(&mut args)?;
            args.finish()?;
            Ok(Box::new(record) as Box<dyn Any>)
        });
        RecordShape {
            tag,
            components: self.components,
            accessors: self.accessors,
            ctor,
        }
    }
}

/// Ordered, type-erased argument list handed to a canonical constructor.
///
/// Arguments are already repositioned into canonical parameter order when the
/// constructor runs; [`take`](ArgList::take) pops the next one with a checked
/// downcast.
pub struct ArgList {
    type_name: &'static str,
    args: std::vec::IntoIter<Box<dyn Any>>,
    cursor: usize,
}

impl ArgList {
    pub(crate) fn new(type_name: &'static str, args: Vec<Box<dyn Any>>) -> Self {
        Self {
            type_name,
            args: args.into_iter(),
            cursor: 0,
        }
    }

    /// Number of arguments not yet taken.
    pub fn remaining(&self) -> usize {
        self.args.len()
    }

    /// Take the next argument as a `C`.
    pub fn take<C: 'static>(&mut self) -> Result<C> {
        let position = self.cursor;
        self.cursor += 1;
        let arg = self.args.next().ok_or_else(|| {
            IntrospectError::construction(
                self.type_name,
                format!("constructor requested more than {} arguments", position),
            )
        })?;
        match arg.downcast::<C>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(IntrospectError::construction(
                self.type_name,
                format!(
                    "argument {} is not a {}",
                    position,
                    std::any::type_name::<C>()
                ),
            )),
        }
    }

    fn finish(&mut self) -> Result<()> {
        let leftover = self.args.len();
        if leftover == 0 {
            Ok(())
        } else {
            Err(IntrospectError::construction(
                self.type_name,
                format!("constructor left {} arguments unconsumed", leftover),
            ))
        }
    }
}
