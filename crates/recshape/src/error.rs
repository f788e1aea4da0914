// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for record introspection.

use std::fmt;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, IntrospectError>;

/// Errors reported by the introspection subsystem.
///
/// All errors are terminal at this layer: there are no internal retries and
/// no silent recovery. The caller decides whether a given error aborts a
/// whole (de)serialization pass or is reported per field.
#[derive(Debug)]
pub enum IntrospectError {
    /// No record runtime was installed before first use. Permanent for the
    /// process lifetime, never retryable.
    Unsupported,
    /// The supplied type is not a record-like type.
    NotARecord { type_name: String },
    /// A component accessor is missing, the instance type is unknown, or the
    /// accessor failed during a read.
    Access {
        type_name: String,
        component: String,
        detail: String,
    },
    /// No canonical constructor matches the derived signature, the argument
    /// list mismatches, or the constructor itself failed.
    Construction { type_name: String, detail: String },
}

impl IntrospectError {
    pub(crate) fn not_a_record(type_name: impl Into<String>) -> Self {
        Self::NotARecord {
            type_name: type_name.into(),
        }
    }

    pub(crate) fn access(
        type_name: impl Into<String>,
        component: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::Access {
            type_name: type_name.into(),
            component: component.into(),
            detail: detail.into(),
        }
    }

    pub(crate) fn construction(type_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Construction {
            type_name: type_name.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for IntrospectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => {
                write!(f, "record introspection is not supported in this process (no record runtime installed)")
            }
            Self::NotARecord { type_name } => write!(f, "not a record-like type: {}", type_name),
            Self::Access {
                type_name,
                component,
                detail,
            } => write!(
                f,
                "could not read component `{}` of {}: {}",
                component, type_name, detail
            ),
            Self::Construction { type_name, detail } => {
                write!(f, "could not construct {}: {}", type_name, detail)
            }
        }
    }
}

impl std::error::Error for IntrospectError {}
