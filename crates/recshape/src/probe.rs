// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One-time capability detection.
//!
//! The probe answers a single question, once per introspector: is record
//! metadata available in this process, and through which invocation backend?
//! The outcome is memoized via `OnceLock`, so concurrent first-time callers
//! all observe the same fully initialized selection and the probe never runs
//! twice. A probe that ran before a runtime was installed stays at
//! "unsupported" for the rest of the process lifetime; the underlying
//! capability cannot meaningfully change mid-process, and re-probing would
//! reintroduce the initialization race the memoization exists to prevent.

use crate::runtime::RecordRuntime;
use std::fmt;
use std::sync::OnceLock;

/// Which dynamic-invocation mechanism serves introspection calls.
///
/// An implementation-selection detail: both backends produce identical
/// observable results. Exposed for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Pre-resolved per-type dispatch tables; favors call-site performance.
    Dispatch,
    /// Per-call metadata lookup; favors portability and simplicity.
    Lookup,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispatch => f.write_str("dispatch"),
            Self::Lookup => f.write_str("lookup"),
        }
    }
}

pub(crate) struct CapabilityProbe {
    outcome: OnceLock<Option<BackendKind>>,
}

impl CapabilityProbe {
    pub(crate) const fn new() -> Self {
        Self {
            outcome: OnceLock::new(),
        }
    }

    /// Probe once; `None` means the process has no record feature. Later
    /// calls return the memoized outcome without re-probing.
    pub(crate) fn detect(&self, runtime: Option<&'static dyn RecordRuntime>) -> Option<BackendKind> {
        *self.outcome.get_or_init(|| {
            let Some(runtime) = runtime else {
                log::warn!(
                    "[RecordProbe] no record runtime installed; record introspection disabled for this process"
                );
                return None;
            };
            let kind = if cfg!(feature = "dispatch-tables") && runtime.dispatch_tables() {
                BackendKind::Dispatch
            } else {
                BackendKind::Lookup
            };
            log::debug!("[RecordProbe] selected {} invocation backend", kind);
            Some(kind)
        })
    }

    /// The memoized outcome, if the probe has run.
    pub(crate) fn outcome(&self) -> Option<Option<BackendKind>> {
        self.outcome.get().copied()
    }
}
