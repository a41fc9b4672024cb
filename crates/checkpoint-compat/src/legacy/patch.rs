//! Scoped installation of the legacy shims
//!
//! Copyright (c) 2025 Checkpoint Compat Contributors
//! Licensed under the Apache-2.0 license

use crate::legacy::registry::ShimRegistry;
use crate::legacy::shims::legacy_shims;
use tracing::debug;

/// Guard that keeps the legacy shims registered while it is alive
///
/// Entering installs every shim from [`legacy_shims`] that the registry does
/// not already hold. Dropping the guard removes exactly those shims again,
/// whether the wrapped load returned normally, returned an error or panicked.
/// Shims that were present before entry stay registered, so guards nest: a
/// load that opens its own guard inside an outer one leaves the outer scope
/// intact. Removal never fails, so an error from the load is the one the
/// caller sees.
///
/// The registry is shared state. Guards on different threads are not
/// coordinated: the thread whose guard installed a shim removes it on exit
/// even if another thread's load still relies on it. Callers loading
/// checkpoints from several threads must serialize their guarded loads.
///
/// ```rust
/// use checkpoint_compat::legacy::{LegacyPatch, ShimRegistry, GPUS_ARG_DEFAULT};
///
/// let registry = ShimRegistry::new();
/// {
///     let _patch = LegacyPatch::enter_in(&registry);
///     assert!(registry.contains(GPUS_ARG_DEFAULT));
/// }
/// assert!(!registry.contains(GPUS_ARG_DEFAULT));
/// ```
#[must_use = "the legacy shims are removed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LegacyPatch<'r> {
    registry: &'r ShimRegistry,
    installed: Vec<&'static str>,
}

impl LegacyPatch<'static> {
    /// Install the legacy shims into the process-wide registry
    pub fn enter() -> Self {
        Self::enter_in(ShimRegistry::global())
    }
}

impl<'r> LegacyPatch<'r> {
    /// Install the legacy shims into `registry`
    pub fn enter_in(registry: &'r ShimRegistry) -> Self {
        let installed: Vec<&'static str> = legacy_shims()
            .iter()
            .filter(|shim| registry.install_if_absent(shim.name, shim.func))
            .map(|shim| shim.name)
            .collect();
        debug!(installed = installed.len(), "Entered legacy patch");
        Self {
            registry,
            installed,
        }
    }

    /// The registry the shims were installed into
    pub fn registry(&self) -> &'r ShimRegistry {
        self.registry
    }
}

impl Drop for LegacyPatch<'_> {
    fn drop(&mut self) {
        for name in &self.installed {
            self.registry.remove(name);
        }
        debug!(removed = self.installed.len(), "Exited legacy patch");
    }
}

/// Run `f` with the legacy shims installed in the process-wide registry
pub fn with_legacy_patch<T>(f: impl FnOnce() -> T) -> T {
    let _patch = LegacyPatch::enter();
    f()
}

/// Run `f` with the legacy shims installed in `registry`
pub fn with_legacy_patch_in<T>(registry: &ShimRegistry, f: impl FnOnce() -> T) -> T {
    let _patch = LegacyPatch::enter_in(registry);
    f()
}
