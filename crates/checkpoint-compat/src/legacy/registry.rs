//! Indirection table for symbols removed from the current release
//!
//! Copyright (c) 2025 Checkpoint Compat Contributors
//! Licensed under the Apache-2.0 license

use crate::error::{CompatError, CompatResult};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

/// Stand-in callable registered under a qualified symbol name
pub type Shim = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Process-wide registry used by [`ShimRegistry::global`]
static GLOBAL_REGISTRY: OnceLock<ShimRegistry> = OnceLock::new();

/// Mapping from qualified symbol name to the callable that stands in for it
///
/// Decoders consult this table when a serialized callable names a symbol;
/// nothing here mutates a live namespace.
#[derive(Default)]
pub struct ShimRegistry {
    shims: RwLock<HashMap<String, Shim>>,
}

impl ShimRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process
    pub fn global() -> &'static ShimRegistry {
        GLOBAL_REGISTRY.get_or_init(ShimRegistry::new)
    }

    /// Register `shim` under `name`, returning true if it replaced an earlier entry
    pub fn install<F>(&self, name: &str, shim: F) -> bool
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        let replaced = self
            .write()
            .insert(name.to_string(), Arc::new(shim))
            .is_some();
        debug!(symbol = name, replaced, "Installed legacy shim");
        replaced
    }

    /// Register `shim` under `name` only if nothing is registered there yet
    ///
    /// Returns true when this call added the entry.
    pub fn install_if_absent<F>(&self, name: &str, shim: F) -> bool
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        let mut shims = self.write();
        if shims.contains_key(name) {
            return false;
        }
        shims.insert(name.to_string(), Arc::new(shim));
        debug!(symbol = name, "Installed legacy shim");
        true
    }

    /// Remove the shim registered under `name`
    ///
    /// Returns false when nothing was registered. Never fails.
    pub fn remove(&self, name: &str) -> bool {
        let removed = self.write().remove(name).is_some();
        if removed {
            debug!(symbol = name, "Removed legacy shim");
        }
        removed
    }

    /// Look up the shim registered under `name`
    pub fn resolve(&self, name: &str) -> Option<Shim> {
        self.read().get(name).cloned()
    }

    /// Resolve `name` and apply it to `arg`
    pub fn call(&self, name: &str, arg: Value) -> CompatResult<Value> {
        // The lock is released before the shim runs
        let shim = self
            .resolve(name)
            .ok_or_else(|| CompatError::unresolved_symbol(name))?;
        Ok(shim(arg))
    }

    /// Check whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Number of registered shims
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if no shims are registered
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered symbol names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Shim>> {
        self.shims.read().unwrap_or_else(|poisoned| {
            warn!("Recovering poisoned legacy shim registry");
            self.shims.clear_poison();
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Shim>> {
        self.shims.write().unwrap_or_else(|poisoned| {
            warn!("Recovering poisoned legacy shim registry");
            self.shims.clear_poison();
            PoisonError::into_inner(poisoned)
        })
    }
}

impl fmt::Debug for ShimRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShimRegistry")
            .field("symbols", &self.names())
            .finish()
    }
}
