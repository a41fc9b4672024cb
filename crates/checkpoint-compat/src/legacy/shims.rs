//! Catalogue of symbols older checkpoints reference but current releases removed
//!
//! Copyright (c) 2025 Checkpoint Compat Contributors
//! Licensed under the Apache-2.0 license

use crate::versioning::version::ReleaseVersion;
use serde_json::Value;
use std::fmt;

/// Default-value hook once used by the `--gpus` argument parser
pub const GPUS_ARG_DEFAULT: &str = "pytorch_lightning.utilities.argparse._gpus_arg_default";

/// A removed symbol and the callable that stands in for it while loading
#[derive(Clone, Copy)]
pub struct LegacyShim {
    /// Qualified name serialized callables use to refer to the symbol
    pub name: &'static str,
    /// Checkpoints written before this release may reference the symbol
    pub applies_before: &'static [u64],
    /// What the symbol was
    pub description: &'static str,
    /// Replacement callable
    pub func: fn(Value) -> Value,
}

impl LegacyShim {
    /// Whether a checkpoint written by `version` may reference this symbol
    pub fn applies_to(&self, version: &ReleaseVersion) -> bool {
        version.components() < self.applies_before
    }

    /// The first release that no longer needs this shim
    pub fn fixed_in(&self) -> String {
        self.applies_before
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Debug for LegacyShim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyShim")
            .field("name", &self.name)
            .field("applies_before", &self.fixed_in())
            .field("description", &self.description)
            .finish()
    }
}

/// Returns its argument unchanged
fn identity(value: Value) -> Value {
    value
}

static LEGACY_SHIMS: &[LegacyShim] = &[LegacyShim {
    name: GPUS_ARG_DEFAULT,
    applies_before: &[1, 2, 8],
    description: "Identity default for the removed --gpus argument parser hook",
    func: identity,
}];

/// Every shim the legacy patch installs
pub fn legacy_shims() -> &'static [LegacyShim] {
    LEGACY_SHIMS
}

/// Shims a checkpoint written by `version` may rely on
pub fn shims_for(version: &ReleaseVersion) -> impl Iterator<Item = &'static LegacyShim> + '_ {
    LEGACY_SHIMS.iter().filter(move |shim| shim.applies_to(version))
}
