//! Legacy symbol support for checkpoints written by older releases
//!
//! Older checkpoints can embed callables that name symbols later removed from
//! the framework. This module provides:
//! - A registry mapping qualified symbol names to stand-in callables
//! - The catalogue of removed symbols and the releases that still used them
//! - A scoped guard installing the catalogue for the duration of a load
//!
//! # Example Usage
//!
//! ```rust
//! use checkpoint_compat::legacy::{with_legacy_patch_in, ShimRegistry, GPUS_ARG_DEFAULT};
//! use serde_json::json;
//!
//! let registry = ShimRegistry::new();
//! let value = with_legacy_patch_in(&registry, || registry.call(GPUS_ARG_DEFAULT, json!("0,1")))?;
//! assert_eq!(value, json!("0,1"));
//! assert!(registry.is_empty());
//! # Ok::<(), checkpoint_compat::CompatError>(())
//! ```
//!
//! Copyright (c) 2025 Checkpoint Compat Contributors
//! Licensed under the Apache-2.0 license

pub mod patch;
pub mod registry;
pub mod shims;

pub use patch::{with_legacy_patch, with_legacy_patch_in, LegacyPatch};
pub use registry::{Shim, ShimRegistry};
pub use shims::{legacy_shims, shims_for, LegacyShim, GPUS_ARG_DEFAULT};
