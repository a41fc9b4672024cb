//! Checkpoint Compat - loading training checkpoints written by older releases
//!
//! This crate lets a checkpoint saved by an older release be deserialized
//! safely and tells the caller whether it should be migrated:
//! - **Versioning**: read and write the release recorded in a checkpoint and
//!   decide whether it predates a target release
//! - **Legacy shims**: a registry of stand-ins for symbols removed from the
//!   framework, installed only for the duration of a load
//! - **Loading**: JSON/YAML checkpoint documents decoded under the legacy
//!   patch, with serialized callables resolved through the registry
//!
//! ## Quick Start
//!
//! ```rust
//! use checkpoint_compat::{get_version, set_version, should_upgrade};
//! use serde_json::Map;
//!
//! let mut checkpoint = Map::new();
//! set_version(&mut checkpoint, "1.2.7");
//!
//! assert_eq!(get_version(&checkpoint)?, "1.2.7");
//! assert!(should_upgrade(&checkpoint, "1.2.8")?);
//! assert!(!should_upgrade(&checkpoint, "1.2.7")?);
//! # Ok::<(), checkpoint_compat::CompatError>(())
//! ```
//!
//! ## Version Ordering
//!
//! Versions compare numerically component by component, so `1.10` is newer
//! than `1.2`. A version that is a prefix of another is older (`1.2 < 1.2.0`).
//!
//! ## Legacy Patch
//!
//! [`LegacyPatch`] installs the shim catalogue into a [`ShimRegistry`] and
//! removes it when dropped, including during a panic. The process-wide
//! registry is shared, so concurrent guarded loads must be serialized by the
//! caller.
//!
//! Copyright (c) 2025 Checkpoint Compat Contributors
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod legacy;
pub mod loader;
pub mod versioning;

// Re-export commonly used types for convenience
pub use error::{CompatError, CompatResult};
pub use legacy::{with_legacy_patch, LegacyPatch, ShimRegistry};
pub use loader::{CheckpointLoader, Format, LoadedCheckpoint, LoaderConfig};
pub use versioning::{
    get_version, set_version, should_upgrade, CheckpointRecord, ReleaseVersion, VERSION_KEY,
};
