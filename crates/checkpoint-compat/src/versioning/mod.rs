//! Checkpoint versioning
//!
//! This module provides:
//! - Release version parsing with numeric, component-wise ordering
//! - Accessors for the version field of a checkpoint record
//! - The predicate deciding whether a checkpoint predates a target release
//!
//! Copyright (c) 2025 Checkpoint Compat Contributors
//! Licensed under the Apache-2.0 license

pub mod record;
pub mod version;

pub use record::{get_version, set_version, should_upgrade, CheckpointRecord, VERSION_KEY};
pub use version::ReleaseVersion;
