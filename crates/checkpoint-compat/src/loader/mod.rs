//! Checkpoint loading with legacy symbol resolution
//!
//! This module provides:
//! - JSON and YAML document parsing with format detection by extension
//! - Resolution of serialized callables through the legacy shim registry
//! - A loader that brackets decoding with the legacy patch and reports
//!   whether the checkpoint predates a target release
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use checkpoint_compat::loader::{CheckpointLoader, LoaderConfig};
//! use checkpoint_compat::ReleaseVersion;
//! use std::path::Path;
//!
//! let loader = CheckpointLoader::with_config(LoaderConfig {
//!     target_version: Some(ReleaseVersion::parse("1.3.0")?),
//!     ..LoaderConfig::default()
//! });
//! let loaded = loader.load(Path::new("checkpoints/epoch=3.json"))?;
//! if loaded.needs_upgrade {
//!     println!("checkpoint written by {:?} needs an upgrade", loaded.version);
//! }
//! # Ok::<(), checkpoint_compat::CompatError>(())
//! ```
//!
//! Copyright (c) 2025 Checkpoint Compat Contributors
//! Licensed under the Apache-2.0 license

pub mod checkpoint_loader;
pub mod parser;
pub mod resolver;

pub use checkpoint_loader::{CheckpointLoader, LoadedCheckpoint, LoaderConfig};
pub use parser::{parse_content, Format};
pub use resolver::{SymbolResolver, ARG_KEY, SYMBOL_KEY};
