//! Checkpoint loader bracketing decoding with the legacy patch
//!
//! Copyright (c) 2025 Checkpoint Compat Contributors
//! Licensed under the Apache-2.0 license

use crate::error::{CompatError, CompatResult};
use crate::legacy::{shims_for, with_legacy_patch_in, ShimRegistry};
use crate::loader::parser::{parse_content, Format};
use crate::loader::resolver::SymbolResolver;
use crate::versioning::{get_version, ReleaseVersion};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info, warn};

/// Path reported in errors for content loaded from memory
const IN_MEMORY_PATH: &str = "<memory>";

/// Configuration for checkpoint loader behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Force a format instead of detecting it from the file extension
    pub format: Option<Format>,
    /// Install the legacy shims while decoding
    pub apply_legacy_patch: bool,
    /// Release the loaded checkpoint is compared against
    ///
    /// Parsed when the configuration is built, so a malformed target is
    /// rejected before any checkpoint is read.
    pub target_version: Option<ReleaseVersion>,
    /// Maximum nesting depth during symbol resolution
    pub max_depth: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            format: None,
            apply_legacy_patch: true,
            target_version: None,
            max_depth: 64,
        }
    }
}

/// A decoded checkpoint and what is known about its release
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCheckpoint {
    /// Top-level fields of the checkpoint
    pub record: Map<String, Value>,
    /// Release that wrote the checkpoint, if recorded
    pub version: Option<ReleaseVersion>,
    /// Whether the checkpoint predates the configured target release
    pub needs_upgrade: bool,
}

impl LoadedCheckpoint {
    /// Take the decoded fields
    pub fn into_record(self) -> Map<String, Value> {
        self.record
    }
}

/// Loads checkpoint documents, resolving legacy symbols through a registry
#[derive(Debug)]
pub struct CheckpointLoader<'r> {
    config: LoaderConfig,
    registry: &'r ShimRegistry,
}

impl CheckpointLoader<'static> {
    /// Create a loader with default configuration using the process-wide registry
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    /// Create a loader with custom configuration using the process-wide registry
    pub fn with_config(config: LoaderConfig) -> Self {
        Self::with_registry(config, ShimRegistry::global())
    }
}

impl Default for CheckpointLoader<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> CheckpointLoader<'r> {
    /// Create a loader resolving symbols through `registry`
    pub fn with_registry(config: LoaderConfig, registry: &'r ShimRegistry) -> Self {
        Self { config, registry }
    }

    /// Get the loader configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a checkpoint from file
    pub fn load(&self, path: &Path) -> CompatResult<LoadedCheckpoint> {
        let format = match self.config.format {
            Some(format) => format,
            None => Format::from_path(path)?,
        };
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompatError::io_error(path.to_path_buf(), e))?;

        debug!(path = %path.display(), ?format, "Loading checkpoint");
        self.decode(&content, format, path)
    }

    /// Load a checkpoint from in-memory content
    pub fn load_str(&self, content: &str, format: Format) -> CompatResult<LoadedCheckpoint> {
        self.decode(content, format, Path::new(IN_MEMORY_PATH))
    }

    fn decode(&self, content: &str, format: Format, path: &Path) -> CompatResult<LoadedCheckpoint> {
        let value = if self.config.apply_legacy_patch {
            with_legacy_patch_in(self.registry, || self.parse_and_resolve(content, format, path))?
        } else {
            self.parse_and_resolve(content, format, path)?
        };

        let record = match value {
            Value::Object(record) => record,
            other => return Err(CompatError::not_a_record(path.to_path_buf(), &other)),
        };

        let version = match get_version(&record) {
            Ok(version) => Some(ReleaseVersion::parse(&version)?),
            Err(CompatError::MissingField { .. }) => {
                warn!(path = %path.display(), "Checkpoint does not record the release that wrote it");
                None
            }
            Err(e) => return Err(e),
        };

        let needs_upgrade = match (&version, &self.config.target_version) {
            (Some(version), Some(target)) => version < target,
            _ => false,
        };

        if let Some(version) = &version {
            let legacy: Vec<&str> = shims_for(version).map(|shim| shim.name).collect();
            if !legacy.is_empty() {
                debug!(%version, symbols = ?legacy, "Checkpoint predates removal of legacy symbols");
            }
        }
        if let (true, Some(version), Some(target)) =
            (needs_upgrade, &version, &self.config.target_version)
        {
            info!(
                path = %path.display(),
                %version,
                %target,
                "Checkpoint was written by an older release and should be upgraded"
            );
        }

        Ok(LoadedCheckpoint {
            record,
            version,
            needs_upgrade,
        })
    }

    fn parse_and_resolve(&self, content: &str, format: Format, path: &Path) -> CompatResult<Value> {
        let value = parse_content(content, format, path)?;
        SymbolResolver::new(self.registry, self.config.max_depth).resolve(value, path)
    }
}
