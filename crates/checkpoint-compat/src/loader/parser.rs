//! Checkpoint document parsing for JSON and YAML
//!
//! Copyright (c) 2025 Checkpoint Compat Contributors
//! Licensed under the Apache-2.0 license

use crate::error::{CompatError, CompatResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Supported checkpoint document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml)
    Yaml,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> CompatResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| CompatError::unsupported_format(path.to_path_buf()))?;

        [Format::Json, Format::Yaml]
            .into_iter()
            .find(|format| format.extensions().contains(&extension.as_str()))
            .ok_or_else(|| CompatError::unsupported_format(path.to_path_buf()))
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yaml", "yml"],
        }
    }
}

/// Parse checkpoint content in the given format
pub fn parse_content(content: &str, format: Format, path: &Path) -> CompatResult<Value> {
    match format {
        Format::Json => parse_json(content, path),
        Format::Yaml => parse_yaml(content, path),
    }
}

fn parse_json(content: &str, path: &Path) -> CompatResult<Value> {
    serde_json::from_str(content).map_err(|e| CompatError::json_parse_error(path.to_path_buf(), e))
}

/// Parse YAML and convert it to the JSON value model
///
/// The conversion is lossy for non-finite floats: `.nan` and `.inf` become
/// `null`. Mappings with non-string keys have no JSON form and are rejected.
fn parse_yaml(content: &str, path: &Path) -> CompatResult<Value> {
    // Go through serde_yaml's own Value first so YAML errors keep their position
    let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| CompatError::yaml_parse_error(path.to_path_buf(), e))?;

    serde_json::to_value(yaml_value).map_err(|e| CompatError::yaml_convert_error(path.to_path_buf(), e))
}
