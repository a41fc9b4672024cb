//! Error types for checkpoint compatibility operations
//!
//! Copyright (c) 2025 Checkpoint Compat Contributors
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for checkpoint compatibility operations
pub type CompatResult<T> = Result<T, CompatError>;

/// Errors raised while reading versions, resolving legacy symbols or loading checkpoints
#[derive(Error, Debug)]
pub enum CompatError {
    /// A required field is absent from the checkpoint record
    #[error("Checkpoint is missing required field '{key}'")]
    MissingField { key: String },

    /// A field is present but holds the wrong kind of value
    #[error("Checkpoint field '{key}' must be a string, found {found}")]
    InvalidFieldType { key: String, found: &'static str },

    /// A version string could not be parsed
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// A serialized callable references a symbol nothing has registered
    #[error("Unresolved legacy symbol '{name}'")]
    UnresolvedSymbol { name: String },

    /// File I/O errors
    #[error("Failed to read checkpoint '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON parsing errors
    #[error("Failed to parse JSON checkpoint '{path}': {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("Failed to parse YAML checkpoint '{path}': {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A YAML document has no equivalent in the JSON value model
    #[error("Failed to convert YAML checkpoint '{path}' into a record: {source}")]
    YamlConvert {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Unsupported file format
    #[error("Unsupported checkpoint format for '{path}'. Expected .json, .yaml, or .yml")]
    UnsupportedFormat { path: PathBuf },

    /// The decoded document is not a mapping
    #[error("Checkpoint '{path}' must be a mapping at the root level, found {found}")]
    NotARecord { path: PathBuf, found: &'static str },

    /// Symbol resolution nested deeper than allowed
    #[error("Symbol resolution in '{path}' exceeded the maximum depth of {max_depth}")]
    DepthExceeded { path: PathBuf, max_depth: usize },
}

impl CompatError {
    /// Create a missing field error
    pub fn missing_field(key: impl Into<String>) -> Self {
        Self::MissingField { key: key.into() }
    }

    /// Create a field type error from the offending value
    pub fn invalid_field_type(key: impl Into<String>, value: &Value) -> Self {
        Self::InvalidFieldType {
            key: key.into(),
            found: value_kind(value),
        }
    }

    /// Create a version parse error
    pub fn invalid_version(version: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
            reason: reason.into(),
        }
    }

    /// Create an unresolved symbol error
    pub fn unresolved_symbol(name: impl Into<String>) -> Self {
        Self::UnresolvedSymbol { name: name.into() }
    }

    /// Create an I/O error with path context
    pub fn io_error(path: PathBuf, error: std::io::Error) -> Self {
        Self::Io {
            path,
            source: error,
        }
    }

    /// Create a JSON parsing error with path context
    pub fn json_parse_error(path: PathBuf, error: serde_json::Error) -> Self {
        Self::JsonParse {
            path,
            source: error,
        }
    }

    /// Create a YAML parsing error with path context
    pub fn yaml_parse_error(path: PathBuf, error: serde_yaml::Error) -> Self {
        Self::YamlParse {
            path,
            source: error,
        }
    }

    /// Create a YAML conversion error with path context
    pub fn yaml_convert_error(path: PathBuf, error: serde_json::Error) -> Self {
        Self::YamlConvert {
            path,
            source: error,
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(path: PathBuf) -> Self {
        Self::UnsupportedFormat { path }
    }

    /// Create a root-shape error from the decoded value
    pub fn not_a_record(path: PathBuf, value: &Value) -> Self {
        Self::NotARecord {
            path,
            found: value_kind(value),
        }
    }

    /// Create a depth error
    pub fn depth_exceeded(path: PathBuf, max_depth: usize) -> Self {
        Self::DepthExceeded { path, max_depth }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::JsonParse { path, .. } => Some(path),
            Self::YamlParse { path, .. } => Some(path),
            Self::YamlConvert { path, .. } => Some(path),
            Self::UnsupportedFormat { path } => Some(path),
            Self::NotARecord { path, .. } => Some(path),
            Self::DepthExceeded { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Short name for the kind of a JSON value, used in error messages
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_creation() {
        let path = PathBuf::from("epoch=3.ckpt.json");

        let io_err = CompatError::io_error(
            path.clone(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "File not found"),
        );
        assert!(matches!(io_err, CompatError::Io { .. }));
        assert_eq!(io_err.path(), Some(&path));

        let missing = CompatError::missing_field("pytorch-lightning_version");
        assert_eq!(missing.path(), None);
        assert_eq!(
            missing.to_string(),
            "Checkpoint is missing required field 'pytorch-lightning_version'"
        );
    }

    #[test]
    fn test_field_type_message() {
        let err = CompatError::invalid_field_type("version", &json!(1.5));
        assert_eq!(
            err.to_string(),
            "Checkpoint field 'version' must be a string, found a number"
        );

        let err = CompatError::not_a_record(PathBuf::from("a.json"), &json!([1, 2]));
        assert!(err.to_string().contains("found an array"));
    }
}
