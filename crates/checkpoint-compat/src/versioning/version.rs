//! Release version parsing and ordering
//!
//! Copyright (c) 2025 Checkpoint Compat Contributors
//! Licensed under the Apache-2.0 license

use crate::error::{CompatError, CompatResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dotted numeric release identifier such as `1.2.8` or `1.10`
///
/// Ordering compares components numerically from the left. When one version
/// is a prefix of the other the shorter one sorts first, so `1.2 < 1.2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReleaseVersion {
    components: Vec<u64>,
}

impl ReleaseVersion {
    /// Create a version from its numeric components
    pub fn new(components: impl Into<Vec<u64>>) -> CompatResult<Self> {
        let components = components.into();
        if components.is_empty() {
            return Err(CompatError::invalid_version("", "version has no components"));
        }
        Ok(Self { components })
    }

    /// Parse a version string
    pub fn parse(version_str: &str) -> CompatResult<Self> {
        // Remove 'v' prefix if present
        let digits = version_str.strip_prefix('v').unwrap_or(version_str);

        if digits.is_empty() {
            return Err(CompatError::invalid_version(version_str, "empty version string"));
        }

        let components = digits
            .split('.')
            .map(|part| parse_component(version_str, part))
            .collect::<CompatResult<Vec<_>>>()?;

        Ok(Self { components })
    }

    /// Numeric components, most significant first
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// First component
    pub fn major(&self) -> u64 {
        self.components[0]
    }

    /// Second component, zero when absent
    pub fn minor(&self) -> u64 {
        self.components.get(1).copied().unwrap_or(0)
    }

    /// Third component, zero when absent
    pub fn patch(&self) -> u64 {
        self.components.get(2).copied().unwrap_or(0)
    }
}

fn parse_component(version_str: &str, part: &str) -> CompatResult<u64> {
    if part.is_empty() {
        return Err(CompatError::invalid_version(version_str, "empty component"));
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CompatError::invalid_version(
            version_str,
            format!("component '{}' is not numeric", part),
        ));
    }
    part.parse().map_err(|_| {
        CompatError::invalid_version(version_str, format!("component '{}' is out of range", part))
    })
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut components = self.components.iter();
        if let Some(first) = components.next() {
            write!(f, "{}", first)?;
        }
        for component in components {
            write!(f, ".{}", component)?;
        }
        Ok(())
    }
}

impl FromStr for ReleaseVersion {
    type Err = CompatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ReleaseVersion {
    type Error = CompatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReleaseVersion> for String {
    fn from(version: ReleaseVersion) -> Self {
        version.to_string()
    }
}
