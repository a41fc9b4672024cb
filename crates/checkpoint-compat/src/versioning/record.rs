//! Version accessors and the upgrade predicate for checkpoint records
//!
//! Copyright (c) 2025 Checkpoint Compat Contributors
//! Licensed under the Apache-2.0 license

use crate::error::{CompatError, CompatResult};
use crate::versioning::version::ReleaseVersion;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Key under which a checkpoint stores the release that wrote it
pub const VERSION_KEY: &str = "pytorch-lightning_version";

/// A string-keyed mapping that holds a checkpoint's top-level fields
///
/// Implemented for the map types a decoded checkpoint usually arrives in.
pub trait CheckpointRecord {
    /// Look up a top-level field
    fn field(&self, key: &str) -> Option<&Value>;

    /// Insert or overwrite a top-level field
    fn set_field(&mut self, key: &str, value: Value);
}

impl CheckpointRecord for Map<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn set_field(&mut self, key: &str, value: Value) {
        self.insert(key.to_string(), value);
    }
}

impl<S: BuildHasher> CheckpointRecord for HashMap<String, Value, S> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn set_field(&mut self, key: &str, value: Value) {
        self.insert(key.to_string(), value);
    }
}

impl CheckpointRecord for BTreeMap<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn set_field(&mut self, key: &str, value: Value) {
        self.insert(key.to_string(), value);
    }
}

/// Get the version of a checkpoint
pub fn get_version<R: CheckpointRecord + ?Sized>(record: &R) -> CompatResult<String> {
    match record.field(VERSION_KEY) {
        Some(Value::String(version)) => Ok(version.clone()),
        Some(other) => Err(CompatError::invalid_field_type(VERSION_KEY, other)),
        None => Err(CompatError::missing_field(VERSION_KEY)),
    }
}

/// Set the version of a checkpoint
///
/// The value is written as given; it is only parsed when compared.
pub fn set_version<R: CheckpointRecord + ?Sized>(record: &mut R, version: impl Into<String>) {
    record.set_field(VERSION_KEY, Value::String(version.into()));
}

/// Whether a checkpoint was written by a release older than `target`
pub fn should_upgrade<R: CheckpointRecord + ?Sized>(record: &R, target: &str) -> CompatResult<bool> {
    let current = ReleaseVersion::parse(&get_version(record)?)?;
    let target = ReleaseVersion::parse(target)?;
    Ok(current < target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(version: &str) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert(VERSION_KEY.to_string(), json!(version));
        record.insert("epoch".to_string(), json!(3));
        record
    }

    #[test]
    fn test_get_version() {
        assert_eq!(get_version(&record("1.2.7")).unwrap(), "1.2.7");
    }

    #[test]
    fn test_get_version_missing() {
        let err = get_version(&Map::new()).unwrap_err();
        assert!(matches!(err, CompatError::MissingField { ref key } if key == VERSION_KEY));
    }

    #[test]
    fn test_get_version_wrong_type() {
        let mut record = Map::new();
        record.insert(VERSION_KEY.to_string(), json!(1.2));
        let err = get_version(&record).unwrap_err();
        assert!(matches!(err, CompatError::InvalidFieldType { found: "a number", .. }));
    }

    #[test]
    fn test_set_version_overwrites_only_version() {
        let mut record = record("1.0.0");
        set_version(&mut record, "1.3.0");
        assert_eq!(get_version(&record).unwrap(), "1.3.0");
        assert_eq!(record["epoch"], json!(3));

        // no validation on write
        set_version(&mut record, "not-a-version");
        assert_eq!(get_version(&record).unwrap(), "not-a-version");
    }

    #[test]
    fn test_accessors_on_other_maps() {
        let mut hashed: HashMap<String, Value> = HashMap::new();
        set_version(&mut hashed, "1.1.0");
        assert_eq!(get_version(&hashed).unwrap(), "1.1.0");

        let mut ordered: BTreeMap<String, Value> = BTreeMap::new();
        set_version(&mut ordered, "1.4.2");
        assert!(should_upgrade(&ordered, "1.5").unwrap());
    }

    #[test]
    fn test_should_upgrade() {
        assert!(should_upgrade(&record("1.2.8"), "1.3.0").unwrap());
        assert!(!should_upgrade(&record("1.3.0"), "1.2.8").unwrap());
        assert!(should_upgrade(&record("1.2"), "1.10").unwrap());
        assert!(!should_upgrade(&record("1.10"), "1.2").unwrap());
        assert!(!should_upgrade(&record("1.2.8"), "1.2.8").unwrap());
    }

    #[test]
    fn test_should_upgrade_errors() {
        let err = should_upgrade(&Map::new(), "1.0.0").unwrap_err();
        assert!(matches!(err, CompatError::MissingField { .. }));

        let err = should_upgrade(&record("1.x"), "1.0.0").unwrap_err();
        assert!(matches!(err, CompatError::InvalidVersion { ref version, .. } if version == "1.x"));

        let err = should_upgrade(&record("1.0.0"), "").unwrap_err();
        assert!(matches!(err, CompatError::InvalidVersion { .. }));
    }
}
