//! Resolution of legacy symbol references inside a decoded checkpoint
//!
//! A serialized callable appears in a checkpoint document as
//! `{"$symbol": "<qualified name>", "$arg": <value>}`. Resolution replaces the
//! object with the result of calling the registered shim on the resolved
//! argument. A missing `$arg` means `null`.
//!
//! Copyright (c) 2025 Checkpoint Compat Contributors
//! Licensed under the Apache-2.0 license

use crate::error::{CompatError, CompatResult};
use crate::legacy::registry::ShimRegistry;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// Key naming the symbol of a serialized callable
pub const SYMBOL_KEY: &str = "$symbol";

/// Key holding the argument of a serialized callable
pub const ARG_KEY: &str = "$arg";

/// Replaces symbol references with the output of their registered shims
#[derive(Debug)]
pub struct SymbolResolver<'r> {
    registry: &'r ShimRegistry,
    max_depth: usize,
}

impl<'r> SymbolResolver<'r> {
    /// Create a resolver that looks symbols up in `registry`
    pub fn new(registry: &'r ShimRegistry, max_depth: usize) -> Self {
        Self {
            registry,
            max_depth,
        }
    }

    /// Resolve every symbol reference in `value`
    pub fn resolve(&self, value: Value, path: &Path) -> CompatResult<Value> {
        self.resolve_at(value, path, 0)
    }

    fn resolve_at(&self, value: Value, path: &Path, depth: usize) -> CompatResult<Value> {
        if depth > self.max_depth {
            return Err(CompatError::depth_exceeded(path.to_path_buf(), self.max_depth));
        }

        match value {
            Value::Object(mut obj) => {
                if let Some(name) = symbol_name(&obj) {
                    let arg = obj.remove(ARG_KEY).unwrap_or(Value::Null);
                    let arg = self.resolve_at(arg, path, depth + 1)?;
                    debug!(symbol = %name, "Resolving legacy symbol reference");
                    return self.registry.call(&name, arg);
                }

                let resolved = obj
                    .into_iter()
                    .map(|(key, value)| -> CompatResult<(String, Value)> {
                        Ok((key, self.resolve_at(value, path, depth + 1)?))
                    })
                    .collect::<CompatResult<Map<String, Value>>>()?;
                Ok(Value::Object(resolved))
            }
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.resolve_at(item, path, depth + 1))
                .collect::<CompatResult<Vec<_>>>()
                .map(Value::Array),
            other => Ok(other),
        }
    }
}

/// The symbol name if `obj` is exactly a symbol reference
fn symbol_name(obj: &Map<String, Value>) -> Option<String> {
    let name = obj.get(SYMBOL_KEY)?.as_str()?;
    let only_reference_keys = obj.keys().all(|key| key == SYMBOL_KEY || key == ARG_KEY);
    only_reference_keys.then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver(registry: &ShimRegistry) -> SymbolResolver<'_> {
        SymbolResolver::new(registry, 16)
    }

    #[test]
    fn test_resolves_nested_references() {
        let registry = ShimRegistry::new();
        registry.install("fmt.upper", |v| json!(v.as_str().unwrap_or_default().to_uppercase()));

        let doc = json!({
            "hparams": {
                "gpus": {"$symbol": "fmt.upper", "$arg": "auto"},
                "layers": [{"$symbol": "fmt.upper", "$arg": "dense"}, 3]
            },
            "epoch": 1
        });

        let resolved = resolver(&registry).resolve(doc, Path::new("mem")).unwrap();
        assert_eq!(
            resolved,
            json!({"hparams": {"gpus": "AUTO", "layers": ["DENSE", 3]}, "epoch": 1})
        );
    }

    #[test]
    fn test_argument_resolved_first() {
        let registry = ShimRegistry::new();
        registry.install("wrap", |v| json!({ "wrapped": v }));

        let doc = json!({"$symbol": "wrap", "$arg": {"$symbol": "wrap", "$arg": 1}});
        let resolved = resolver(&registry).resolve(doc, Path::new("mem")).unwrap();
        assert_eq!(resolved, json!({"wrapped": {"wrapped": 1}}));
    }

    #[test]
    fn test_missing_arg_is_null() {
        let registry = ShimRegistry::new();
        registry.install("echo", |v| v);
        let resolved = resolver(&registry)
            .resolve(json!({"$symbol": "echo"}), Path::new("mem"))
            .unwrap();
        assert_eq!(resolved, Value::Null);
    }

    #[test]
    fn test_objects_with_extra_keys_are_plain_data() {
        let registry = ShimRegistry::new();
        let doc = json!({"$symbol": "not.a.call", "note": "kept"});
        let resolved = resolver(&registry).resolve(doc.clone(), Path::new("mem")).unwrap();
        assert_eq!(resolved, doc);
    }

    #[test]
    fn test_unknown_symbol_fails() {
        let registry = ShimRegistry::new();
        let err = resolver(&registry)
            .resolve(json!({"cb": {"$symbol": "gone.fn", "$arg": 1}}), Path::new("mem"))
            .unwrap_err();
        assert!(matches!(err, CompatError::UnresolvedSymbol { ref name } if name == "gone.fn"));
    }

    #[test]
    fn test_depth_limit() {
        let registry = ShimRegistry::new();
        let mut doc = json!(0);
        for _ in 0..10 {
            doc = json!([doc]);
        }

        let err = SymbolResolver::new(&registry, 4)
            .resolve(doc.clone(), Path::new("deep.json"))
            .unwrap_err();
        assert!(matches!(err, CompatError::DepthExceeded { max_depth: 4, .. }));

        assert!(SymbolResolver::new(&registry, 10).resolve(doc, Path::new("deep.json")).is_ok());
    }
}
