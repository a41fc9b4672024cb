//! Tests for the legacy patch guard against the process-wide registry
//!
//! The global registry is shared by every test in this binary, so each test
//! holds `GLOBAL_LOCK` while it touches it.

use checkpoint_compat::legacy::{legacy_shims, GPUS_ARG_DEFAULT};
use checkpoint_compat::{with_legacy_patch, CompatError, CompatResult, LegacyPatch, ShimRegistry};
use serde_json::json;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard, PoisonError};

static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

fn lock_global() -> MutexGuard<'static, ()> {
    GLOBAL_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

#[test]
fn test_entry_installs_and_exit_removes() {
    let _lock = lock_global();
    let registry = ShimRegistry::global();
    assert!(registry.resolve(GPUS_ARG_DEFAULT).is_none());

    {
        let _patch = LegacyPatch::enter();
        let shim = registry.resolve(GPUS_ARG_DEFAULT).expect("shim installed");
        assert_eq!(shim(json!([0, 1])), json!([0, 1]));
    }

    assert!(registry.resolve(GPUS_ARG_DEFAULT).is_none());
    let err = registry.call(GPUS_ARG_DEFAULT, json!(1)).unwrap_err();
    assert!(matches!(err, CompatError::UnresolvedSymbol { .. }));
}

#[test]
fn test_every_catalogued_shim_is_installed() {
    let _lock = lock_global();
    with_legacy_patch(|| {
        for shim in legacy_shims() {
            assert!(ShimRegistry::global().contains(shim.name), "{} missing", shim.name);
        }
    });
    for shim in legacy_shims() {
        assert!(!ShimRegistry::global().contains(shim.name));
    }
}

#[test]
fn test_body_error_reaches_caller() {
    let _lock = lock_global();

    fn load_corrupt() -> CompatResult<()> {
        let _patch = LegacyPatch::enter();
        Err(CompatError::missing_field("state_dict"))
    }

    let err = load_corrupt().unwrap_err();
    assert!(matches!(err, CompatError::MissingField { ref key } if key == "state_dict"));
    assert!(!ShimRegistry::global().contains(GPUS_ARG_DEFAULT));
}

#[test]
fn test_panic_inside_scope_is_not_replaced() {
    let _lock = lock_global();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        with_legacy_patch(|| {
            assert!(ShimRegistry::global().contains(GPUS_ARG_DEFAULT));
            panic!("unpickling failed");
        })
    }));

    let payload = outcome.expect_err("body panicked");
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"unpickling failed"));
    assert!(!ShimRegistry::global().contains(GPUS_ARG_DEFAULT));
}

#[test]
fn test_repeated_entry_has_no_leakage() {
    let _lock = lock_global();
    let registry = ShimRegistry::global();

    for _ in 0..5 {
        let before = registry.names();
        let during = with_legacy_patch(|| registry.names());
        let after = registry.names();

        assert!(during.iter().any(|name| name == GPUS_ARG_DEFAULT));
        assert_eq!(before, after);
    }
}
