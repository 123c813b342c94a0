// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process-wide registry of hybrid-object factories, keyed by name.
//
// Factories run outside the registry lock so a factory may itself consult
// the registry.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use brightness_core::error::{BrightnessError, Result};

/// A native object the host can instantiate by name.
pub trait HybridObject: Any + Send + Sync {
    /// Name the object is registered under.
    fn name(&self) -> &str;

    /// Release resources held on behalf of the host.
    fn dispose(&self);

    /// Upcast used for typed lookups through [`create`].
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

type Factory = Arc<dyn Fn() -> Result<Arc<dyn HybridObject>> + Send + Sync>;

static REGISTRY: LazyLock<Mutex<HashMap<String, Factory>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn registry() -> MutexGuard<'static, HashMap<String, Factory>> {
    REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Register `factory` under `name`. Names are unique for the process lifetime.
pub fn register_hybrid_object<F>(name: &str, factory: F) -> Result<()>
where
    F: Fn() -> Result<Arc<dyn HybridObject>> + Send + Sync + 'static,
{
    let mut factories = registry();
    if factories.contains_key(name) {
        return Err(BrightnessError::DuplicateHybridObject(name.to_owned()));
    }
    factories.insert(name.to_owned(), Arc::new(factory));
    tracing::debug!(name, "hybrid object registered");
    Ok(())
}

pub fn is_registered(name: &str) -> bool {
    registry().contains_key(name)
}

/// Instantiate the hybrid object registered under `name`.
pub fn create_hybrid_object(name: &str) -> Result<Arc<dyn HybridObject>> {
    let factory = registry()
        .get(name)
        .cloned()
        .ok_or_else(|| BrightnessError::UnknownHybridObject(name.to_owned()))?;
    factory()
}

/// Typed variant of [`create_hybrid_object`].
pub fn create<T: HybridObject>(name: &str) -> Result<Arc<T>> {
    create_hybrid_object(name)?
        .into_any()
        .downcast::<T>()
        .map_err(|_| {
            BrightnessError::UnknownHybridObject(format!(
                "{name} (as {})",
                std::any::type_name::<T>()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Sample {
        disposed: AtomicUsize,
    }

    impl HybridObject for Sample {
        fn name(&self) -> &str {
            "Sample"
        }

        fn dispose(&self) {
            self.disposed.fetch_add(1, Ordering::SeqCst);
        }

        fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    struct Other;

    impl HybridObject for Other {
        fn name(&self) -> &str {
            "Other"
        }

        fn dispose(&self) {}

        fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    fn sample_factory() -> Result<Arc<dyn HybridObject>> {
        Ok(Arc::new(Sample {
            disposed: AtomicUsize::new(0),
        }))
    }

    #[test]
    fn register_and_create() {
        register_hybrid_object("registry-test-sample", sample_factory).expect("register");
        assert!(is_registered("registry-test-sample"));

        let object = create_hybrid_object("registry-test-sample").expect("create");
        assert_eq!(object.name(), "Sample");
    }

    #[test]
    fn each_create_builds_a_fresh_instance() {
        register_hybrid_object("registry-test-fresh", sample_factory).expect("register");

        let a = create::<Sample>("registry-test-fresh").expect("create a");
        let b = create::<Sample>("registry-test-fresh").expect("create b");
        a.dispose();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.disposed.load(Ordering::SeqCst), 1);
        assert_eq!(b.disposed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        register_hybrid_object("registry-test-dup", sample_factory).expect("register");
        let err = register_hybrid_object("registry-test-dup", sample_factory).expect_err("duplicate");
        assert!(matches!(err, BrightnessError::DuplicateHybridObject(ref n) if n == "registry-test-dup"));
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = create_hybrid_object("registry-test-missing").err().expect("missing");
        assert!(matches!(err, BrightnessError::UnknownHybridObject(_)));
    }

    #[test]
    fn typed_create_rejects_wrong_type() {
        register_hybrid_object("registry-test-typed", || Ok(Arc::new(Other) as Arc<dyn HybridObject>))
            .expect("register");
        let result = create::<Sample>("registry-test-typed");
        assert!(matches!(result, Err(BrightnessError::UnknownHybridObject(_))));
    }
}
