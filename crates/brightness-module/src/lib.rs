// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Brightness module: the `NitroBrightness` hybrid object and the one-time
// initialisation the native load hook delegates to.

pub mod module;
pub mod registry;
mod runtime;

use std::sync::{Arc, Mutex, OnceLock};

use brightness_core::error::{BrightnessError, Result};
use brightness_core::{BrightnessConfig, VmHandle};

pub use module::{HYBRID_OBJECT_NAME, NitroBrightness};
pub use registry::{HybridObject, create, create_hybrid_object, is_registered, register_hybrid_object};

/// Progress of module initialisation.
///
/// The platform attach step is recorded on its own: it may only ever run
/// once per process, even when a later step fails and `initialize` is retried.
struct Initializer {
    attached: OnceLock<()>,
    vm: Mutex<Option<VmHandle>>,
}

impl Initializer {
    const fn new() -> Self {
        Self {
            attached: OnceLock::new(),
            vm: Mutex::new(None),
        }
    }

    fn run(
        &self,
        vm: VmHandle,
        attach: impl FnOnce(VmHandle) -> Result<()>,
        register: impl FnOnce() -> Result<()>,
    ) -> Result<()> {
        if vm.is_null() {
            return Err(BrightnessError::NullVm);
        }

        let mut state = self.vm.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = *state {
            tracing::debug!(?existing, "brightness module already initialised");
            return Ok(());
        }

        if self.attached.get().is_none() {
            attach(vm)?;
            let _ = self.attached.set(());
        }

        register()?;

        *state = Some(vm);
        Ok(())
    }

    fn vm(&self) -> Option<VmHandle> {
        *self.vm.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

static INITIALIZER: Initializer = Initializer::new();

/// Initialise the brightness module for this process.
///
/// Records `vm`, attaches the platform bridge to it and registers the
/// `NitroBrightness` factory. Later calls are no-ops.
pub fn initialize(vm: VmHandle) -> Result<()> {
    INITIALIZER.run(vm, attach_platform, || {
        register_hybrid_object(HYBRID_OBJECT_NAME, || {
            let backend = Arc::from(brightness_bridge::platform_bridge());
            Ok(Arc::new(NitroBrightness::new(backend, BrightnessConfig::default()))
                as Arc<dyn HybridObject>)
        })?;
        tracing::info!(name = HYBRID_OBJECT_NAME, "brightness module initialised");
        Ok(())
    })
}

/// The VM handle recorded at initialisation, if any.
pub fn vm() -> Option<VmHandle> {
    INITIALIZER.vm()
}

#[cfg(target_os = "android")]
fn attach_platform(vm: VmHandle) -> Result<()> {
    brightness_bridge::android::install_context(vm)
}

#[cfg(not(target_os = "android"))]
fn attach_platform(_vm: VmHandle) -> Result<()> {
    Ok(())
}
