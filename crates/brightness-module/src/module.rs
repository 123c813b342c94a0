// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The `NitroBrightness` hybrid object.
//
// Every host-facing operation is infallible: backend errors are logged and
// replaced with a fallback value so the managed caller never sees a native
// error for a brightness query.

use std::any::Any;
use std::sync::Arc;

use brightness_bridge::DisplayBackend;
use brightness_core::error::Result;
use brightness_core::listeners::BrightnessListener;
use brightness_core::{BrightnessConfig, BrightnessMode, ListenerId, ListenerRegistry, clamp_brightness};

use crate::registry::HybridObject;

/// Name the host uses to instantiate this object.
pub const HYBRID_OBJECT_NAME: &str = "NitroBrightness";

/// Brightness control surface exposed to the host runtime.
pub struct NitroBrightness {
    backend: Arc<dyn DisplayBackend>,
    config: BrightnessConfig,
    /// System brightness when the object was created; target of `restore_system_brightness`.
    original_brightness: f64,
    listeners: ListenerRegistry,
}

impl NitroBrightness {
    pub fn new(backend: Arc<dyn DisplayBackend>, config: BrightnessConfig) -> Self {
        let original_brightness = match backend.system_brightness() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "failed to get original brightness");
                config.default_brightness()
            }
        };

        tracing::debug!(
            platform = backend.platform_name(),
            original_brightness,
            "NitroBrightness created"
        );

        Self {
            backend,
            config,
            original_brightness,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn original_brightness(&self) -> f64 {
        self.original_brightness
    }

    // -- Listener management --------------------------------------------------

    pub fn add_brightness_listener(&self, listener: BrightnessListener) -> Result<ListenerId> {
        self.listeners.add(listener)
    }

    pub fn remove_brightness_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // -- Brightness queries ---------------------------------------------------

    /// Effective brightness of the app: the window override when one is set,
    /// otherwise the system brightness. `-1.0` if the window cannot be read.
    pub fn get_brightness(&self) -> f64 {
        match self.backend.window_brightness() {
            Ok(Some(value)) if value >= 0.0 => value,
            Ok(_) => self.get_system_brightness(),
            Err(e) => {
                tracing::error!(error = %e, "error getting brightness");
                -1.0
            }
        }
    }

    pub fn get_brightness_permissions(&self) -> bool {
        self.backend.can_write_settings().unwrap_or_else(|e| {
            tracing::error!(error = %e, "error checking brightness permissions");
            false
        })
    }

    /// Ask for permission to modify system settings, launching the platform's
    /// settings screen when it is missing. Resolves to the permission state
    /// once the request has been dispatched.
    ///
    /// The blocking platform work runs on the module's own runtime, so the
    /// future can be awaited from any executor.
    pub async fn request_brightness_permissions(&self) -> bool {
        let runtime = match crate::runtime::runtime() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!(error = %e, "error requesting brightness permissions");
                return false;
            }
        };

        let backend = Arc::clone(&self.backend);
        let outcome = runtime
            .spawn_blocking(move || -> Result<bool> {
                if !backend.can_write_settings()? {
                    backend.request_write_settings()?;
                }
                backend.can_write_settings()
            })
            .await;

        match outcome {
            Ok(Ok(granted)) => granted,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "error requesting brightness permissions");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "brightness permission task failed");
                false
            }
        }
    }

    pub fn get_system_brightness(&self) -> f64 {
        self.backend.system_brightness().unwrap_or_else(|e| {
            tracing::error!(error = %e, "error getting system brightness");
            self.config.default_brightness()
        })
    }

    pub fn get_system_brightness_mode(&self) -> BrightnessMode {
        self.backend.system_brightness_mode().unwrap_or_else(|e| {
            tracing::error!(error = %e, "error getting brightness mode");
            BrightnessMode::Manual
        })
    }

    pub fn is_available(&self) -> bool {
        true
    }

    // -- Brightness control ---------------------------------------------------

    pub fn restore_system_brightness(&self) {
        self.set_system_brightness(self.original_brightness);
    }

    /// Override the brightness of the app's window only.
    pub fn set_brightness(&self, value: f64) {
        let clamped = match clamp_brightness(value, &self.config) {
            Ok(clamped) => clamped,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring window brightness");
                return;
            }
        };

        match self.backend.set_window_brightness(clamped) {
            Ok(()) => self.listeners.notify(clamped),
            Err(e) => tracing::error!(error = %e, value = clamped, "error setting window brightness"),
        }
    }

    /// Change the system-wide brightness. Requires the write-settings permission.
    pub fn set_system_brightness(&self, value: f64) {
        let clamped = match clamp_brightness(value, &self.config) {
            Ok(clamped) => clamped,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring system brightness");
                return;
            }
        };

        if !self.get_brightness_permissions() {
            tracing::warn!("no permission to set system brightness");
            return;
        }

        match self.backend.set_system_brightness(clamped) {
            Ok(()) => self.listeners.notify(clamped),
            Err(e) => tracing::error!(error = %e, value = clamped, "error setting system brightness"),
        }
    }
}

impl HybridObject for NitroBrightness {
    fn name(&self) -> &str {
        HYBRID_OBJECT_NAME
    }

    fn dispose(&self) {
        self.listeners.clear();
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
