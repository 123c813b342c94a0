// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where native mobile APIs are unavailable.
//
// Desktop operating systems expose no portable brightness API, so the stub
// simulates one display in memory. It behaves like a device where the app
// already holds the write-settings permission; tests flip that and the other
// knobs through the `with_*`/`set_*` helpers.

use std::sync::{Mutex, MutexGuard};

use brightness_core::BrightnessMode;
use brightness_core::error::{BrightnessError, Result};

use crate::traits::DisplayBackend;

#[derive(Debug, Clone)]
struct DisplayState {
    window: Option<f64>,
    system: f64,
    mode: BrightnessMode,
    writable: bool,
    /// Whether a settings request grants the permission.
    grant_on_request: bool,
    permission_requests: usize,
    has_window: bool,
}

/// In-memory display returned on non-mobile platforms.
pub struct StubBridge {
    state: Mutex<DisplayState>,
}

impl StubBridge {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DisplayState {
                window: None,
                system: 0.5,
                mode: BrightnessMode::Manual,
                writable: true,
                grant_on_request: true,
                permission_requests: 0,
                has_window: true,
            }),
        }
    }

    pub fn with_system_brightness(self, value: f64) -> Self {
        self.state().system = value;
        self
    }

    pub fn with_mode(self, mode: BrightnessMode) -> Self {
        self.state().mode = mode;
        self
    }

    /// Start without the write-settings permission. `grant_on_request`
    /// controls whether a later request succeeds.
    pub fn without_write_permission(self, grant_on_request: bool) -> Self {
        {
            let mut state = self.state();
            state.writable = false;
            state.grant_on_request = grant_on_request;
        }
        self
    }

    /// Simulate a process with no foreground window (e.g. a background service).
    pub fn without_window(self) -> Self {
        self.state().has_window = false;
        self
    }

    /// Change the system brightness behind the module's back, as the user
    /// would from the quick-settings shade.
    pub fn set_external_system_brightness(&self, value: f64) {
        self.state().system = value;
    }

    pub fn permission_requests(&self) -> usize {
        self.state().permission_requests
    }

    fn state(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for StubBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBackend for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn window_brightness(&self) -> Result<Option<f64>> {
        let state = self.state();
        Ok(if state.has_window { state.window } else { None })
    }

    fn set_window_brightness(&self, value: f64) -> Result<()> {
        let mut state = self.state();
        if !state.has_window {
            tracing::warn!("StubBridge::set_window_brightness called without a window");
            return Err(BrightnessError::NoActivity);
        }
        state.window = Some(value);
        Ok(())
    }

    fn system_brightness(&self) -> Result<f64> {
        Ok(self.state().system)
    }

    fn set_system_brightness(&self, value: f64) -> Result<()> {
        let mut state = self.state();
        if !state.writable {
            return Err(BrightnessError::PermissionDenied);
        }
        state.system = value;
        Ok(())
    }

    fn system_brightness_mode(&self) -> Result<BrightnessMode> {
        Ok(self.state().mode)
    }

    fn can_write_settings(&self) -> Result<bool> {
        Ok(self.state().writable)
    }

    fn request_write_settings(&self) -> Result<bool> {
        let mut state = self.state();
        state.permission_requests += 1;
        if state.grant_on_request {
            state.writable = true;
        }
        tracing::info!(granted = state.writable, "StubBridge: simulated write-settings request");
        Ok(state.writable)
    }
}
