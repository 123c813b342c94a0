// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait for native display control.
//
// All brightness values crossing this trait are normalised to 0.0..=1.0;
// platform modules convert to and from their native units.

use brightness_core::BrightnessMode;
use brightness_core::error::Result;

/// Access to the screen brightness controls of the host platform.
pub trait DisplayBackend: Send + Sync {
    /// Human-readable platform name (e.g. "Android", "iOS").
    fn platform_name(&self) -> &str;

    /// Brightness override applied to the foreground window.
    ///
    /// Returns `Ok(None)` when the window follows the system brightness or
    /// there is no foreground window.
    fn window_brightness(&self) -> Result<Option<f64>>;

    /// Apply a brightness override to the foreground window only.
    fn set_window_brightness(&self, value: f64) -> Result<()>;

    /// Current system-wide brightness.
    fn system_brightness(&self) -> Result<f64>;

    /// Persist a new system-wide brightness. Callers check
    /// [`can_write_settings`](Self::can_write_settings) first.
    fn set_system_brightness(&self, value: f64) -> Result<()>;

    /// Whether the platform adjusts brightness automatically.
    fn system_brightness_mode(&self) -> Result<BrightnessMode>;

    /// Whether this process may modify system settings.
    fn can_write_settings(&self) -> Result<bool>;

    /// Ask the user for permission to modify system settings.
    ///
    /// May only launch a settings screen; the returned flag reflects the
    /// permission state at the time of return.
    fn request_write_settings(&self) -> Result<bool>;
}
