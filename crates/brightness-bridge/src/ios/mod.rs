// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS display bridge via objc2.
//
// Requires compilation with the iOS SDK (Xcode). iOS exposes a single
// brightness control, `UIScreen.mainScreen.brightness`, which is both the
// "window" and the "system" value; there is no public auto/manual mode and
// no permission gate.
//
// UIKit must be driven from the main thread. Off-main calls return
// `BrightnessError::Bridge` instead of touching UIScreen.

#![cfg(target_os = "ios")]

use objc2::MainThreadMarker;
use objc2::rc::Retained;
use objc2_ui_kit::UIScreen;

use brightness_core::BrightnessMode;
use brightness_core::error::{BrightnessError, Result};

use crate::traits::DisplayBackend;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Assert that we are on the main thread and return the marker.
fn require_main_thread() -> Result<MainThreadMarker> {
    MainThreadMarker::new()
        .ok_or_else(|| BrightnessError::Bridge("must be called from the main thread".into()))
}

/// `[UIScreen mainScreen]`
#[allow(deprecated)]
fn main_screen() -> Result<Retained<UIScreen>> {
    let mtm = require_main_thread()?;
    Ok(UIScreen::mainScreen(mtm))
}

fn read_brightness() -> Result<f64> {
    Ok(f64::from(main_screen()?.brightness()))
}

fn write_brightness(value: f64) -> Result<()> {
    main_screen()?.setBrightness(value as _);
    Ok(())
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// iOS implementation of the display backend.
pub struct IosBridge;

impl IosBridge {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IosBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBackend for IosBridge {
    fn platform_name(&self) -> &str {
        "iOS"
    }

    fn window_brightness(&self) -> Result<Option<f64>> {
        read_brightness().map(Some)
    }

    fn set_window_brightness(&self, value: f64) -> Result<()> {
        tracing::debug!(value, "iOS: setting UIScreen brightness");
        write_brightness(value)
    }

    fn system_brightness(&self) -> Result<f64> {
        read_brightness()
    }

    fn set_system_brightness(&self, value: f64) -> Result<()> {
        write_brightness(value)
    }

    fn system_brightness_mode(&self) -> Result<BrightnessMode> {
        Ok(BrightnessMode::Manual)
    }

    fn can_write_settings(&self) -> Result<bool> {
        Ok(true)
    }

    fn request_write_settings(&self) -> Result<bool> {
        Ok(true)
    }
}
