// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the brightness module.

use std::ffi::c_void;

use serde::{Deserialize, Serialize};

use crate::config::BrightnessConfig;
use crate::error::{BrightnessError, Result};

/// Opaque handle to the host runtime's `JavaVM`.
///
/// Received from the host at load time and forwarded unchanged. The pointee
/// is owned by the host and outlives the process-wide use we make of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VmHandle(*mut c_void);

// SAFETY: a `JavaVM*` is valid on every thread of the process per the JNI
// invocation API; the handle itself is never dereferenced here.
unsafe impl Send for VmHandle {}
unsafe impl Sync for VmHandle {}

impl VmHandle {
    pub fn from_raw(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

/// System brightness control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrightnessMode {
    /// The platform adjusts brightness from the ambient light sensor.
    Automatic,
    /// Brightness is fixed at the user's chosen level.
    Manual,
}

impl BrightnessMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Manual => "manual",
        }
    }
}

impl std::fmt::Display for BrightnessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier returned when a brightness listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Clamp `value` into the configured brightness range.
///
/// NaN has no position in the range and is rejected with `InvalidValue`.
pub fn clamp_brightness(value: f64, config: &BrightnessConfig) -> Result<f64> {
    if value.is_nan() {
        return Err(BrightnessError::InvalidValue(value));
    }
    Ok(value.clamp(config.min_brightness, config.max_brightness))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limits_to_range() {
        let config = BrightnessConfig::default();
        assert_eq!(clamp_brightness(1.7, &config).expect("clamp"), 1.0);
        assert_eq!(clamp_brightness(-0.2, &config).expect("clamp"), 0.0);
        assert_eq!(clamp_brightness(0.42, &config).expect("clamp"), 0.42);
        assert_eq!(clamp_brightness(f64::INFINITY, &config).expect("clamp"), 1.0);
    }

    #[test]
    fn clamp_rejects_nan() {
        let err = clamp_brightness(f64::NAN, &BrightnessConfig::default()).expect_err("nan");
        assert!(matches!(err, BrightnessError::InvalidValue(v) if v.is_nan()));
        assert_eq!(err.to_string(), "invalid brightness value: NaN");
    }

    #[test]
    fn mode_serializes_lowercase() {
        let json = serde_json::to_string(&BrightnessMode::Automatic).expect("serialize");
        assert_eq!(json, "\"automatic\"");
        assert_eq!(BrightnessMode::Manual.to_string(), "manual");
    }

    #[test]
    fn vm_handle_preserves_pointer() {
        let raw = 0x1000 as *mut c_void;
        let handle = VmHandle::from_raw(raw);
        assert_eq!(handle.as_ptr(), raw);
        assert!(!handle.is_null());
        assert!(VmHandle::from_raw(std::ptr::null_mut()).is_null());
    }
}
