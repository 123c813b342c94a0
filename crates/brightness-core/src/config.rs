// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Module configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunables for brightness conversion and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrightnessConfig {
    /// Lower bound for normalised brightness values.
    pub min_brightness: f64,
    /// Upper bound for normalised brightness values.
    pub max_brightness: f64,
    /// Raw system brightness assumed when the platform setting is unreadable.
    pub default_raw_brightness: u32,
    /// Platform units per 1.0 of normalised brightness (Android uses 0..=255).
    pub brightness_scale: f64,
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl BrightnessConfig {
    /// Parse a (possibly partial) JSON document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Normalised brightness corresponding to `default_raw_brightness`.
    pub fn default_brightness(&self) -> f64 {
        self.raw_to_level(self.default_raw_brightness as i32)
    }

    /// Convert a raw platform value into the normalised range.
    pub fn raw_to_level(&self, raw: i32) -> f64 {
        raw as f64 / self.brightness_scale
    }

    /// Convert a normalised value into raw platform units (truncating, as the platform does).
    pub fn level_to_raw(&self, level: f64) -> i32 {
        (level * self.brightness_scale) as i32
    }
}

impl Default for BrightnessConfig {
    fn default() -> Self {
        Self {
            min_brightness: 0.0,
            max_brightness: 1.0,
            default_raw_brightness: 128,
            brightness_scale: 255.0,
            log_filter: "info".into(),
        }
    }
}
