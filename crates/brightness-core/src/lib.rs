// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core types, errors and the listener registry shared by every brightness crate.

pub mod config;
pub mod error;
pub mod listeners;
pub mod types;

pub use config::BrightnessConfig;
pub use error::BrightnessError;
pub use listeners::ListenerRegistry;
pub use types::*;
