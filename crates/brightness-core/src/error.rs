// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the brightness module.

use thiserror::Error;

/// Top-level error type for all brightness operations.
#[derive(Debug, Error)]
pub enum BrightnessError {
    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("no activity available to apply window brightness")]
    NoActivity,

    #[error("permission to modify system settings was not granted")]
    PermissionDenied,

    // -- Input --
    #[error("invalid brightness value: {0}")]
    InvalidValue(f64),

    #[error("brightness listener ids exhausted")]
    ListenerIdsExhausted,

    // -- Runtime glue --
    #[error("runtime VM handle is null")]
    NullVm,

    #[error("no hybrid object registered under \"{0}\"")]
    UnknownHybridObject(String),

    #[error("hybrid object \"{0}\" is already registered")]
    DuplicateHybridObject(String),

    #[error("async runtime unavailable: {0}")]
    Runtime(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BrightnessError>;
