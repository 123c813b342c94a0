// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process-wide Tokio runtime for the module's asynchronous operations.
//
// Hosts await the module's futures from their own executors, so blocking
// platform work is spawned here rather than on an ambient runtime.

use std::sync::LazyLock;

use tokio::runtime::{Builder, Runtime};

use brightness_core::error::{BrightnessError, Result};

static RT: LazyLock<std::io::Result<Runtime>> = LazyLock::new(|| {
    Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("nitro-brightness")
        .enable_all()
        .build()
});

/// The shared runtime, started on first use.
pub(crate) fn runtime() -> Result<&'static Runtime> {
    RT.as_ref()
        .map_err(|e| BrightnessError::Runtime(format!("failed to start: {e}")))
}
