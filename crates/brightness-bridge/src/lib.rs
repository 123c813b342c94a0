// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native display bridge abstractions.
//
// Defines the `DisplayBackend` trait and picks the implementation for the
// target OS: Android (ART via JNI), iOS (UIKit via objc2) or an in-memory
// simulated display for desktop and CI builds.

pub mod traits;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub mod stub;

pub use traits::DisplayBackend;

/// Returns the display backend for the target operating system.
pub fn platform_bridge() -> Box<dyn DisplayBackend> {
    #[cfg(target_os = "ios")]
    {
        // iOS: UIScreen brightness through objc2 message sends.
        Box::new(ios::IosBridge::new())
    }
    #[cfg(target_os = "android")]
    {
        // Android: Settings.System and the Activity window through jni-rs.
        Box::new(android::AndroidBridge::new())
    }
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    {
        // DESKTOP/CI: simulated display so non-native builds behave sensibly.
        Box::new(stub::StubBridge::new())
    }
}
