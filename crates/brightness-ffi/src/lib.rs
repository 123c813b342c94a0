// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native load hook for the brightness module.
//
// The host runtime calls `JNI_OnLoad` once when `libnitrobrightness.so` is
// loaded. The hook hands the VM to the binding layer, which runs the
// brightness module's initialisation exactly once and reports the JNI
// version back to the host. Nothing is decided or stored here.

pub mod binding;
pub mod logging;

use std::ffi::c_void;

use jni::sys::jint;

use brightness_core::VmHandle;
use brightness_core::error::Result;

use binding::{BindingLayer, JniBinding};

/// Pass `vm` to `layer` with a routine that calls `module_init(vm)`.
///
/// Returns whatever the layer returns. `_reserved` is part of the host's
/// load-call signature and carries no meaning.
pub fn on_load<L, F>(layer: &L, vm: VmHandle, _reserved: *mut c_void, module_init: F) -> jint
where
    L: BindingLayer,
    F: FnOnce(VmHandle) -> Result<()>,
{
    layer.initialize(vm, move || module_init(vm))
}

/// Entry point invoked by the JVM / ART on `System.loadLibrary`.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "system" fn JNI_OnLoad(vm: *mut jni::sys::JavaVM, reserved: *mut c_void) -> jint {
    on_load(
        &JniBinding::new(),
        VmHandle::from_raw(vm.cast()),
        reserved,
        brightness_module::initialize,
    )
}
