// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binding layer between the host JVM and native code.
//
// `JniBinding` owns the process-wide `JavaVM`, runs the caller's one-time
// initialisation and turns a failure into a pending Java exception, so the
// host sees `System.loadLibrary` throw rather than a native abort.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::OnceLock;

use jni::JavaVM;
use jni::sys::{JNI_ERR, JNI_VERSION_1_6, jint};

use brightness_core::error::Result;
use brightness_core::{BrightnessConfig, VmHandle};

use crate::logging;

/// Exception class raised when module initialisation fails.
const INIT_EXCEPTION_CLASS: &str = "java/lang/RuntimeException";

static JAVA_VM: OnceLock<JavaVM> = OnceLock::new();

/// A layer that can be initialised with the host VM and a one-time routine.
pub trait BindingLayer {
    /// Set the layer up for `vm`, run `init`, and return the JNI version the
    /// library requires (or `JNI_ERR`).
    fn initialize<F>(&self, vm: VmHandle, init: F) -> jint
    where
        F: FnOnce() -> Result<()>;
}

/// The JNI-backed binding layer used by `JNI_OnLoad`.
pub struct JniBinding {
    config: BrightnessConfig,
}

impl JniBinding {
    pub fn new() -> Self {
        Self::with_config(BrightnessConfig::default())
    }

    pub fn with_config(config: BrightnessConfig) -> Self {
        Self { config }
    }
}

impl Default for JniBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingLayer for JniBinding {
    fn initialize<F>(&self, vm: VmHandle, init: F) -> jint
    where
        F: FnOnce() -> Result<()>,
    {
        logging::init(&self.config.log_filter);

        // SAFETY: the pointer comes straight from the host's load call;
        // `from_raw` only checks it for null.
        let java_vm = match unsafe { JavaVM::from_raw(vm.as_ptr().cast()) } {
            Ok(java_vm) => java_vm,
            Err(e) => {
                tracing::error!(error = %e, "invalid JavaVM handle at load time");
                return JNI_ERR;
            }
        };
        let java_vm = JAVA_VM.get_or_init(|| java_vm);

        let failure = match catch_unwind(AssertUnwindSafe(init)) {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(payload) => Some(format!("panic: {}", panic_message(payload.as_ref()))),
        };

        if let Some(message) = failure {
            tracing::error!(%message, "native module initialisation failed");
            raise_java_exception(java_vm, &message);
        }

        JNI_VERSION_1_6
    }
}

/// The VM stored by the first successful load, if any.
pub fn java_vm() -> Option<&'static JavaVM> {
    JAVA_VM.get()
}

fn raise_java_exception(java_vm: &JavaVM, message: &str) {
    let mut env = match java_vm.get_env() {
        Ok(env) => env,
        Err(e) => {
            tracing::error!(error = %e, "cannot raise Java exception: no JNI env on this thread");
            return;
        }
    };
    if let Err(e) = env.throw_new(INIT_EXCEPTION_CLASS, message) {
        tracing::error!(error = %e, "failed to throw {INIT_EXCEPTION_CLASS}");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn null_vm_returns_jni_err_without_running_init() {
        let ran = Cell::new(false);
        let status = JniBinding::new().initialize(VmHandle::from_raw(std::ptr::null_mut()), || {
            ran.set(true);
            Ok(())
        });
        assert_eq!(status, JNI_ERR);
        assert!(!ran.get());
    }

    #[test]
    fn successful_init_reports_jni_1_6() {
        let runs = Cell::new(0);
        // Never dereferenced: the success path performs no JNI calls.
        let vm = VmHandle::from_raw(0x40 as *mut std::ffi::c_void);
        let status = JniBinding::new().initialize(vm, || {
            runs.set(runs.get() + 1);
            Ok(())
        });
        assert_eq!(status, JNI_VERSION_1_6);
        assert_eq!(runs.get(), 1);
        assert!(java_vm().is_some());
    }

    #[test]
    fn panic_messages_are_extracted() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("formatted 7"));
        assert_eq!(panic_message(payload.as_ref()), "formatted 7");

        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
