// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android display bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. System brightness goes through
// `Settings.System`; window brightness through the hosting Activity's
// `WindowManager.LayoutParams`.
//
// ## Architecture notes
//
// The JavaVM and context object come from `ndk-context`. `install_context`
// fills it in with the `Application` during module initialisation unless the
// NativeActivity glue already did. Settings calls go through that context.
// Window calls resolve the resumed Activity on every call: the context itself
// when it is an Activity, otherwise the non-paused record in
// `ActivityThread.mActivities`.
//
// `Window.setAttributes` must run on the UI thread. Off the UI thread the
// write is posted with `Activity.runOnUiThread` through the bundled
// `WindowBrightnessRunnable` helper class (see `android/java/`), whose class
// reference is cached at load time while the app class loader is reachable.

#![cfg(target_os = "android")]

use std::sync::OnceLock;

use jni::objects::{GlobalRef, JClass, JObject, JObjectArray, JString, JValue};
use jni::{JNIEnv, JavaVM};

use brightness_core::error::{BrightnessError, Result};
use brightness_core::{BrightnessConfig, BrightnessMode, VmHandle};

use crate::traits::DisplayBackend;

// ---------------------------------------------------------------------------
// Platform constants
// ---------------------------------------------------------------------------

/// `Settings.System.SCREEN_BRIGHTNESS`
const SCREEN_BRIGHTNESS: &str = "screen_brightness";
/// `Settings.System.SCREEN_BRIGHTNESS_MODE`
const SCREEN_BRIGHTNESS_MODE: &str = "screen_brightness_mode";
const SCREEN_BRIGHTNESS_MODE_MANUAL: i32 = 0;
const SCREEN_BRIGHTNESS_MODE_AUTOMATIC: i32 = 1;

/// `Settings.ACTION_MANAGE_WRITE_SETTINGS`
const ACTION_MANAGE_WRITE_SETTINGS: &str = "android.settings.action.MANAGE_WRITE_SETTINGS";
/// `Intent.FLAG_ACTIVITY_NEW_TASK`
const FLAG_ACTIVITY_NEW_TASK: i32 = 0x1000_0000;
/// `Build.VERSION_CODES.M`, where `Settings.System.canWrite` was introduced.
const VERSION_CODES_M: i32 = 23;

/// Helper that applies a window brightness on the UI thread.
const WINDOW_BRIGHTNESS_RUNNABLE: &str = "com/margelo/nitro/brightness/WindowBrightnessRunnable";

static WINDOW_BRIGHTNESS_CLASS: OnceLock<GlobalRef> = OnceLock::new();

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// Install the application context into `ndk-context`.
///
/// Resolves `ActivityThread.currentApplication()` on the loading thread and
/// pins it with a global reference for the rest of the process. When a
/// context is already installed (NativeActivity glue, or an earlier call)
/// it is left in place. Either way the UI-thread helper class is looked up
/// here, since `FindClass` only sees app classes from the loading thread.
pub fn install_context(vm: VmHandle) -> Result<()> {
    // SAFETY: `vm` is the `JavaVM*` handed to JNI_OnLoad by the host and is
    // valid for the lifetime of the process.
    let java_vm = unsafe { JavaVM::from_raw(vm.as_ptr().cast()) }
        .map_err(|e| jni_err("JavaVM::from_raw", e))?;
    let mut env = java_vm
        .attach_current_thread()
        .map_err(|e| jni_err("attach_current_thread", e))?;

    cache_window_brightness_class(&mut env);

    if context_installed() {
        tracing::info!("Android: ndk-context already initialised, keeping it");
        return Ok(());
    }

    let application: JObject = env
        .call_static_method(
            "android/app/ActivityThread",
            "currentApplication",
            "()Landroid/app/Application;",
            &[],
        )
        .map_err(|e| jni_err("ActivityThread.currentApplication", e))?
        .l()
        .map_err(|e| jni_err("currentApplication->l", e))?;

    if application.is_null() {
        return Err(BrightnessError::Bridge(
            "ActivityThread.currentApplication() returned null".into(),
        ));
    }

    let global = env
        .new_global_ref(&application)
        .map_err(|e| jni_err("new_global_ref(application)", e))?;
    let context_ptr = global.as_obj().as_raw();
    // The reference must outlive every later bridge call.
    std::mem::forget(global);

    // SAFETY: both pointers are valid for the process lifetime and no
    // context is installed yet (checked above).
    unsafe { ndk_context::initialize_android_context(vm.as_ptr(), context_ptr.cast()) };

    tracing::info!("Android: application context installed");
    Ok(())
}

/// `ndk_context::android_context` panics while nothing is installed and
/// there is no non-panicking query.
fn context_installed() -> bool {
    std::panic::catch_unwind(ndk_context::android_context).is_ok()
}

fn cache_window_brightness_class(env: &mut JNIEnv) {
    if WINDOW_BRIGHTNESS_CLASS.get().is_some() {
        return;
    }
    let class = match env.find_class(WINDOW_BRIGHTNESS_RUNNABLE) {
        Ok(class) => class,
        Err(e) => {
            let _ = env.exception_clear();
            tracing::warn!(
                error = %e,
                "Android: WindowBrightnessRunnable not found, window brightness is UI-thread only"
            );
            return;
        }
    };
    match env.new_global_ref(&class) {
        Ok(global) => {
            let _ = WINDOW_BRIGHTNESS_CLASS.set(global);
        }
        Err(e) => tracing::warn!(error = %e, "Android: failed to pin WindowBrightnessRunnable"),
    }
}

/// Run `f` with an attached [`JNIEnv`] and the context object registered in
/// `ndk-context`. A Java exception left pending by a failed call is cleared
/// before returning the error.
fn with_env<T>(f: impl FnOnce(&mut JNIEnv, &JObject) -> Result<T>) -> Result<T> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` installed by `install_context`
    // (or the NDK glue). The pointer is valid for the lifetime of the process.
    let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| BrightnessError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| BrightnessError::Bridge(format!("failed to attach JNI thread: {e}")))?;

    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(BrightnessError::Bridge(
            "Android context is null — module not initialised".into(),
        ));
    }
    // SAFETY: the pointer is a global reference pinned by `install_context`
    // or owned by the NativeActivity glue.
    let context = unsafe { JObject::from_raw(ptr.cast()) };

    let result = f(&mut env, &context);
    if result.is_err() && env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    result
}

/// Convenience: map any `jni::errors::Error` into `BrightnessError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> BrightnessError {
    BrightnessError::Bridge(format!("{context}: {e}"))
}

fn sdk_int(env: &mut JNIEnv) -> Result<i32> {
    env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
        .map_err(|e| jni_err("Build.VERSION.SDK_INT", e))?
        .i()
        .map_err(|e| jni_err("SDK_INT->i", e))
}

fn content_resolver<'l>(env: &mut JNIEnv<'l>, context: &JObject) -> Result<JObject<'l>> {
    env.call_method(
        context,
        "getContentResolver",
        "()Landroid/content/ContentResolver;",
        &[],
    )
    .map_err(|e| jni_err("getContentResolver", e))?
    .l()
    .map_err(|e| jni_err("getContentResolver->l", e))
}

/// `Settings.System.getInt(resolver, name, default)`
fn settings_get_int(env: &mut JNIEnv, context: &JObject, name: &str, default: i32) -> Result<i32> {
    let resolver = content_resolver(env, context)?;
    let j_name: JString = env
        .new_string(name)
        .map_err(|e| jni_err("new_string(setting)", e))?;

    env.call_static_method(
        "android/provider/Settings$System",
        "getInt",
        "(Landroid/content/ContentResolver;Ljava/lang/String;I)I",
        &[
            JValue::Object(&resolver),
            JValue::Object(&j_name),
            JValue::Int(default),
        ],
    )
    .map_err(|e| jni_err("Settings.System.getInt", e))?
    .i()
    .map_err(|e| jni_err("getInt->i", e))
}

/// `Settings.System.putInt(resolver, name, value)`
fn settings_put_int(env: &mut JNIEnv, context: &JObject, name: &str, value: i32) -> Result<bool> {
    let resolver = content_resolver(env, context)?;
    let j_name: JString = env
        .new_string(name)
        .map_err(|e| jni_err("new_string(setting)", e))?;

    env.call_static_method(
        "android/provider/Settings$System",
        "putInt",
        "(Landroid/content/ContentResolver;Ljava/lang/String;I)Z",
        &[
            JValue::Object(&resolver),
            JValue::Object(&j_name),
            JValue::Int(value),
        ],
    )
    .map_err(|e| jni_err("Settings.System.putInt", e))?
    .z()
    .map_err(|e| jni_err("putInt->z", e))
}

/// `Settings.System.canWrite(context)`, or `true` before API 23.
fn can_write(env: &mut JNIEnv, context: &JObject) -> Result<bool> {
    if sdk_int(env)? < VERSION_CODES_M {
        return Ok(true);
    }
    env.call_static_method(
        "android/provider/Settings$System",
        "canWrite",
        "(Landroid/content/Context;)Z",
        &[JValue::Object(context)],
    )
    .map_err(|e| jni_err("Settings.System.canWrite", e))?
    .z()
    .map_err(|e| jni_err("canWrite->z", e))
}

/// The resumed Activity, if any.
///
/// A NativeActivity host installs the Activity itself as the context. For
/// managed hosts the context is the `Application`, so the Activity comes from
/// `ActivityThread.mActivities`: the first record that is not paused.
fn current_activity<'l>(env: &mut JNIEnv<'l>, context: &JObject) -> Result<Option<JObject<'l>>> {
    let is_activity = env
        .is_instance_of(context, "android/app/Activity")
        .map_err(|e| jni_err("instanceof Activity", e))?;
    if is_activity {
        return env
            .new_local_ref(context)
            .map(Some)
            .map_err(|e| jni_err("new_local_ref(activity)", e));
    }

    let thread: JObject = env
        .call_static_method(
            "android/app/ActivityThread",
            "currentActivityThread",
            "()Landroid/app/ActivityThread;",
            &[],
        )
        .map_err(|e| jni_err("ActivityThread.currentActivityThread", e))?
        .l()
        .map_err(|e| jni_err("currentActivityThread->l", e))?;
    if thread.is_null() {
        return Ok(None);
    }

    let records: JObject = env
        .get_field(&thread, "mActivities", "Landroid/util/ArrayMap;")
        .map_err(|e| jni_err("ActivityThread.mActivities", e))?
        .l()
        .map_err(|e| jni_err("mActivities->l", e))?;
    let values: JObject = env
        .call_method(&records, "values", "()Ljava/util/Collection;", &[])
        .map_err(|e| jni_err("mActivities.values", e))?
        .l()
        .map_err(|e| jni_err("values->l", e))?;
    let records: JObjectArray = env
        .call_method(&values, "toArray", "()[Ljava/lang/Object;", &[])
        .map_err(|e| jni_err("Collection.toArray", e))?
        .l()
        .map_err(|e| jni_err("toArray->l", e))?
        .into();

    let count = env
        .get_array_length(&records)
        .map_err(|e| jni_err("records length", e))?;
    for index in 0..count {
        let record = env
            .get_object_array_element(&records, index)
            .map_err(|e| jni_err("records[i]", e))?;
        let paused = env
            .get_field(&record, "paused", "Z")
            .map_err(|e| jni_err("ActivityClientRecord.paused", e))?
            .z()
            .map_err(|e| jni_err("paused->z", e))?;
        if paused {
            continue;
        }
        let activity: JObject = env
            .get_field(&record, "activity", "Landroid/app/Activity;")
            .map_err(|e| jni_err("ActivityClientRecord.activity", e))?
            .l()
            .map_err(|e| jni_err("activity->l", e))?;
        if !activity.is_null() {
            return Ok(Some(activity));
        }
    }
    Ok(None)
}

/// `activity`'s window and its layout params, or `None` if it has no window yet.
fn window_params<'l>(
    env: &mut JNIEnv<'l>,
    activity: &JObject,
) -> Result<Option<(JObject<'l>, JObject<'l>)>> {
    let window: JObject = env
        .call_method(activity, "getWindow", "()Landroid/view/Window;", &[])
        .map_err(|e| jni_err("getWindow", e))?
        .l()
        .map_err(|e| jni_err("getWindow->l", e))?;
    if window.is_null() {
        return Ok(None);
    }

    let params: JObject = env
        .call_method(
            &window,
            "getAttributes",
            "()Landroid/view/WindowManager$LayoutParams;",
            &[],
        )
        .map_err(|e| jni_err("getAttributes", e))?
        .l()
        .map_err(|e| jni_err("getAttributes->l", e))?;
    if params.is_null() {
        return Ok(None);
    }

    Ok(Some((window, params)))
}

/// `Looper.myLooper() == Looper.getMainLooper()`
fn on_main_thread(env: &mut JNIEnv) -> Result<bool> {
    let main: JObject = env
        .call_static_method("android/os/Looper", "getMainLooper", "()Landroid/os/Looper;", &[])
        .map_err(|e| jni_err("Looper.getMainLooper", e))?
        .l()
        .map_err(|e| jni_err("getMainLooper->l", e))?;
    let mine: JObject = env
        .call_static_method("android/os/Looper", "myLooper", "()Landroid/os/Looper;", &[])
        .map_err(|e| jni_err("Looper.myLooper", e))?
        .l()
        .map_err(|e| jni_err("myLooper->l", e))?;
    if mine.is_null() {
        return Ok(false);
    }
    env.is_same_object(&main, &mine)
        .map_err(|e| jni_err("IsSameObject(looper)", e))
}

/// Write `screenBrightness` and push the params back. UI thread only.
fn apply_window_brightness(env: &mut JNIEnv, activity: &JObject, value: f32) -> Result<()> {
    let (window, params) = window_params(env, activity)?.ok_or(BrightnessError::NoActivity)?;

    env.set_field(&params, "screenBrightness", "F", JValue::Float(value))
        .map_err(|e| jni_err("set screenBrightness", e))?;

    env.call_method(
        &window,
        "setAttributes",
        "(Landroid/view/WindowManager$LayoutParams;)V",
        &[JValue::Object(&params)],
    )
    .map_err(|e| jni_err("Window.setAttributes", e))?;
    Ok(())
}

/// `activity.runOnUiThread(new WindowBrightnessRunnable(activity, value))`
fn post_window_brightness(env: &mut JNIEnv, activity: &JObject, value: f32) -> Result<()> {
    let class = WINDOW_BRIGHTNESS_CLASS.get().ok_or_else(|| {
        BrightnessError::Bridge(
            "window brightness set off the UI thread and WindowBrightnessRunnable is unavailable"
                .into(),
        )
    })?;
    let class: &JClass = class.as_obj().into();

    let runnable = env
        .new_object(
            class,
            "(Landroid/app/Activity;F)V",
            &[JValue::Object(activity), JValue::Float(value)],
        )
        .map_err(|e| jni_err("new WindowBrightnessRunnable", e))?;

    env.call_method(
        activity,
        "runOnUiThread",
        "(Ljava/lang/Runnable;)V",
        &[JValue::Object(&runnable)],
    )
    .map_err(|e| jni_err("Activity.runOnUiThread", e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the display backend.
///
/// Holds only the conversion config; all display state lives on the Java side.
pub struct AndroidBridge {
    config: BrightnessConfig,
}

impl AndroidBridge {
    /// Create a new Android bridge.
    ///
    /// This does **not** touch JNI — the first JNI call happens lazily when
    /// a trait method is invoked.
    pub fn new() -> Self {
        Self::with_config(BrightnessConfig::default())
    }

    pub fn with_config(config: BrightnessConfig) -> Self {
        Self { config }
    }

    fn default_raw(&self) -> i32 {
        self.config.default_raw_brightness as i32
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBackend for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }

    /// Reads `WindowManager.LayoutParams.screenBrightness`. The platform uses
    /// `BRIGHTNESS_OVERRIDE_NONE` (-1) for "follow the system", reported as `None`.
    fn window_brightness(&self) -> Result<Option<f64>> {
        with_env(|env, context| {
            let Some(activity) = current_activity(env, context)? else {
                return Ok(None);
            };
            let Some((_window, params)) = window_params(env, &activity)? else {
                return Ok(None);
            };
            let value = env
                .get_field(&params, "screenBrightness", "F")
                .map_err(|e| jni_err("LayoutParams.screenBrightness", e))?
                .f()
                .map_err(|e| jni_err("screenBrightness->f", e))?;
            Ok((value >= 0.0).then_some(f64::from(value)))
        })
    }

    /// Applied in place on the UI thread; posted to it otherwise.
    fn set_window_brightness(&self, value: f64) -> Result<()> {
        with_env(|env, context| {
            let activity = current_activity(env, context)?.ok_or(BrightnessError::NoActivity)?;

            if on_main_thread(env)? {
                apply_window_brightness(env, &activity, value as f32)?;
                tracing::debug!(value, "Android: window brightness applied");
            } else {
                post_window_brightness(env, &activity, value as f32)?;
                tracing::debug!(value, "Android: window brightness posted to the UI thread");
            }
            Ok(())
        })
    }

    fn system_brightness(&self) -> Result<f64> {
        let raw = with_env(|env, context| {
            settings_get_int(env, context, SCREEN_BRIGHTNESS, self.default_raw())
        })?;
        Ok(self.config.raw_to_level(raw))
    }

    fn set_system_brightness(&self, value: f64) -> Result<()> {
        let raw = self.config.level_to_raw(value);
        let stored = with_env(|env, context| settings_put_int(env, context, SCREEN_BRIGHTNESS, raw))?;
        if !stored {
            return Err(BrightnessError::Bridge(
                "Settings.System.putInt(screen_brightness) returned false".into(),
            ));
        }
        tracing::debug!(raw, "Android: system brightness stored");
        Ok(())
    }

    fn system_brightness_mode(&self) -> Result<BrightnessMode> {
        let mode = with_env(|env, context| {
            settings_get_int(
                env,
                context,
                SCREEN_BRIGHTNESS_MODE,
                SCREEN_BRIGHTNESS_MODE_MANUAL,
            )
        })?;
        Ok(if mode == SCREEN_BRIGHTNESS_MODE_AUTOMATIC {
            BrightnessMode::Automatic
        } else {
            BrightnessMode::Manual
        })
    }

    fn can_write_settings(&self) -> Result<bool> {
        with_env(|env, context| can_write(env, context))
    }

    /// Launches the "Modify system settings" screen for this package when the
    /// permission is missing. The user toggles it there, so the value returned
    /// here usually still reads `false`; callers re-check later.
    fn request_write_settings(&self) -> Result<bool> {
        with_env(|env, context| {
            if can_write(env, context)? {
                return Ok(true);
            }

            let package: JString = env
                .call_method(context, "getPackageName", "()Ljava/lang/String;", &[])
                .map_err(|e| jni_err("getPackageName", e))?
                .l()
                .map_err(|e| jni_err("getPackageName->l", e))?
                .into();
            let package: String = env
                .get_string(&package)
                .map_err(|e| jni_err("get_string(package)", e))?
                .into();

            let j_uri_string: JString = env
                .new_string(format!("package:{package}"))
                .map_err(|e| jni_err("new_string(package uri)", e))?;
            let uri: JObject = env
                .call_static_method(
                    "android/net/Uri",
                    "parse",
                    "(Ljava/lang/String;)Landroid/net/Uri;",
                    &[JValue::Object(&j_uri_string)],
                )
                .map_err(|e| jni_err("Uri.parse", e))?
                .l()
                .map_err(|e| jni_err("Uri.parse->l", e))?;

            let j_action: JString = env
                .new_string(ACTION_MANAGE_WRITE_SETTINGS)
                .map_err(|e| jni_err("new_string(ACTION_MANAGE_WRITE_SETTINGS)", e))?;
            let intent: JObject = env
                .new_object(
                    "android/content/Intent",
                    "(Ljava/lang/String;)V",
                    &[JValue::Object(&j_action)],
                )
                .map_err(|e| jni_err("new Intent", e))?;

            env.call_method(
                &intent,
                "setData",
                "(Landroid/net/Uri;)Landroid/content/Intent;",
                &[JValue::Object(&uri)],
            )
            .map_err(|e| jni_err("setData", e))?;

            env.call_method(
                &intent,
                "addFlags",
                "(I)Landroid/content/Intent;",
                &[JValue::Int(FLAG_ACTIVITY_NEW_TASK)],
            )
            .map_err(|e| jni_err("addFlags", e))?;

            env.call_method(
                context,
                "startActivity",
                "(Landroid/content/Intent;)V",
                &[JValue::Object(&intent)],
            )
            .map_err(|e| jni_err("startActivity(MANAGE_WRITE_SETTINGS)", e))?;

            tracing::info!(%package, "Android: write-settings screen launched");
            can_write(env, context)
        })
    }
}
