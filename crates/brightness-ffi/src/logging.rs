// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process-wide logging for the native library.
//
// stdout and stderr go nowhere inside an Android app, so on Android no
// `tracing` subscriber is installed: events fall through to the `log`
// facade (tracing's `log` feature) and android_logger writes them to
// logcat. Everywhere else a fmt subscriber is used.

/// Logcat tag for every record emitted by this library.
#[cfg(target_os = "android")]
const LOG_TAG: &str = "NitroBrightness";

/// Most verbose level named in an `EnvFilter`-style directive list such as
/// `"info"` or `"warn,brightness_module=debug"`. Info when nothing parses.
#[cfg_attr(not(target_os = "android"), allow(dead_code))]
fn logcat_level(filter: &str) -> log::LevelFilter {
    filter
        .split(',')
        .filter_map(|directive| {
            let level = directive.rsplit('=').next()?;
            level.trim().parse::<log::LevelFilter>().ok()
        })
        .max()
        .unwrap_or(log::LevelFilter::Info)
}

/// Install the logcat backend with `logcat_level(default_filter)`.
/// Only the first call in a process has any effect.
#[cfg(target_os = "android")]
pub fn init(default_filter: &str) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(logcat_level(default_filter))
            .with_tag(LOG_TAG),
    );
    tracing::debug!("native logging initialised");
}

/// Install the fmt subscriber. `RUST_LOG` wins over `default_filter`.
/// Only the first call in a process has any effect.
#[cfg(not(target_os = "android"))]
pub fn init(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("native logging initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init("debug");
        init("info");
        tracing::info!("still logging after second init");
    }

    #[test]
    fn logcat_level_takes_the_most_verbose_directive() {
        assert_eq!(logcat_level("info"), log::LevelFilter::Info);
        assert_eq!(logcat_level("WARN"), log::LevelFilter::Warn);
        assert_eq!(
            logcat_level("warn,brightness_module=debug"),
            log::LevelFilter::Debug
        );
        assert_eq!(logcat_level("off"), log::LevelFilter::Off);
    }

    #[test]
    fn logcat_level_falls_back_to_info() {
        assert_eq!(logcat_level(""), log::LevelFilter::Info);
        assert_eq!(logcat_level("brightness_module"), log::LevelFilter::Info);
        assert_eq!(logcat_level("verbose-ish"), log::LevelFilter::Info);
    }
}
