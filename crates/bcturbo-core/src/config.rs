//! Configuration for the BC Turbo cockpit.
//!
//! Configuration is loaded from `BCT_*` environment variables with sane
//! defaults; CLI flags may override individual fields after loading.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default quiet period for the SAP/IMS lookup debounce (milliseconds).
pub const DEFAULT_LOOKUP_DEBOUNCE_MS: u64 = 2000;

/// Default prefix for exported result files.
pub const DEFAULT_EXPORT_PREFIX: &str = "BC_Turbo_Results";

/// Main configuration struct for the cockpit.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Preset database folder (skips the picker dialog when set).
    pub database_folder: Option<PathBuf>,
    /// Preset result folder (skips the picker dialog when set).
    pub result_folder: Option<PathBuf>,

    /// Quiet period after the last keystroke before the lookup fires.
    pub lookup_debounce_ms: u64,

    /// Simulated latency for the demo backend (milliseconds, 0 = none).
    pub demo_latency_ms: u64,

    // TUI appearance / notifications
    pub tui_theme: String,
    pub tui_toast_enabled: bool,
    pub tui_toast_max_visible: usize,
    pub tui_toast_info_dismiss_secs: u64,
    pub tui_toast_warn_dismiss_secs: u64,
    pub tui_toast_error_dismiss_secs: u64,

    /// Prefix for exported result files.
    pub export_file_prefix: String,

    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_folder: None,
            result_folder: None,
            lookup_debounce_ms: DEFAULT_LOOKUP_DEBOUNCE_MS,
            demo_latency_ms: 400,
            tui_theme: "cyberpunk-aurora".to_string(),
            tui_toast_enabled: true,
            tui_toast_max_visible: 3,
            tui_toast_info_dismiss_secs: 3,
            tui_toast_warn_dismiss_secs: 5,
            tui_toast_error_dismiss_secs: 8,
            export_file_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `BCT_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_folder: env_path("BCT_DATABASE_FOLDER"),
            result_folder: env_path("BCT_RESULT_FOLDER"),
            lookup_debounce_ms: env_u64("BCT_LOOKUP_DEBOUNCE_MS", defaults.lookup_debounce_ms),
            demo_latency_ms: env_u64("BCT_DEMO_LATENCY_MS", defaults.demo_latency_ms),
            tui_theme: env_string("BCT_TUI_THEME", &defaults.tui_theme),
            tui_toast_enabled: env_bool("BCT_TUI_TOAST_ENABLED", defaults.tui_toast_enabled),
            tui_toast_max_visible: env_u64(
                "BCT_TUI_TOAST_MAX_VISIBLE",
                defaults.tui_toast_max_visible as u64,
            ) as usize,
            tui_toast_info_dismiss_secs: env_u64(
                "BCT_TUI_TOAST_INFO_DISMISS_SECS",
                defaults.tui_toast_info_dismiss_secs,
            ),
            tui_toast_warn_dismiss_secs: env_u64(
                "BCT_TUI_TOAST_WARN_DISMISS_SECS",
                defaults.tui_toast_warn_dismiss_secs,
            ),
            tui_toast_error_dismiss_secs: env_u64(
                "BCT_TUI_TOAST_ERROR_DISMISS_SECS",
                defaults.tui_toast_error_dismiss_secs,
            ),
            export_file_prefix: env_string("BCT_EXPORT_PREFIX", &defaults.export_file_prefix),
            log_filter: env_string("BCT_LOG", &defaults.log_filter),
        }
    }

    /// The lookup quiet period as a [`Duration`].
    #[must_use]
    pub const fn lookup_debounce(&self) -> Duration {
        Duration::from_millis(self.lookup_debounce_ms)
    }

    /// Simulated demo-backend latency, `None` when disabled.
    #[must_use]
    pub const fn demo_latency(&self) -> Option<Duration> {
        if self.demo_latency_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.demo_latency_ms))
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.lookup_debounce_ms, 2000);
        assert_eq!(config.lookup_debounce(), Duration::from_millis(2000));
        assert!(config.tui_toast_enabled);
        assert_eq!(config.export_file_prefix, "BC_Turbo_Results");
        assert!(config.database_folder.is_none());
    }

    #[test]
    fn demo_latency_zero_disables() {
        let config = Config {
            demo_latency_ms: 0,
            ..Config::default()
        };
        assert!(config.demo_latency().is_none());

        let config = Config {
            demo_latency_ms: 250,
            ..Config::default()
        };
        assert_eq!(config.demo_latency(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn env_bool_falls_back_when_unset() {
        assert!(env_bool("BCT_TEST_UNSET_BOOL_XYZ", true));
        assert!(!env_bool("BCT_TEST_UNSET_BOOL_XYZ", false));
    }

    #[test]
    fn env_u64_falls_back_on_garbage() {
        assert_eq!(env_u64("BCT_TEST_UNSET_U64_XYZ", 42), 42);
    }
}
