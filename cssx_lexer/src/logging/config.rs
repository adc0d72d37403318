//! Runtime logging preferences storage

use super::events::LogLevel;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install logging preferences; only the first call takes effect
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

/// Preferences in effect, falling back to environment defaults
pub fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

pub fn get_min_log_level() -> LogLevel {
    get_runtime_preferences().min_log_level
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

/// Whether recovered constructs are reported as warnings
pub fn log_recoveries() -> bool {
    get_runtime_preferences().log_recoveries
}

pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();
    format!(
        "=== Logging Configuration ===\n\
         Minimum level: {}\n\
         Structured output: {}\n\
         Console output: {}\n\
         Report recoveries: {}\n",
        preferences.min_log_level.as_str(),
        preferences.use_structured_logging,
        preferences.enable_console_logging,
        preferences.log_recoveries
    )
}
