//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT};
use crate::models::paste::RecentFilter;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Runtime configuration for CrazyPaste.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_paste_size: usize,
    pub auto_backup: bool,
    /// Default for dropping burn-after-reading pastes from the recent listing.
    pub recent_exclude_burn: bool,
    /// Default for dropping password-protected pastes from the recent listing.
    pub recent_exclude_protected: bool,
    /// Seconds between background expiry sweeps; `0` disables the task.
    pub sweep_interval_secs: u64,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String, home: Option<PathBuf>) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir<F>(lookup: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(home) = non_blank("HOME") {
        return Some(PathBuf::from(home));
    }

    // Windows
    if let Some(profile) = non_blank("USERPROFILE") {
        return Some(PathBuf::from(profile));
    }

    if let (Some(drive), Some(path)) = (non_blank("HOMEDRIVE"), non_blank("HOMEPATH")) {
        return Some(PathBuf::from(format!("{}{}", drive, path)));
    }

    env::current_dir().ok()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|value| parse_env_flag(&value))
                .unwrap_or(default)
        };

        let db_path = match lookup("DB_PATH") {
            Some(path) => expand_tilde(path, resolve_home_dir(&lookup)),
            None => {
                let home = resolve_home_dir(&lookup).unwrap_or_else(|| PathBuf::from("."));
                home.join(".cache")
                    .join("crazypaste")
                    .join("db")
                    .to_string_lossy()
                    .to_string()
            }
        };

        Self {
            db_path,
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            max_paste_size: lookup("MAX_PASTE_SIZE")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_PASTE_SIZE),
            auto_backup: flag("AUTO_BACKUP", false),
            recent_exclude_burn: flag("RECENT_EXCLUDE_BURN", true),
            recent_exclude_protected: flag("RECENT_EXCLUDE_PROTECTED", true),
            sweep_interval_secs: lookup("SWEEP_INTERVAL_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0),
        }
    }

    /// Recent-listing filter built from the configured defaults.
    pub fn recent_filter(&self) -> RecentFilter {
        RecentFilter {
            exclude_protected: self.recent_exclude_protected,
            exclude_burn: self.recent_exclude_burn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_env_flag, Config};
    use crate::constants::{DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT};
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[("HOME", "/home/tester")]);
        assert_eq!(config.db_path, "/home/tester/.cache/crazypaste/db");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_paste_size, DEFAULT_MAX_PASTE_SIZE);
        assert!(!config.auto_backup);
        assert!(config.recent_exclude_burn);
        assert!(config.recent_exclude_protected);
        assert_eq!(config.sweep_interval_secs, 0);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("HOME", "/home/tester"),
            ("DB_PATH", "~/pastes/db"),
            ("PORT", "4040"),
            ("MAX_PASTE_SIZE", "2048"),
            ("AUTO_BACKUP", "yes"),
            ("RECENT_EXCLUDE_BURN", "off"),
            ("SWEEP_INTERVAL_SECS", "30"),
        ]);
        assert_eq!(config.db_path, "/home/tester/pastes/db");
        assert_eq!(config.port, 4040);
        assert_eq!(config.max_paste_size, 2048);
        assert!(config.auto_backup);
        assert!(!config.recent_exclude_burn);
        assert!(config.recent_exclude_protected);
        assert_eq!(config.sweep_interval_secs, 30);

        let filter = config.recent_filter();
        assert!(!filter.exclude_burn);
        assert!(filter.exclude_protected);
    }

    #[test]
    fn unparseable_values_fall_back() {
        let config = config_from(&[
            ("HOME", "/home/tester"),
            ("PORT", "not-a-port"),
            ("RECENT_EXCLUDE_PROTECTED", "maybe"),
        ]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.recent_exclude_protected);
    }
}
