use crate::backend::DEFAULT_API_URL;
use crate::client::ClientOptions;
use crate::error::AppError;
use crate::notify::DEFAULT_TOAST_MS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKLIST_CONFIG_PATH";
const API_URL_ENV_VAR: &str = "TASKLIST_API_URL";

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub danger: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        self.paint(self.accent, text)
    }

    pub fn mutedize(&self, text: &str) -> String {
        self.paint(self.muted, text)
    }

    pub fn dangerize(&self, text: &str) -> String {
        self.paint(self.danger, text)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", color, text, self.reset)
        }
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.and_then(canonical_theme_name).as_deref() {
        Some("noir") => Palette {
            accent: "\x1b[38;5;208m",
            muted: "\x1b[38;5;250m",
            danger: "\x1b[38;5;203m",
            reset: "\x1b[0m",
        },
        Some("solarized") => Palette {
            accent: "\x1b[38;5;108m",
            muted: "\x1b[38;5;250m",
            danger: "\x1b[38;5;160m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            accent: "",
            muted: "",
            danger: "",
            reset: "",
        },
    }
}

pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let cleaned = canonicalize_key(raw);
    if cleaned.is_empty() {
        return Some("default".into());
    }

    match cleaned.as_str() {
        "vanilla" | "light" => Some("default".to_string()),
        "dark" | "dark_mode" | "darkmode" => Some("noir".to_string()),
        other => Some(other.to_string()),
    }
}

/// Lowercases and collapses every run of non-alphanumerics into `_`.
pub fn canonicalize_key(raw: &str) -> String {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    cleaned.trim_matches('_').to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub timeout_secs: u64,
    pub theme: Option<String>,
    pub confirm_delete: bool,
    pub rerender_on_toggle_failure: bool,
    pub toast_ms: u64,
    pub exit_animation_ms: u64,
    pub filter_settle_ms: u64,
    pub desktop_notifications: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 5,
            theme: None,
            confirm_delete: true,
            rerender_on_toggle_failure: true,
            toast_ms: DEFAULT_TOAST_MS,
            exit_animation_ms: 260,
            filter_settle_ms: 300,
            desktop_notifications: false,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn toast_ttl(&self) -> time::Duration {
        time::Duration::milliseconds(i64::try_from(self.toast_ms).unwrap_or(i64::MAX))
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            confirm_delete: self.confirm_delete,
            rerender_on_toggle_failure: self.rerender_on_toggle_failure,
            exit_animation: Duration::from_millis(self.exit_animation_ms),
            filter_settle: Duration::from_millis(self.filter_settle_ms),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ApiUrl,
    TimeoutSecs,
    Theme,
    ConfirmDelete,
    RerenderOnToggleFailure,
    ToastMs,
    ExitAnimationMs,
    FilterSettleMs,
    DesktopNotifications,
}

impl ConfigKey {
    pub fn from_canonical(key: &str) -> Option<Self> {
        match key {
            "api_url" | "url" => Some(Self::ApiUrl),
            "timeout_secs" | "timeout" => Some(Self::TimeoutSecs),
            "theme" => Some(Self::Theme),
            "confirm_delete" => Some(Self::ConfirmDelete),
            "rerender_on_toggle_failure" => Some(Self::RerenderOnToggleFailure),
            "toast_ms" => Some(Self::ToastMs),
            "exit_animation_ms" => Some(Self::ExitAnimationMs),
            "filter_settle_ms" => Some(Self::FilterSettleMs),
            "desktop_notifications" | "notifications" => Some(Self::DesktopNotifications),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub theme: Option<String>,
    pub confirm_delete: Option<bool>,
    pub rerender_on_toggle_failure: Option<bool>,
    pub toast_ms: Option<u64>,
    pub exit_animation_ms: Option<u64>,
    pub filter_settle_ms: Option<u64>,
    pub desktop_notifications: Option<bool>,
}

impl ConfigOverrides {
    pub fn set(&mut self, key: ConfigKey, raw: &str) -> Result<(), AppError> {
        let value = raw.trim();
        match key {
            ConfigKey::ApiUrl => self.api_url = Some(value.to_string()),
            ConfigKey::TimeoutSecs => self.timeout_secs = Some(parse_number(key, value)?),
            ConfigKey::Theme => self.theme = Some(value.to_string()),
            ConfigKey::ConfirmDelete => self.confirm_delete = Some(parse_flag(key, value)?),
            ConfigKey::RerenderOnToggleFailure => {
                self.rerender_on_toggle_failure = Some(parse_flag(key, value)?)
            }
            ConfigKey::ToastMs => self.toast_ms = Some(parse_number(key, value)?),
            ConfigKey::ExitAnimationMs => {
                self.exit_animation_ms = Some(parse_number(key, value)?)
            }
            ConfigKey::FilterSettleMs => self.filter_settle_ms = Some(parse_number(key, value)?),
            ConfigKey::DesktopNotifications => {
                self.desktop_notifications = Some(parse_flag(key, value)?)
            }
        }
        Ok(())
    }
}

fn parse_number(key: ConfigKey, value: &str) -> Result<u64, AppError> {
    value
        .parse::<u64>()
        .map_err(|_| AppError::invalid_input(format!("{key:?} expects a number, got '{value}'")))
}

fn parse_flag(key: ConfigKey, value: &str) -> Result<bool, AppError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(AppError::invalid_input(format!(
            "{key:?} expects true or false, got '{value}'"
        ))),
    }
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tasklist")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasklist")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    let mut load = match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    };

    if let Ok(url) = std::env::var(API_URL_ENV_VAR)
        && !url.trim().is_empty()
    {
        load.config.api_url = url.trim().to_string();
    }

    load
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config.theme = config.theme.and_then(|name| canonical_theme_name(&name));
    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(url) = overrides.api_url.as_ref() {
        merged.api_url = url.clone();
    }
    if let Some(theme) = overrides.theme.as_ref() {
        merged.theme = canonical_theme_name(theme);
    }
    merged.timeout_secs = overrides.timeout_secs.unwrap_or(merged.timeout_secs);
    merged.confirm_delete = overrides.confirm_delete.unwrap_or(merged.confirm_delete);
    merged.rerender_on_toggle_failure = overrides
        .rerender_on_toggle_failure
        .unwrap_or(merged.rerender_on_toggle_failure);
    merged.toast_ms = overrides.toast_ms.unwrap_or(merged.toast_ms);
    merged.exit_animation_ms = overrides
        .exit_animation_ms
        .unwrap_or(merged.exit_animation_ms);
    merged.filter_settle_ms = overrides
        .filter_settle_ms
        .unwrap_or(merged.filter_settle_ms);
    merged.desktop_notifications = overrides
        .desktop_notifications
        .unwrap_or(merged.desktop_notifications);
    merged
}
