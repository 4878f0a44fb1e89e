//! View styling: theme configuration and the ANSI palette derived from it.
//! Presentation state lives here, never in the persisted task data.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tasklist_core::error::AppError;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKLIST_CONFIG_PATH";

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        if self.accent.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.accent, text, self.reset)
        }
    }

    pub fn mutedize(&self, text: &str) -> String {
        if self.muted.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.muted, text, self.reset)
        }
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.and_then(canonical_theme_name) {
        Some(ref name) if name == "noir" => Palette {
            accent: "\x1b[38;5;208m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        Some(ref name) if name == "solarized" => Palette {
            accent: "\x1b[38;5;108m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            accent: "",
            muted: "",
            reset: "",
        },
    }
}

pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect();

    if cleaned.is_empty() {
        return Some("default".to_string());
    }

    match cleaned.as_str() {
        "vanilla" | "light" => Some("default".to_string()),
        "dark" | "darkmode" => Some("noir".to_string()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
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

/// Loads the view config, falling back to defaults when the file is missing
/// or unreadable. Config problems are logged, never shown.
pub fn load_config() -> Config {
    match config_path() {
        Ok(path) => load_config_from_path(&path),
        Err(err) => {
            log::warn!("failed to resolve config path: {err}");
            Config::default()
        }
    }
}

fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            log::warn!("failed to read {}: {err}", path.display());
            return Config::default();
        }
    };

    match serde_json::from_str::<Config>(&content) {
        Ok(mut config) => {
            config.theme = config.theme.as_deref().and_then(canonical_theme_name);
            config
        }
        Err(err) => {
            log::warn!("invalid JSON in {}: {err}", path.display());
            Config::default()
        }
    }
}
