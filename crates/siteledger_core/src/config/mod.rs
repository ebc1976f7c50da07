use crate::error::AppError;
use crate::model::{PaymentMethod, TaskStatus};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "siteledger";
const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "SITELEDGER_CONFIG_PATH";
const DEFAULT_CURRENCY_SYMBOL: &str = "$";

#[derive(Debug, Clone)]
pub struct Palette {
    pub done: &'static str,
    pub active: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    fn paint(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", color, text, self.reset)
        }
    }

    pub fn task_status(&self, status: TaskStatus) -> String {
        let color = match status {
            TaskStatus::Completed => self.done,
            TaskStatus::InProgress => self.active,
            TaskStatus::Pending => self.muted,
        };
        self.paint(color, status.as_str())
    }

    pub fn mutedize(&self, text: &str) -> String {
        self.paint(self.muted, text)
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.and_then(canonical_theme_name).as_deref() {
        Some("noir") => Palette {
            done: "\x1b[38;5;114m",
            active: "\x1b[38;5;208m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        Some("solarized") => Palette {
            done: "\x1b[38;5;64m",
            active: "\x1b[38;5;136m",
            muted: "\x1b[38;5;245m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            done: "",
            active: "",
            muted: "",
            reset: "",
        },
    }
}

/// Maps theme aliases onto a known palette name. Unknown themes yield `None`.
pub fn canonical_theme_name(raw: &str) -> Option<String> {
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

    match cleaned.trim_matches('_') {
        "" | "plain" | "light" => Some("default".to_string()),
        "dark" | "dark_mode" | "darkmode" | "noir" => Some("noir".to_string()),
        "solarized" => Some("solarized".to_string()),
        _ => None,
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub currency_symbol: Option<String>,
    #[serde(default)]
    pub default_payment_method: Option<PaymentMethod>,
}

impl Config {
    pub fn currency_symbol(&self) -> &str {
        self.currency_symbol
            .as_deref()
            .unwrap_or(DEFAULT_CURRENCY_SYMBOL)
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.default_payment_method.unwrap_or(PaymentMethod::Bank)
    }

    pub fn palette(&self) -> Palette {
        palette_for_theme(self.theme.as_deref())
    }
}

/// A config plus the error that forced a fall back to defaults, if any.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub currency_symbol: Option<String>,
    pub default_payment_method: Option<PaymentMethod>,
}

/// Per-user directory holding the ledger and config files.
pub fn app_dir() -> Result<PathBuf, AppError> {
    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join(APP_DIR_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join(APP_DIR_NAME))
    }
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    Ok(app_dir()?.join(CONFIG_FILE_NAME))
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
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
    config.theme = match config.theme.take() {
        Some(name) => {
            let canonical = canonical_theme_name(&name);
            if canonical.is_none() {
                tracing::warn!(theme = %name, "unknown theme in config, using default");
            }
            canonical
        }
        None => None,
    };
    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(normalized) = overrides
        .theme
        .as_deref()
        .and_then(canonical_theme_name)
    {
        merged.theme = Some(normalized);
    }
    if let Some(symbol) = overrides.currency_symbol.as_ref() {
        merged.currency_symbol = Some(symbol.clone());
    }
    if let Some(method) = overrides.default_payment_method {
        merged.default_payment_method = Some(method);
    }

    merged
}
