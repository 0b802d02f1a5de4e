//! Configuration loading and defaults for sales-chat.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/chat";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_ASSISTANT_NAME: &str = "AccessNine AI";
pub const KNOWN_THEMES: &[&str] = &["default", "dark", "light"];

/// Product context shown in the side panel when nothing is configured.
const DEFAULT_SIDEBAR_ITEMS: &[&str] = &[
    "강력 콘크리트 보수제",
    "전문가용 미장 흙손",
    "다목적 수성 프라이머",
    "고강도 반생",
];

// === Types ===

/// UI configuration loaded from config files.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TuiConfig {
    pub alternate_screen: Option<String>,
}

/// Resolved CLI configuration, including defaults and environment overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// URL of the remote assistant service.
    pub endpoint: Option<String>,
    /// Transport timeout applied by the HTTP client.
    pub request_timeout_secs: Option<u64>,
    /// Label shown in the header bar.
    pub assistant_name: Option<String>,
    /// Context entries listed in the side panel. An empty list hides it.
    pub sidebar_items: Option<Vec<String>>,
    pub theme: Option<String>,

    /// TUI configuration (alternate screen, etc.)
    pub tui: Option<TuiConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ConfigFile {
    #[serde(flatten)]
    base: Config,
    profiles: Option<HashMap<String, Config>>,
}

// === Config Loading ===

impl Config {
    /// Load configuration from disk and merge with environment overrides.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// # use crate::config::Config;
    /// let config = Config::load(None, None)?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(path: Option<PathBuf>, profile: Option<&str>) -> Result<Self> {
        let path = resolve_load_config_path(path);
        let mut config = if let Some(path) = path.as_ref() {
            if path.exists() {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                let parsed: ConfigFile = toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
                apply_profile(parsed, profile)?
            } else if let Some(profile) = profile {
                anyhow::bail!("Profile '{profile}' not found. Available profiles: none")
            } else {
                Config::default()
            }
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Validate user-supplied values.
    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = self.endpoint.as_deref() {
            validate_endpoint(endpoint)?;
        }
        if self.request_timeout_secs == Some(0) {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }
        if let Some(theme) = self.theme.as_deref() {
            let normalized = theme.trim().to_ascii_lowercase();
            if !KNOWN_THEMES.contains(&normalized.as_str()) {
                anyhow::bail!("Invalid theme '{theme}': expected default, dark, or light.");
            }
        }
        if let Some(tui) = &self.tui
            && let Some(mode) = tui.alternate_screen.as_deref()
        {
            let mode = mode.to_ascii_lowercase();
            if !matches!(mode.as_str(), "auto" | "always" | "never") {
                anyhow::bail!(
                    "Invalid tui.alternate_screen '{mode}': expected auto, always, or never."
                );
            }
        }
        Ok(())
    }

    /// Return the assistant endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
            .to_string()
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    #[must_use]
    pub fn assistant_name(&self) -> &str {
        self.assistant_name
            .as_deref()
            .unwrap_or(DEFAULT_ASSISTANT_NAME)
    }

    #[must_use]
    pub fn sidebar_items(&self) -> Vec<String> {
        match &self.sidebar_items {
            Some(items) => items.clone(),
            None => DEFAULT_SIDEBAR_ITEMS
                .iter()
                .map(|item| (*item).to_string())
                .collect(),
        }
    }

    #[must_use]
    pub fn theme_name(&self) -> &str {
        self.theme.as_deref().unwrap_or("default")
    }

    /// The configured alternate-screen mode, lower-cased. Defaults to `auto`.
    #[must_use]
    pub fn alternate_screen_mode(&self) -> String {
        self.tui
            .as_ref()
            .and_then(|tui| tui.alternate_screen.as_deref())
            .unwrap_or("auto")
            .to_ascii_lowercase()
    }

    /// Apply a command-line endpoint override and re-validate.
    pub fn override_endpoint(&mut self, endpoint: &str) -> Result<()> {
        validate_endpoint(endpoint)?;
        self.endpoint = Some(endpoint.trim().to_string());
        Ok(())
    }
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint.trim())
        .with_context(|| format!("Invalid endpoint '{endpoint}': not an absolute URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!(
            "Invalid endpoint '{endpoint}': scheme must be http or https, got {}",
            url.scheme()
        );
    }
    Ok(())
}

// === Defaults ===

/// Path of the config file that `load(None, ..)` would read.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    resolve_load_config_path(None)
}

fn home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".sales-chat").join("config.toml"))
}

fn env_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SALES_CHAT_CONFIG_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(expand_path(trimmed));
        }
    }
    None
}

fn expand_pathbuf(path: PathBuf) -> PathBuf {
    if let Some(raw) = path.to_str() {
        return expand_path(raw);
    }
    path
}

fn resolve_load_config_path(path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = path {
        return Some(expand_pathbuf(path));
    }

    if let Some(path) = env_config_path() {
        if path.exists() {
            return Some(path);
        }

        if let Some(home_path) = home_config_path()
            && home_path.exists()
        {
            return Some(home_path);
        }

        return Some(path);
    }

    home_config_path()
}

fn expand_path(path: &str) -> PathBuf {
    let expanded = shellexpand::tilde(path);
    PathBuf::from(expanded.as_ref())
}

// === Environment Overrides ===

fn apply_env_overrides(config: &mut Config) {
    if let Ok(value) = std::env::var("SALES_CHAT_ENDPOINT")
        && !value.trim().is_empty()
    {
        config.endpoint = Some(value.trim().to_string());
    }
    if let Ok(value) = std::env::var("SALES_CHAT_REQUEST_TIMEOUT")
        && let Ok(parsed) = value.trim().parse::<u64>()
    {
        config.request_timeout_secs = Some(parsed);
    }
    if let Ok(value) = std::env::var("SALES_CHAT_THEME")
        && !value.trim().is_empty()
    {
        config.theme = Some(value.trim().to_string());
    }
}

fn apply_profile(config: ConfigFile, profile: Option<&str>) -> Result<Config> {
    if let Some(profile_name) = profile {
        let profiles = config.profiles.as_ref();
        match profiles.and_then(|profiles| profiles.get(profile_name)) {
            Some(override_cfg) => Ok(merge_config(config.base, override_cfg.clone())),
            None => {
                let available = profiles
                    .map(|profiles| {
                        let mut keys = profiles.keys().cloned().collect::<Vec<_>>();
                        keys.sort();
                        if keys.is_empty() {
                            "none".to_string()
                        } else {
                            keys.join(", ")
                        }
                    })
                    .unwrap_or_else(|| "none".to_string());
                anyhow::bail!(
                    "Profile '{}' not found. Available profiles: {}",
                    profile_name,
                    available
                )
            }
        }
    } else {
        Ok(config.base)
    }
}

fn merge_config(base: Config, override_cfg: Config) -> Config {
    Config {
        endpoint: override_cfg.endpoint.or(base.endpoint),
        request_timeout_secs: override_cfg
            .request_timeout_secs
            .or(base.request_timeout_secs),
        assistant_name: override_cfg.assistant_name.or(base.assistant_name),
        sidebar_items: override_cfg.sidebar_items.or(base.sidebar_items),
        theme: override_cfg.theme.or(base.theme),
        tui: override_cfg.tui.or(base.tui),
    }
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}
