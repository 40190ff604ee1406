//! Configuration loading.
//!
//! The loader reads and parses; it does not validate. Keys missing from the
//! file keep their defaults, and environment overrides are applied last.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ci_core::config::AppConfig;
use tracing::{debug, info};

pub const CONFIG_PATH_ENV: &str = "CONSULT_CONFIG";
pub const API_BASE_URL_ENV: &str = "CONSULT_API_BASE_URL";
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Pick the config file: explicit path, then `CONSULT_CONFIG`, then the
/// platform config dir when a file exists there.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    if explicit.is_some() {
        return explicit;
    }
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("consult-intake").join(DEFAULT_CONFIG_FILE))
        .filter(|path| path.exists())
}

/// Full startup resolution: `.env`, file, then environment overrides.
pub fn resolve_config(explicit: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "loaded .env");
    }

    let mut config = match resolve_config_path(explicit) {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            load_config(&path)?
        }
        None => {
            debug!("no config file, using defaults");
            AppConfig::default()
        }
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(base_url) = lookup(API_BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.api.base_url = base_url.trim().to_string();
    }
}
