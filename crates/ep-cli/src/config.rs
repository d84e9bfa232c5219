//! Config file resolution and loading.
//!
//! Priority: `--config` flag > `EP_CONFIG` env > built-in defaults.
//! A missing or malformed file falls back to defaults with a log line.

use std::path::{Path, PathBuf};
use std::{env, fs};

use ep_core::EngineConfig;

pub const CONFIG_ENV: &str = "EP_CONFIG";

/// Resolve which config file to read, if any.
pub fn resolve_config_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = override_path {
        return Some(p.to_path_buf());
    }
    env::var(CONFIG_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Load the engine config, falling back to defaults.
pub fn load_config(override_path: Option<&Path>) -> EngineConfig {
    let Some(path) = resolve_config_path(override_path) else {
        tracing::debug!("no config file given, using defaults");
        return EngineConfig::default();
    };
    load_from(&path)
}

fn load_from(path: &Path) -> EngineConfig {
    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("failed to parse {}: {e}, using defaults", path.display());
                EngineConfig::default()
            }
        },
        Err(_) => {
            tracing::info!("no config at {}, using defaults", path.display());
            EngineConfig::default()
        }
    }
}

/// Render a config as TOML (for generating a starter config file).
pub fn to_toml(config: &EngineConfig) -> anyhow::Result<String> {
    Ok(toml::to_string_pretty(config)?)
}
