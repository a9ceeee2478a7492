//! Configuration loading and credential resolution
//!
//! Provides two-tier configuration resolution with ENV → TOML priority.
//! Absence of the oracle credential is not a startup failure; analysis
//! requests surface a configuration error until a key is provided.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default listen address for the Goal Analysis service
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5740";

/// Default OpenAI-compatible API base URL
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Service-specific environment variable for the oracle credential
pub const API_KEY_ENV_VAR: &str = "GOALSCORE_OPENAI_API_KEY";

/// Conventional environment variable honored as a fallback
pub const GENERIC_API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// TOML configuration file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// OpenAI API key (lowest-priority credential source)
    pub openai_api_key: Option<String>,
    /// Override for the OpenAI-compatible API base URL
    pub openai_base_url: Option<String>,
    /// Listen address, e.g. "127.0.0.1:5740"
    pub bind_addr: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub openai_base_url: String,
    /// Resolved oracle credential; None means requests fail with a
    /// configuration error until one is provided
    pub openai_api_key: Option<String>,
}

impl ServiceConfig {
    /// Resolve the full service configuration from a loaded TOML config
    /// plus the process environment.
    pub fn resolve(toml_config: &TomlConfig) -> Self {
        ServiceConfig {
            bind_addr: toml_config
                .bind_addr
                .clone()
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            openai_base_url: toml_config
                .openai_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_api_key: resolve_openai_api_key(toml_config),
        }
    }
}

/// Default configuration file path for the platform:
/// `<config dir>/goalscore/goalscore.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("goalscore").join("goalscore.toml"))
}

/// Load a TOML configuration file.
///
/// A missing file is not an error (zero-config startup); unparsable
/// contents are.
pub fn load_config_file(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read config failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse config failed ({}): {}", path.display(), e)))
}

/// Load the configuration file from the default platform path, falling
/// back to defaults when no config directory exists.
pub fn load_default_config() -> Result<TomlConfig> {
    match default_config_path() {
        Some(path) => load_config_file(&path),
        None => Ok(TomlConfig::default()),
    }
}

/// Resolve the OpenAI API key from 2-tier configuration.
///
/// **Priority:** ENV (`GOALSCORE_OPENAI_API_KEY`, then `OPENAI_API_KEY`)
/// → TOML (`openai_api_key`).
pub fn resolve_openai_api_key(toml_config: &TomlConfig) -> Option<String> {
    let mut sources = Vec::new();

    let service_env_key = std::env::var(API_KEY_ENV_VAR).ok().filter(|k| is_valid_key(k));
    if service_env_key.is_some() {
        sources.push(API_KEY_ENV_VAR);
    }

    let generic_env_key = std::env::var(GENERIC_API_KEY_ENV_VAR)
        .ok()
        .filter(|k| is_valid_key(k));
    if generic_env_key.is_some() {
        sources.push(GENERIC_API_KEY_ENV_VAR);
    }

    let toml_key = toml_config
        .openai_api_key
        .clone()
        .filter(|k| is_valid_key(k));
    if toml_key.is_some() {
        sources.push("TOML");
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "OpenAI API key found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    if let Some(key) = service_env_key {
        info!("OpenAI API key loaded from {}", API_KEY_ENV_VAR);
        return Some(key);
    }

    if let Some(key) = generic_env_key {
        info!("OpenAI API key loaded from {}", GENERIC_API_KEY_ENV_VAR);
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("OpenAI API key loaded from TOML config");
        return Some(key);
    }

    None
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
