use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selection::DefaultPolicy;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SporecartConfig {
    pub version: u32,
    pub api: ApiConfig,
    #[serde(default = "FlowConfig::checkout_default")]
    pub checkout: FlowConfig,
    #[serde(default = "FlowConfig::returns_default")]
    pub returns: FlowConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub media_base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct FlowConfig {
    pub default_rate: DefaultPolicy,
}

impl FlowConfig {
    pub fn checkout_default() -> Self {
        Self {
            default_rate: DefaultPolicy::First,
        }
    }

    pub fn returns_default() -> Self {
        Self {
            default_rate: DefaultPolicy::Cheapest,
        }
    }
}

impl ApiConfig {
    pub fn media_base_url(&self) -> &str {
        self.media_base_url
            .as_deref()
            .unwrap_or(self.base_url.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs
        .home_dir()
        .join(".config")
        .join("sporecart")
        .join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<SporecartConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: SporecartConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

pub(crate) fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.trim().is_empty())
}

pub fn validate_config(config: &SporecartConfig) -> Result<(), ConfigError> {
    if config.version != 1 {
        return Err(ConfigError::Validation {
            message: "version must be 1".to_string(),
        });
    }

    if !is_http_url(config.api.base_url.trim()) {
        return Err(ConfigError::Validation {
            message: "api.base_url must be an http:// or https:// URL".to_string(),
        });
    }

    let media_invalid = config
        .api
        .media_base_url
        .as_deref()
        .is_some_and(|media| !is_http_url(media.trim()));
    if media_invalid {
        return Err(ConfigError::Validation {
            message: "api.media_base_url must be an http:// or https:// URL".to_string(),
        });
    }

    Ok(())
}
