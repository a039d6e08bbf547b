//! User configuration for the todo CLI
//!
//! Configuration file: ~/.config/todo-agent/config.toml (or platform
//! equivalent). Resolution order everywhere: CLI flag / environment >
//! config file > built-in default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration for the todo CLI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Model configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Model selection and endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelConfig {
    /// Model identifier (defaults to deepseek-chat)
    #[serde(default)]
    pub name: Option<String>,

    /// API base URL (defaults to the DeepSeek endpoint)
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Database file path
    #[serde(default)]
    pub database: Option<PathBuf>,
}

impl UserConfig {
    /// Load user configuration from the default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("todo-agent").join("config.toml"))
    }
}

/// Default database location under the platform data dir
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("todo-agent")
        .join("todos.db")
}

/// Resolve the database path: flag/env > config file > default
pub fn resolve_db_path(flag: Option<PathBuf>, config: &UserConfig) -> PathBuf {
    flag.or_else(|| config.storage.database.clone())
        .unwrap_or_else(default_db_path)
}
