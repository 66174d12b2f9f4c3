//! Configuration management for TaskFlow.
//!
//! Loads configuration from ${TASKFLOW_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Default base URL of the TaskFlow API server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

pub mod paths {
    //! Path resolution for TaskFlow configuration and credential files.
    //!
    //! TASKFLOW_HOME resolution order:
    //! 1. TASKFLOW_HOME environment variable (if set)
    //! 2. ~/.config/taskflow (default)

    use std::path::PathBuf;

    /// Returns the TaskFlow home directory.
    ///
    /// Checks TASKFLOW_HOME env var first, falls back to ~/.config/taskflow
    pub fn taskflow_home() -> PathBuf {
        if let Ok(home) = std::env::var("TASKFLOW_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("taskflow"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        taskflow_home().join("config.toml")
    }

    /// Returns the path to the persisted session credentials.
    pub fn session_path() -> PathBuf {
        taskflow_home().join("session.json")
    }
}

/// Client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the TaskFlow API server.
    pub api_base_url: Option<String>,
}

impl Config {
    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a config file with the default template.
    ///
    /// Fails if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            bail!("Config already exists at {}", path.display());
        }
        Self::write_config(path, default_config_template())
    }

    /// Saves only the `api_base_url` field, preserving other fields and
    /// comments using `toml_edit`.
    pub fn save_base_url_to(path: &Path, base_url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["api_base_url"] = value(base_url);

        Self::write_config(path, &doc.to_string())
    }

    fn write_config(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

/// Resolves the API base URL with precedence: override > env > config > default.
///
/// The override comes from the CLI flag. The env var is `TASKFLOW_API_URL`.
pub fn resolve_base_url(override_url: Option<&str>, config_url: Option<&str>) -> Result<String> {
    if let Some(flag) = override_url {
        let trimmed = flag.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.trim_end_matches('/').to_string());
        }
    }

    if let Ok(env_url) = std::env::var("TASKFLOW_API_URL") {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.trim_end_matches('/').to_string());
        }
    }

    if let Some(config_url) = config_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.trim_end_matches('/').to_string());
        }
    }

    Ok(DEFAULT_BASE_URL.to_string())
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid TaskFlow API base URL: {url}"))?;
    Ok(())
}

fn default_config_template() -> &'static str {
    r#"# TaskFlow client configuration
# See `taskflow config path` for where this file lives.

# Base URL of the TaskFlow API server.
# Overridden by the TASKFLOW_API_URL environment variable and --api-url.
# api_base_url = "http://localhost:5001"
"#
}
