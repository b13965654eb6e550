//! Runtime configuration for the client.
//!
//! Layers, lowest to highest precedence: built-in defaults, the TOML config
//! file, the `ASSESS_RECS_ENDPOINT` environment variable, then `--endpoint`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Recommendation Service used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Environment variable overriding the service endpoint.
pub const ENDPOINT_ENV: &str = "ASSESS_RECS_ENDPOINT";

const APP_DIR_NAME: &str = "assess-recs";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    endpoint: Option<String>,
    storage_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the Recommendation Service (without `/recommend`).
    pub endpoint: String,
    /// JSON file holding persisted preferences.
    pub storage_path: PathBuf,
}

impl ClientConfig {
    /// Per-user directory for config and stored preferences.
    pub fn app_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME))
    }

    /// Load configuration from all layers.
    ///
    /// An explicit `config_path` must exist; the default config file is
    /// optional.
    pub fn load(config_path: Option<&Path>, endpoint_flag: Option<String>) -> Result<Self> {
        let app_dir = Self::app_dir();

        let file = match config_path {
            Some(path) => read_file_config(path)?,
            None => match app_dir.as_ref().map(|dir| dir.join("config.toml")) {
                Some(path) if path.is_file() => read_file_config(&path)?,
                _ => FileConfig::default(),
            },
        };

        let env_endpoint = std::env::var(ENDPOINT_ENV).ok();
        Ok(Self::resolve(file, env_endpoint, endpoint_flag, app_dir))
    }

    fn resolve(
        file: FileConfig,
        env_endpoint: Option<String>,
        endpoint_flag: Option<String>,
        app_dir: Option<PathBuf>,
    ) -> Self {
        // Blank values at any layer fall through to the next one
        let non_empty = |e: &String| !e.trim().is_empty();
        let endpoint = endpoint_flag
            .filter(non_empty)
            .or(env_endpoint.filter(non_empty))
            .or(file.endpoint.filter(non_empty))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let storage_path = file.storage_path.unwrap_or_else(|| {
            app_dir
                .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR_NAME)))
                .join("storage.json")
        });

        Self {
            endpoint,
            storage_path,
        }
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    debug!("Reading config from {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}
