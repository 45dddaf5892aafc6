use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::api::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::errors::{SmolchatError, SmolchatResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub model: String,
    pub wrap_cols: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            wrap_cols: 80,
            log_level: "info".to_string(),
        }
    }
}

/// Loads the config from the default location, creating it with defaults on
/// first run. `OLLAMA_HOST` and `SMOLCHAT_MODEL` override the file.
pub fn load() -> SmolchatResult<Config> {
    let path = default_config_path()?;
    load_from(&path)
}

pub fn load_from(path: &Path) -> SmolchatResult<Config> {
    let mut config = if path.exists() {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw)?
    } else {
        let config = Config::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&config)?)?;
        config
    };

    if let Ok(url) = dotenv::var("OLLAMA_HOST") {
        config.base_url = url;
    }
    if let Ok(model) = dotenv::var("SMOLCHAT_MODEL") {
        config.model = model;
    }

    validate_config(&config)?;
    Ok(config)
}

fn default_config_path() -> SmolchatResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| SmolchatError::config_error("could not determine config directory"))?;
    Ok(config_dir.join("smolchat").join("config.json"))
}

fn validate_config(config: &Config) -> SmolchatResult<()> {
    if config.model.is_empty() {
        return Err(SmolchatError::config_error("model name is required"));
    }

    if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
        return Err(SmolchatError::config_error(format!(
            "base_url must be an http(s) URL, got {}",
            config.base_url
        )));
    }

    if config.wrap_cols == 0 {
        return Err(SmolchatError::config_error(
            "wrap_cols must be greater than 0",
        ));
    }

    Ok(())
}
