use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::Config;

pub const ENV_API_KEY: &str = "WAYPIN_API_KEY";
pub const ENV_BASE_URL: &str = "WAYPIN_BASE_URL";
pub const ENV_CACHE_ROOT: &str = "WAYPIN_CACHE_ROOT";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("api_key is required (set it in the config file or {ENV_API_KEY})")]
    MissingApiKey,
}

/// Load config from an optional file, `.env`, and the process environment.
///
/// Environment variables override file values; a missing file is fine as
/// long as the environment supplies the API key.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigLoadError> {
    // Missing .env is not an error.
    let _ = dotenvy::dotenv();

    let mut config = match path {
        Some(path) => parse(&std::fs::read_to_string(path).map_err(
            |source| ConfigLoadError::Read {
                path: path.to_path_buf(),
                source,
            },
        )?)?,
        None => parse("[api]\napi_key = \"\"\n")?,
    };

    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

pub fn load_from_path(path: &Path) -> Result<Config, ConfigLoadError> {
    load(Some(path))
}

/// Parse and validate a config document without touching the environment.
pub fn load_from_str(raw: &str) -> Result<Config, ConfigLoadError> {
    let config = parse(raw)?;
    validate(&config)?;
    Ok(config)
}

fn parse(raw: &str) -> Result<Config, ConfigLoadError> {
    Ok(toml::from_str(raw)?)
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(api_key) = std::env::var(ENV_API_KEY) {
        config.api.api_key = api_key;
    }
    if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
        config.api.base_url = base_url;
    }
    if let Ok(root) = std::env::var(ENV_CACHE_ROOT) {
        config.cache.root = PathBuf::from(root);
    }
}

fn validate(config: &Config) -> Result<(), ConfigLoadError> {
    if config.api.api_key.trim().is_empty() {
        return Err(ConfigLoadError::MissingApiKey);
    }
    Ok(())
}
