use std::path::{Path, PathBuf};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.cache.root)?;
        Ok(())
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache.root
    }
}

/// Photo-search endpoint credentials and location.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://api.flickr.com/services/rest/".to_owned()
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct CacheConfig {
    /// Root directory of the on-disk image cache.
    #[serde(default = "default_cache_root")]
    pub root: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: default_cache_root(),
        }
    }
}

fn default_cache_root() -> PathBuf {
    PathBuf::from("cache/images")
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SearchConfig {
    /// Cap on photo records materialized per pin.
    #[serde(default = "default_max_photos")]
    pub max_photos: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_photos: default_max_photos(),
        }
    }
}

fn default_max_photos() -> usize {
    24
}
