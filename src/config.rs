//! Persistent application configuration model and defaults.

use std::path::{Path, PathBuf};

use log::{info, warn};

/// Root configuration persisted to `cinedex.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    #[serde(default)]
    /// Catalog backend selection and location.
    pub storage: StorageConfig,
    #[serde(default)]
    /// Online metadata lookup preferences.
    pub metadata: MetadataConfig,
    #[serde(default)]
    /// Static website export preferences.
    pub website: WebsiteConfig,
    #[serde(default)]
    /// Rating histogram export preferences.
    pub histogram: HistogramConfig,
}

/// Which catalog backend to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_catalog_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct MetadataConfig {
    #[serde(default = "default_metadata_endpoint")]
    pub endpoint: String,
    /// Blank disables online lookup; the add command falls back to
    /// manual entry.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            endpoint: default_metadata_endpoint(),
            api_key: String::new(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct WebsiteConfig {
    #[serde(default = "default_website_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_page_title")]
    pub page_title: String,
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        Self {
            output_path: default_website_path(),
            page_title: default_page_title(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct HistogramConfig {
    #[serde(default = "default_histogram_width")]
    pub width: u32,
    #[serde(default = "default_histogram_height")]
    pub height: u32,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            width: default_histogram_width(),
            height: default_histogram_height(),
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cinedex")
}

fn default_catalog_path() -> PathBuf {
    data_dir().join("movies.json")
}

fn default_website_path() -> PathBuf {
    data_dir().join("index.html")
}

fn default_metadata_endpoint() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_page_title() -> String {
    "My Movie Catalog".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_read_timeout_secs() -> u64 {
    7
}

fn default_histogram_width() -> u32 {
    640
}

fn default_histogram_height() -> u32 {
    400
}

const MIN_HISTOGRAM_WIDTH: u32 = 160;
const MIN_HISTOGRAM_HEIGHT: u32 = 120;

/// Location of the config file under the user config dir.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cinedex")
        .join("cinedex.toml")
}

/// Reads the config file, creating it with defaults when missing.
/// Unreadable or unparsable files fall back to defaults with a logged
/// warning rather than aborting startup.
pub fn load_or_create(path: &Path) -> Config {
    if !path.exists() {
        let default_config = Config::default();
        info!(
            "Config file not found. Creating default config. path={}",
            path.display()
        );
        if let Some(parent) = path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                warn!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    err
                );
            }
        }
        match toml::to_string(&default_config) {
            Ok(text) => {
                if let Err(err) = std::fs::write(path, text) {
                    warn!("Failed to write default config {}: {}", path.display(), err);
                }
            }
            Err(err) => warn!("Failed to serialize default config: {}", err),
        }
        return default_config;
    }

    let config_content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!(
                "Failed to read config file {}. Using defaults. error={}",
                path.display(),
                err
            );
            return Config::default();
        }
    };

    let config = match toml::from_str::<Config>(&config_content) {
        Ok(config) => config,
        Err(err) => {
            warn!(
                "Failed to parse config file {}. Using defaults. error={}",
                path.display(),
                err
            );
            Config::default()
        }
    };
    sanitize_config(config)
}

/// Clamps values a hand-edited file could have pushed out of range.
pub fn sanitize_config(mut config: Config) -> Config {
    config.metadata.api_key = config.metadata.api_key.trim().to_string();
    if config.metadata.connect_timeout_secs == 0 {
        config.metadata.connect_timeout_secs = default_connect_timeout_secs();
    }
    if config.metadata.read_timeout_secs == 0 {
        config.metadata.read_timeout_secs = default_read_timeout_secs();
    }
    config.histogram.width = config.histogram.width.max(MIN_HISTOGRAM_WIDTH);
    config.histogram.height = config.histogram.height.max(MIN_HISTOGRAM_HEIGHT);
    config
}
