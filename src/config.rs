use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_SEARCH_PATH;
use crate::api::types::{DEFAULT_IMAGE_BASE_URL, DEFAULT_POSTER_SIZE, ImageHost};

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "MOVIESEARCH_API_URL";

/// Local development backend.
const DEV_API_URL: &str = "http://127.0.0.1:8000/api";
/// Hosted backend used by release builds.
const PROD_API_URL: &str = "https://your-backend-app.onrender.com/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default = "default_search_path")]
    pub search_path: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_poster_size")]
    pub poster_size: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_fps: f64,
}

fn default_search_path() -> String {
    DEFAULT_SEARCH_PATH.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_poster_size() -> String {
    DEFAULT_POSTER_SIZE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_tick_rate() -> f64 {
    30.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            search_path: default_search_path(),
            image_base_url: default_image_base_url(),
            poster_size: default_poster_size(),
            request_timeout_secs: default_request_timeout_secs(),
            tick_rate_fps: default_tick_rate(),
        }
    }
}

impl AppConfig {
    pub fn image_host(&self) -> ImageHost {
        ImageHost {
            base_url: self.image_base_url.clone(),
            size: self.poster_size.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/moviesearch"))
}

fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

pub fn load_config() -> AppConfig {
    let Some(path) = config_path() else {
        return AppConfig::default();
    };

    let Ok(contents) = fs::read_to_string(&path) else {
        return AppConfig::default();
    };

    parse_config(&contents)
}

fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!("ignoring invalid config file: {e}");
        AppConfig::default()
    })
}

/// Return candidate .env paths in priority order.
fn env_file_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = config_dir() {
        paths.push(dir.join(".env"));
    }
    paths.push(PathBuf::from(".env"));
    paths
}

/// Load `.env` files. Earlier files win because dotenvy does NOT overwrite
/// variables that are already set.
pub fn load_env_files() {
    for path in env_file_paths() {
        if path.exists()
            && let Err(e) = dotenvy::from_path(&path)
        {
            tracing::warn!(path = %path.display(), "failed to load .env file: {e}");
        }
    }
}

/// Resolve the backend base URL from CLI flag, environment and config file.
pub fn resolve_api_url(cli_override: Option<&str>, config: &AppConfig) -> String {
    let env = std::env::var(API_URL_ENV).ok();
    pick_api_url(cli_override, env.as_deref(), config.api_url.as_deref())
}

/// Priority: CLI flag > environment > config file > built-in default.
/// Empty values count as unset.
fn pick_api_url(cli: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
    [cli, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_api_url().to_string())
}

fn default_api_url() -> &'static str {
    if cfg!(debug_assertions) {
        DEV_API_URL
    } else {
        PROD_API_URL
    }
}
