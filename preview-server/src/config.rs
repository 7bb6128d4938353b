//! Server configuration.
//!
//! Defaults, then an optional TOML file, then environment overrides.
//!
//! ```toml
//! # ~/.smile-preview/config.toml
//! bind = "0.0.0.0:3000"
//! gemini_api_key = "..."
//! references_dir = "/srv/preview/references"
//! app_url = "https://preview.example.com"
//! allowed_domains = ["supabase.co", "supabase.in"]
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::http::HeaderValue;
use preview_core::source::default_allowed_domains;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_REFERENCES_DIR: &str = "references";

/// Extra domain the image proxy accepts on top of the transform allow list
const PROXY_EXTRA_DOMAIN: &str = "natural.clinic";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid bind address '{0}'")]
    InvalidBind(String),

    #[error("Invalid app URL '{0}': must be an http(s) origin")]
    InvalidAppUrl(String),

    #[error("Allowed domain list is empty")]
    EmptyAllowList,
}

/// File layer; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    bind: Option<String>,
    gemini_api_key: Option<String>,
    gemini_api_base: Option<String>,
    references_dir: Option<PathBuf>,
    app_url: Option<String>,
    allowed_domains: Option<Vec<String>>,
    proxy_allowed_domains: Option<Vec<String>>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Config file that was loaded, if any
    pub config_path: Option<PathBuf>,
    pub bind: SocketAddr,
    pub gemini_api_key: Option<String>,
    /// Overrides the public Gemini endpoint
    pub gemini_api_base: Option<String>,
    /// Directory holding the hair reference photos
    pub references_dir: PathBuf,
    /// Allowed CORS origin; any origin when unset
    pub app_url: Option<String>,
    /// Storage domains a transform source image may come from
    pub allowed_domains: Vec<String>,
    /// Domains the image proxy may fetch from
    pub proxy_allowed_domains: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let allowed_domains = default_allowed_domains();
        let mut proxy_allowed_domains = allowed_domains.clone();
        proxy_allowed_domains.push(PROXY_EXTRA_DOMAIN.to_string());

        Self {
            config_path: None,
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            gemini_api_key: None,
            gemini_api_base: None,
            references_dir: PathBuf::from(DEFAULT_REFERENCES_DIR),
            app_url: None,
            allowed_domains,
            proxy_allowed_domains,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// The file is `$PREVIEW_CONFIG` when set, otherwise
    /// `~/.smile-preview/config.toml` if it exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load with an explicit variable lookup
    pub fn load_with<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let path = match env("PREVIEW_CONFIG") {
            Some(explicit) => Some(PathBuf::from(explicit)),
            None => default_config_path().filter(|p| p.exists()),
        };

        let mut config = Config::default();
        if let Some(path) = path {
            let file = read_file(&path)?;
            config.apply_file(file)?;
            config.config_path = Some(path);
        }

        if let Some(bind) = env("PREVIEW_BIND") {
            config.bind = parse_bind(&bind)?;
        }
        if let Some(key) = env("GEMINI_API_KEY") {
            config.gemini_api_key = Some(key);
        }
        if let Some(base) = env("GEMINI_API_BASE") {
            config.gemini_api_base = Some(base);
        }
        if let Some(dir) = env("PREVIEW_REFERENCES_DIR") {
            config.references_dir = PathBuf::from(dir);
        }
        if let Some(url) = env("NEXT_PUBLIC_APP_URL") {
            config.app_url = Some(url);
        }
        if let Some(domains) = env("PREVIEW_ALLOWED_DOMAINS") {
            config.allowed_domains = split_domains(&domains);
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<(), ConfigError> {
        if let Some(bind) = file.bind {
            self.bind = parse_bind(&bind)?;
        }
        if file.gemini_api_key.is_some() {
            self.gemini_api_key = file.gemini_api_key;
        }
        if file.gemini_api_base.is_some() {
            self.gemini_api_base = file.gemini_api_base;
        }
        if let Some(dir) = file.references_dir {
            self.references_dir = dir;
        }
        if file.app_url.is_some() {
            self.app_url = file.app_url;
        }
        if let Some(domains) = file.allowed_domains {
            self.allowed_domains = domains;
        }
        if let Some(domains) = file.proxy_allowed_domains {
            self.proxy_allowed_domains = domains;
        }
        Ok(())
    }

    /// Check values that can only be judged together
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.app_url {
            let lowered = url.to_ascii_lowercase();
            let has_scheme = lowered.starts_with("http://") || lowered.starts_with("https://");
            if !has_scheme || HeaderValue::from_str(url).is_err() {
                return Err(ConfigError::InvalidAppUrl(url.clone()));
            }
        }
        if self.allowed_domains.iter().all(|d| d.trim().is_empty()) {
            return Err(ConfigError::EmptyAllowList);
        }
        Ok(())
    }

    /// CORS origin, without a trailing slash
    pub fn cors_origin(&self) -> Option<&str> {
        self.app_url.as_deref().map(|url| url.trim_end_matches('/'))
    }

    pub fn has_api_key(&self) -> bool {
        self.gemini_api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".smile-preview").join("config.toml"))
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_bind(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBind(raw.to_string()))
}

fn split_domains(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}
