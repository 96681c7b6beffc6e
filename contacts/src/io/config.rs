//! Service configuration stored in `contacts.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "contacts.toml";

const KNOWN_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "HEAD", "PATCH", "OPTIONS"];

/// Contacts service configuration (TOML).
///
/// Missing fields default to local development values, so an absent file is
/// a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContactsConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub photos: PhotoConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file. Parent directories are created on open.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data").join("contacts.db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PhotoConfig {
    /// Directory holding `<id><ext>` photo files.
    pub directory: PathBuf,
    /// Prefix for returned photo URLs (no trailing slash). Empty gives
    /// host-relative URLs.
    pub public_base_url: String,
    /// Request body cap for photo uploads.
    pub max_upload_bytes: usize,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data").join("photos"),
            public_base_url: String::new(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CorsConfig {
    /// The single origin allowed to call the API.
    pub allowed_origin: String,
    pub allowed_methods: Vec<String>,
    pub allow_credentials: bool,
    /// Preflight cache duration.
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:3000".to_string(),
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "HEAD"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            allow_credentials: true,
            max_age_secs: 3600,
        }
    }
}

impl ContactsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.server.bind.trim().is_empty() {
            return Err(anyhow!("server.bind must be non-empty"));
        }
        if self.server.port == 0 {
            return Err(anyhow!("server.port must be > 0"));
        }
        if self.database.path.as_os_str().is_empty() {
            return Err(anyhow!("database.path must be non-empty"));
        }
        if self.photos.directory.as_os_str().is_empty() {
            return Err(anyhow!("photos.directory must be non-empty"));
        }
        if self.photos.public_base_url.ends_with('/') {
            return Err(anyhow!("photos.public_base_url must not end with '/'"));
        }
        if self.photos.max_upload_bytes == 0 {
            return Err(anyhow!("photos.max_upload_bytes must be > 0"));
        }
        if self.cors.allowed_origin.trim().is_empty() {
            return Err(anyhow!("cors.allowed_origin must be non-empty"));
        }
        if self.cors.allowed_origin.trim() == "*" {
            return Err(anyhow!("cors.allowed_origin must be a single origin, not '*'"));
        }
        if self.cors.allowed_methods.is_empty() {
            return Err(anyhow!("cors.allowed_methods must be a non-empty array"));
        }
        for method in &self.cors.allowed_methods {
            if !KNOWN_METHODS.contains(&method.as_str()) {
                return Err(anyhow!("cors.allowed_methods: unsupported method {method:?}"));
            }
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ContactsConfig::default()`.
pub fn load_config(path: &Path) -> Result<ContactsConfig> {
    if !path.exists() {
        let cfg = ContactsConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ContactsConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
