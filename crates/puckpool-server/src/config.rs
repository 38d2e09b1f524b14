// Configuration loading and parsing (config/server.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use puckpool_core::config_files::seed_config_file;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// File name under `config/` (and `defaults/`).
const CONFIG_FILE: &str = "server.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to create {path} from defaults: {source}")]
    Seed {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// server.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire server.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ServerFile {
    server: ServerSection,
    upstream: UpstreamConfig,
    cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct ServerSection {
    host: String,
    port: u16,
    static_dir: String,
}

/// Where and how to reach the NHL APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Player records search (`cayenneExp` name filter).
    pub records_url: String,
    /// Player profile base; `/{id}/landing` is appended.
    pub profile_url: String,
    /// Stats REST base; `/{skater|goalie}/summary` is appended.
    pub stats_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    /// Upper bound on cached entries; 0 leaves the cache unbounded.
    #[serde(default)]
    pub max_entries: usize,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/server.toml` relative to `base_dir`.
///
/// Relative `static_dir` paths are resolved against `base_dir`. This does not
/// copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let file: ServerFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        host: file.server.host,
        port: file.server.port,
        static_dir: base_dir.join(file.server.static_dir),
        upstream: file.upstream,
        cache: file.cache,
    };

    validate(&config)?;
    Ok(config)
}

/// Convenience wrapper: loads config relative to the current working
/// directory, copying defaults first and applying the `PORT` override.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    seed_defaults(&cwd)?;
    let mut config = load_config_from(&cwd)?;
    apply_port_override(&mut config, std::env::var("PORT").ok().as_deref())?;
    Ok(config)
}

/// Create `config/server.toml` from the shipped default on first run.
fn seed_defaults(base_dir: &Path) -> Result<(), ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    match seed_config_file(base_dir, CONFIG_FILE) {
        Ok(Some(written)) => {
            info!("Created {} from defaults", written.display());
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ConfigError::FileNotFound { path })
        }
        Err(source) => Err(ConfigError::Seed { path, source }),
    }
}

/// Apply a `PORT` environment value, if one is set.
pub fn apply_port_override(config: &mut Config, port: Option<&str>) -> Result<(), ConfigError> {
    let Some(raw) = port.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(());
    };
    config.port = raw.parse().map_err(|_| ConfigError::ValidationError {
        field: "PORT".into(),
        message: format!("not a valid port number: {raw}"),
    })?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.upstream.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "upstream.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "cache.ttl_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    let urls: &[(&str, &str)] = &[
        ("upstream.records_url", &config.upstream.records_url),
        ("upstream.profile_url", &config.upstream.profile_url),
        ("upstream.stats_url", &config.upstream.stats_url),
    ];
    for (field, url) in urls {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                field: field.to_string(),
                message: format!("must be an http(s) URL, got `{url}`"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
