// Configuration loading and parsing (config/client.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use puckpool_core::config_files::seed_config_file;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// File name under `config/` (and `defaults/`).
const CONFIG_FILE: &str = "client.toml";

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
// client.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct ClientFile {
    server: ServerSection,
    storage: StorageSection,
    #[serde(default)]
    search: SearchSection,
}

#[derive(Debug, Clone, Deserialize)]
struct ServerSection {
    url: String,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct StorageSection {
    db_path: String,
    export_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchSection {
    #[serde(default = "default_debounce_ms")]
    debounce_ms: u64,
}

impl Default for SearchSection {
    fn default() -> Self {
        SearchSection {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_debounce_ms() -> u64 {
    300
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Proxy server base URL, without a trailing slash.
    pub server_url: String,
    pub request_timeout: Duration,
    pub db_path: String,
    pub export_dir: PathBuf,
    pub search_debounce: Duration,
}

/// Load and validate `config/client.toml` relative to `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let file: ClientFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let server_url = file.server.url.trim().trim_end_matches('/').to_string();
    if !(server_url.starts_with("http://") || server_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "server.url".into(),
            message: format!("must be an http(s) URL, got `{}`", file.server.url),
        });
    }
    if file.server.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "server.request_timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(Config {
        server_url,
        request_timeout: Duration::from_secs(file.server.request_timeout_secs),
        db_path: file.storage.db_path,
        export_dir: base_dir.join(file.storage.export_dir),
        search_debounce: Duration::from_millis(file.search.debounce_ms),
    })
}

/// Load config relative to the current working directory, seeding
/// `config/` from `defaults/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    seed_defaults(&cwd)?;
    load_config_from(&cwd)
}

/// Create `config/client.toml` from the shipped default on first run.
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_with_config(tag: &str, body: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("puckpool_tui_{tag}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/client.toml"), body).unwrap();
        tmp
    }

    fn defaults_text() -> String {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        fs::read_to_string(root.join("defaults/client.toml")).unwrap()
    }

    #[test]
    fn load_shipped_defaults() {
        let tmp = scratch_with_config("defaults", &defaults_text());
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.server_url, "http://127.0.0.1:3000");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.db_path, "puckpool.db");
        assert_eq!(config.export_dir, tmp.join("exports"));
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn search_section_is_optional() {
        let body = r#"
            [server]
            url = "http://localhost:4000/"

            [storage]
            db_path = ":memory:"
            export_dir = "out"
        "#;
        let tmp = scratch_with_config("no_search", body);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.server_url, "http://localhost:4000");
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn bad_server_url_is_rejected() {
        let body = defaults_text().replace("http://127.0.0.1:3000", "127.0.0.1:3000");
        let tmp = scratch_with_config("bad_url", &body);
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::ValidationError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_file_is_reported() {
        let tmp = std::env::temp_dir().join("puckpool_tui_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn first_run_seeds_config_from_defaults() {
        let tmp = std::env::temp_dir().join("puckpool_tui_seed");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults/client.toml"), defaults_text()).unwrap();

        seed_defaults(&tmp).unwrap();
        assert!(tmp.join("config/client.toml").is_file());
        assert!(load_config_from(&tmp).is_ok());

        // A later edit survives the next start.
        fs::write(tmp.join("config/client.toml"), "edited").unwrap();
        seed_defaults(&tmp).unwrap();
        assert_eq!(fs::read_to_string(tmp.join("config/client.toml")).unwrap(), "edited");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn seeding_without_defaults_or_config_is_not_found() {
        let tmp = std::env::temp_dir().join("puckpool_tui_seed_none");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            seed_defaults(&tmp),
            Err(ConfigError::FileNotFound { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }
}
