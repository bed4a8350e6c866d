//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `PHARMACLOCK_STORE_URL`: Store base url (required)
//! - `PHARMACLOCK_STORE_API_KEY`: Store anon key (required)
//! - `PHARMACLOCK_USER_ID`: Employee user id (required)
//! - `PHARMACLOCK_ACCESS_TOKEN`: User session token
//! - `PHARMACLOCK_STORE_TIMEOUT`: Request timeout in seconds
//! - `PHARMACLOCK_LOCATION_LAT` / `PHARMACLOCK_LOCATION_LON`: Fixed position
//! - `PHARMACLOCK_LOCATION_ACCURACY`: Accuracy of the fixed position, meters
//! - `PHARMACLOCK_LOCATION_PERMISSION`: `granted`, `denied` or `prompt`
//! - `PHARMACLOCK_LOCATION_INTROSPECTION`: Whether permission can be queried
//! - `PHARMACLOCK_LOG_LEVEL`: Tracing filter directive
//! - `PHARMACLOCK_LOG_JSON`: JSON log output (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./pharmaclock.toml` or `./pharmaclock.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use pharmaclock_domain::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use pharmaclock_domain::{
    Config, EmployeeConfig, LocationConfig, LoggingConfig, PermissionState, PharmaClockError,
    RefreshConfig, Result, StoreConfig,
};
use uuid::Uuid;

const CONFIG_FILE_NAMES: [&str; 4] =
    ["pharmaclock.toml", "pharmaclock.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `PharmaClockError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or fail validation
pub fn load() -> Result<Config> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// The store url, api key and user id must be present; every other
/// setting falls back to its default.
///
/// # Errors
/// Returns `PharmaClockError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let url = env_var("PHARMACLOCK_STORE_URL")?;
    let api_key = env_var("PHARMACLOCK_STORE_API_KEY")?;
    let user_id = env_var("PHARMACLOCK_USER_ID").and_then(|s| {
        Uuid::parse_str(s.trim())
            .map_err(|e| PharmaClockError::Config(format!("Invalid user id: {}", e)))
    })?;
    let timeout_secs = env_parse("PHARMACLOCK_STORE_TIMEOUT")?.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

    let defaults = LocationConfig::default();
    let permission = match std::env::var("PHARMACLOCK_LOCATION_PERMISSION") {
        Ok(raw) => PermissionState::from_str(&raw)
            .map_err(|e| PharmaClockError::Config(e.detail().to_string()))?,
        Err(_) => defaults.permission,
    };
    let location = LocationConfig {
        latitude: env_parse("PHARMACLOCK_LOCATION_LAT")?,
        longitude: env_parse("PHARMACLOCK_LOCATION_LON")?,
        accuracy_meters: env_parse("PHARMACLOCK_LOCATION_ACCURACY")?,
        permission,
        permission_introspection: env_bool(
            "PHARMACLOCK_LOCATION_INTROSPECTION",
            defaults.permission_introspection,
        ),
        ..defaults
    };

    let logging_defaults = LoggingConfig::default();
    let logging = LoggingConfig {
        level: std::env::var("PHARMACLOCK_LOG_LEVEL").unwrap_or(logging_defaults.level),
        json: env_bool("PHARMACLOCK_LOG_JSON", logging_defaults.json),
    };

    Ok(Config {
        store: StoreConfig {
            url,
            api_key,
            access_token: std::env::var("PHARMACLOCK_ACCESS_TOKEN").ok(),
            timeout_secs,
        },
        employee: EmployeeConfig { user_id },
        location,
        refresh: RefreshConfig::default(),
        logging,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PharmaClockError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PharmaClockError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PharmaClockError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PharmaClockError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PharmaClockError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PharmaClockError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(PharmaClockError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the working directory, then the executable's directory, for a
/// config file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `PharmaClockError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        PharmaClockError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `PharmaClockError::Config` if the variable is set but invalid.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| PharmaClockError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
