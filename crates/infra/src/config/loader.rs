//! Configuration loader
//!
//! Loads [`ClientSettings`] from a file and environment variables.
//!
//! ## Loading Strategy
//! 1. Search standard locations for a settings file; use defaults if none
//! 2. Apply environment variable overrides on top
//! 3. Validate the resulting URLs
//!
//! ## Environment Variables
//! - `SMARTTHINGS_BASE_URL`: REST API root
//! - `SMARTTHINGS_AUTH_URL`: OAuth token endpoint
//! - `SMARTTHINGS_KEY_API_URL`: key service root
//! - `SMARTTHINGS_API_VERSION`: version for the vendor `Accept` media type
//! - `SMARTTHINGS_LOGGING_ID`: correlation id sent on every request
//! - `SMARTTHINGS_LOCATION_ID`: default location scope
//! - `SMARTTHINGS_INSTALLED_APP_ID`: default installed app scope
//! - `SMARTTHINGS_TIMEOUT_SECS`: client-wide request timeout in seconds
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./smartthings.toml` or `./smartthings.json` (current working directory)
//! 2. The same names in the parent and grandparent directories
//! 3. Relative to executable location

use std::path::{Path, PathBuf};

use smartthings_domain::{ClientSettings, EndpointError, Result};
use url::Url;

const FILE_NAMES: [&str; 2] = ["smartthings.toml", "smartthings.json"];

/// Load settings: first file found (or defaults), then environment overrides.
///
/// # Errors
/// Returns `EndpointError::Configuration` if the file found cannot be parsed,
/// an override has an invalid value, or a URL is malformed.
pub fn load() -> Result<ClientSettings> {
    let settings = match find_config_path() {
        Some(path) => read_file(&path)?,
        None => {
            tracing::debug!("No settings file found, using defaults");
            ClientSettings::default()
        }
    };

    let settings = apply_env_overrides(settings)?;
    validate(&settings)?;
    Ok(settings)
}

/// Load settings from environment variables on top of the defaults.
///
/// # Errors
/// Returns `EndpointError::Configuration` for invalid values.
pub fn load_from_env() -> Result<ClientSettings> {
    let settings = apply_env_overrides(ClientSettings::default())?;
    validate(&settings)?;
    tracing::info!("Settings loaded from environment variables");
    Ok(settings)
}

/// Load settings from a file, without environment overrides.
///
/// # Errors
/// Returns `EndpointError::Configuration` if the file does not exist, its
/// format is unsupported or invalid, or a URL is malformed.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<ClientSettings> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EndpointError::Configuration(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let settings = read_file(path)?;
    validate(&settings)?;
    Ok(settings)
}

fn read_file(path: &Path) -> Result<ClientSettings> {
    tracing::info!(path = %path.display(), "Loading settings from file");

    let contents = std::fs::read_to_string(path).map_err(|e| {
        EndpointError::Configuration(format!("Failed to read config file: {e}"))
    })?;

    parse_config(&contents, path)
}

/// Parse settings by file extension (`.toml` or `.json`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientSettings> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| EndpointError::Configuration(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| EndpointError::Configuration(format!("Invalid JSON format: {e}"))),
        _ => Err(EndpointError::Configuration(format!("Unsupported config format: {extension}"))),
    }
}

/// Search standard locations for a settings file.
///
/// # Returns
/// The first file found, or `None` if no file exists.
pub fn find_config_path() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn apply_env_overrides(mut settings: ClientSettings) -> Result<ClientSettings> {
    if let Some(value) = env_var("SMARTTHINGS_BASE_URL") {
        settings.base_url = value;
    }
    if let Some(value) = env_var("SMARTTHINGS_AUTH_URL") {
        settings.auth_url = value;
    }
    if let Some(value) = env_var("SMARTTHINGS_KEY_API_URL") {
        settings.key_api_url = value;
    }
    if let Some(value) = env_var("SMARTTHINGS_API_VERSION") {
        settings.api_version = Some(value);
    }
    if let Some(value) = env_var("SMARTTHINGS_LOGGING_ID") {
        settings.logging_id = Some(value);
    }
    if let Some(value) = env_var("SMARTTHINGS_LOCATION_ID") {
        settings.location_id = Some(value);
    }
    if let Some(value) = env_var("SMARTTHINGS_INSTALLED_APP_ID") {
        settings.installed_app_id = Some(value);
    }
    if let Some(value) = env_var("SMARTTHINGS_TIMEOUT_SECS") {
        let secs = value.parse::<u64>().map_err(|e| {
            EndpointError::Configuration(format!("Invalid timeout '{value}': {e}"))
        })?;
        settings.timeout_secs = Some(secs);
    }
    Ok(settings)
}

/// Check that every URL parses and uses http or https.
fn validate(settings: &ClientSettings) -> Result<()> {
    for (name, value) in [
        ("base_url", &settings.base_url),
        ("auth_url", &settings.auth_url),
        ("key_api_url", &settings.key_api_url),
    ] {
        let url = Url::parse(value)
            .map_err(|e| EndpointError::Configuration(format!("{name}: invalid URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(EndpointError::Configuration(format!(
                "{name}: unsupported scheme '{}'",
                url.scheme()
            )));
        }
    }
    Ok(())
}

/// Non-empty environment variable value.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
