//! Global configuration loader for Switchboard.
//!
//! Reads `config.toml` from the data directory (`~/.switchboard/` in
//! production) and deserializes it into [`GlobalConfig`]. Falls back to
//! defaults when the file is missing or malformed. The API key never lives
//! in the config file; it is taken from the environment and wrapped in
//! [`SecretString`].

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use switchboard_types::config::GlobalConfig;

/// Environment variables consulted for the completion backend API key,
/// in order.
const API_KEY_ENV_VARS: [&str; 2] = ["SWITCHBOARD_API_KEY", "OPENAI_API_KEY"];

/// Resolve the data directory: `~/.switchboard`, or `./.switchboard` when
/// no home directory can be determined.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".switchboard")
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Read the completion backend API key from the environment.
pub fn api_key_from_env() -> Option<SecretString> {
    for var in API_KEY_ENV_VARS {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                return Some(SecretString::from(value));
            }
        }
    }
    None
}
