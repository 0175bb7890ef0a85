//! Global configuration.
//!
//! Loaded from `{data_dir}/config.toml` by the infra crate; every field
//! has a default so a missing or malformed file still yields a working
//! configuration. The backend API key is not part of this file -- it comes
//! from the environment and is wrapped in a secret type at the call site.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Switchboard service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Model identifier sent to the completion backend.
    pub model: String,
    /// Base URL of the completion backend.
    pub backend_base_url: String,
    /// Base URL of the browsing collaborator service.
    pub browse_base_url: String,
    /// Per-attempt timeout for the browsing collaborator, in seconds.
    pub browse_timeout_secs: u64,
    /// How many times the browsing client retries internally.
    pub browse_attempts: u32,
    /// How many trailing history turns are folded into the prompt context.
    pub max_history_turns: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            model: "gpt-5".to_string(),
            backend_base_url: "https://api.openai.com/v1".to_string(),
            browse_base_url: "http://localhost:8700".to_string(),
            browse_timeout_secs: 150,
            browse_attempts: 3,
            max_history_turns: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GlobalConfig::default();
        assert_eq!(config.model, "gpt-5");
        assert_eq!(config.browse_timeout_secs, 150);
        assert_eq!(config.browse_attempts, 3);
        assert_eq!(config.max_history_turns, 6);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: GlobalConfig = toml::from_str("model = \"gpt-5-mini\"").unwrap();
        assert_eq!(config.model, "gpt-5-mini");
        assert_eq!(config.browse_timeout_secs, 150);
    }
}
