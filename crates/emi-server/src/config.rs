//! Server configuration.

use serde::{Deserialize, Serialize};

use crate::error::ServerError;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Try the following ports when `port` is already taken
    #[serde(default = "default_true")]
    pub port_fallback: bool,

    /// End of the fallback port range (exclusive)
    #[serde(default = "default_fallback_port_end")]
    pub fallback_port_end: u16,

    /// Longest tenure accepted by `/calculate`, in months
    #[serde(default = "default_max_tenure_months")]
    pub max_tenure_months: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_fallback_port_end() -> u16 {
    5100
}

fn default_max_tenure_months() -> u32 {
    1200
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            port_fallback: true,
            fallback_port_end: default_fallback_port_end(),
            max_tenure_months: default_max_tenure_months(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, ServerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|reason| ServerError::Config {
            path: path.to_string(),
            reason,
        })
    }

    /// Parse configuration from TOML text; missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}
