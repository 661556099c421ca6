//! Server errors.

use thiserror::Error;

/// Errors raised while configuring or starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Socket or filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Invalid configuration in {path}: {reason}")]
    Config {
        /// Path of the offending file
        path: String,
        /// Parser message
        reason: String,
    },

    /// `host` is not an IP address
    #[error("Invalid bind host: {0}")]
    InvalidHost(String),

    /// Requested port and every fallback port were taken
    #[error("No free port found on {host} in {start}..{end}")]
    NoFreePort {
        /// Bind host
        host: String,
        /// First port tried
        start: u16,
        /// End of the fallback range (exclusive)
        end: u16,
    },
}
