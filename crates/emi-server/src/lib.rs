//! # EMI Server
//!
//! HTTP front end for the EMI calculator.
//!
//! - `POST /calculate` with `{"loan_amount", "interest_rate", "loan_tenure"}`
//! - `GET /health`
//!
//! ## Usage
//!
//! ```ignore
//! use emi_server::{Server, ServerConfig};
//!
//! let server = Server::new(ServerConfig::default());
//! server.start().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use std::io::ErrorKind;
use std::net::IpAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use config::ServerConfig;
pub use error::ServerError;

/// The EMI server.
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Create a new server.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        routes::create_router(self.config.clone()).layer(TraceLayer::new_for_http())
    }

    /// Start the server.
    pub async fn start(&self) -> Result<(), ServerError> {
        let listener = bind_listener(&self.config).await?;
        info!("Starting EMI server on {}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Bind the configured address, moving up through the fallback range when the
/// port is already in use and `port_fallback` is set.
pub async fn bind_listener(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let ip: IpAddr = config
        .host
        .parse()
        .map_err(|_| ServerError::InvalidHost(config.host.clone()))?;

    match TcpListener::bind((ip, config.port)).await {
        Ok(listener) => Ok(listener),
        Err(e) if e.kind() == ErrorKind::AddrInUse && config.port_fallback => {
            for port in config.port.saturating_add(1)..config.fallback_port_end {
                if let Ok(listener) = TcpListener::bind((ip, port)).await {
                    warn!("Port {} in use. Switching to port {}...", config.port, port);
                    return Ok(listener);
                }
            }
            Err(ServerError::NoFreePort {
                host: config.host.clone(),
                start: config.port,
                end: config.fallback_port_end,
            })
        }
        Err(e) => Err(e.into()),
    }
}
