//! Engine connection configuration.
//!
//! Supports configuration via environment variables:
//! - `TABULA_ENGINE_SERVER`: Engine server address
//! - `TABULA_ENGINE_DATABASE`: Model database name

use std::env;

/// Error type for connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Engine connection configuration.
///
/// Connection-string construction and credential handling happen outside
/// this crate; the provider only needs to know where the engine is and
/// which model database to introspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Engine server address.
    pub server: String,
    /// Model database name.
    pub database: String,
}

impl ConnectionConfig {
    /// Create a new connection config.
    pub fn new(server: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            database: database.into(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `TABULA_ENGINE_SERVER`: Engine server address
    /// - `TABULA_ENGINE_DATABASE`: Model database name
    pub fn from_env() -> Result<Self, ConnectionError> {
        let server = env::var("TABULA_ENGINE_SERVER")
            .map_err(|_| ConnectionError::MissingEnvVar("TABULA_ENGINE_SERVER".to_string()))?;
        let database = env::var("TABULA_ENGINE_DATABASE")
            .map_err(|_| ConnectionError::MissingEnvVar("TABULA_ENGINE_DATABASE".to_string()))?;

        if server.trim().is_empty() {
            return Err(ConnectionError::InvalidConfig(
                "engine server must not be empty".to_string(),
            ));
        }

        Ok(Self { server, database })
    }
}
