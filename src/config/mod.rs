//! Configuration: engine connection parameters and TOML settings.

mod connection;
mod settings;

pub use connection::{ConnectionConfig, ConnectionError};
pub use settings::{
    expand_env_vars, BridgeSettings, ConnectionSettings, Settings, SettingsError,
};
