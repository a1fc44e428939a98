//! # docgate-config
//!
//! Configuration management for docgate.
//! Supports layered config: defaults -> file -> env vars.

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError, ENV_PREFIX};
pub use schema::{
    AuthConfig, CredentialsConfig, DocgateConfig, InstancesConfig, LogFormat, LoggingConfig,
    ServerConfig, StoreBackend, StoreConfig,
};
