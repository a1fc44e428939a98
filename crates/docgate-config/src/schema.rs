//! Configuration schema types.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use docgate_types::{InstanceCredentials, InstanceType};
use serde::{Deserialize, Serialize};

/// Top-level docgate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocgateConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// API key gate settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Store backend selection.
    #[serde(default)]
    pub store: StoreConfig,
    /// Per-cluster credentials.
    #[serde(default)]
    pub instances: InstancesConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}

/// API key gate configuration.
///
/// `api_key_path` has no default: a missing path must stop startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Header carrying the key. `API-Key` when unset.
    #[serde(default)]
    pub api_key_header: Option<String>,
    /// File holding the shared secret.
    #[serde(default)]
    pub api_key_path: Option<PathBuf>,
}

/// Which driver backs every instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongo,
    Sqlite,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mongo => "mongo",
            Self::Sqlite => "sqlite",
        })
    }
}

/// Store backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Directory for SQLite files. Ignored by the Mongo backend.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Connect and server-selection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl StoreConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            data_dir: default_data_dir(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_connect_timeout_secs() -> u64 {
    10
}

/// Credentials for one cluster, as written in config.
///
/// Every field defaults to empty so an unconfigured instance fails
/// validation and is skipped at startup.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsConfig {
    pub fn to_credentials(&self) -> InstanceCredentials {
        InstanceCredentials::new(
            self.identifier.clone(),
            self.host.clone(),
            self.port,
            self.user.clone(),
            self.password.clone(),
        )
    }

    /// Whether any field was set at all.
    pub fn is_configured(&self) -> bool {
        *self != Self::default()
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("identifier", &self.identifier)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credentials namespaced by instance type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstancesConfig {
    #[serde(default)]
    pub primary: CredentialsConfig,
    #[serde(default)]
    pub network: CredentialsConfig,
    #[serde(default)]
    pub game: CredentialsConfig,
}

impl InstancesConfig {
    pub fn for_type(&self, instance_type: InstanceType) -> &CredentialsConfig {
        match instance_type {
            InstanceType::Primary => &self.primary,
            InstanceType::Network => &self.network,
            InstanceType::Game => &self.game,
        }
    }

    pub fn credentials(&self, instance_type: InstanceType) -> InstanceCredentials {
        self.for_type(instance_type).to_credentials()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "docgate_runtime=trace").
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
