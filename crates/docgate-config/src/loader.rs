//! Configuration loader (defaults + file + env merge).

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use thiserror::Error;

use crate::schema::DocgateConfig;

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "DOCGATE_";

/// Top-level sections an env override may target.
const SECTIONS: [&str; 5] = ["server", "auth", "store", "instances", "logging"];

/// Credential fields kept verbatim from env, never parsed as numbers.
const CREDENTIAL_TEXT_FIELDS: [&str; 4] = ["identifier", "host", "user", "password"];

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to load or merge configuration.
    #[error("configuration error: {0}")]
    Load(String),
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(String),
}

/// Loads configuration by merging layers:
/// 1. Default values
/// 2. Config file (if given)
/// 3. Environment variables (`DOCGATE_` prefix, `__` separates nesting,
///    e.g. `DOCGATE_INSTANCES__GAME__HOST`)
///
/// Only env keys under a known section are read, so an unrelated
/// `DOCGATE_*` variable does not trip `deny_unknown_fields`. Credential
/// text fields (`identifier`, `host`, `user`, `password`) are taken as raw
/// strings: `DOCGATE_INSTANCES__GAME__USER=007` stays `"007"`.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if `config_path` points nowhere and
/// `ConfigError::Load` if any layer fails to parse.
pub fn load_config(config_path: Option<&str>) -> Result<DocgateConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(DocgateConfig::default()));

    if let Some(path) = config_path {
        if !std::path::Path::new(path).exists() {
            return Err(ConfigError::NotFound(path.to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    let env = Env::prefixed(ENV_PREFIX)
        .split("__")
        .filter(|key| is_known_section(key.as_str()));
    figment = figment.merge(env.clone().filter(|key| !is_credential_text(key.as_str())));
    for (key, value) in env.filter(|key| is_credential_text(key.as_str())).iter() {
        figment = figment.merge(Serialized::default(key.as_str(), value));
    }

    figment
        .extract()
        .map_err(|e| ConfigError::Load(e.to_string()))
}

fn is_known_section(key: &str) -> bool {
    let section = key.split('.').next().unwrap_or_default();
    SECTIONS.iter().any(|s| s.eq_ignore_ascii_case(section))
}

fn is_credential_text(key: &str) -> bool {
    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        [section, _, field] => {
            section.eq_ignore_ascii_case("instances")
                && CREDENTIAL_TEXT_FIELDS
                    .iter()
                    .any(|f| f.eq_ignore_ascii_case(field))
        }
        _ => false,
    }
}
