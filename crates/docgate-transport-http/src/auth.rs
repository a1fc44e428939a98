//! Shared API key authentication for every inbound request.
//!
//! The secret is read once at startup. Each request either carries the
//! exact key in the configured header and proceeds with an
//! [`ApiKeyPrincipal`] in its extensions, or is answered with 401 and
//! never reaches a handler.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use docgate_config::AuthConfig;
use docgate_types::DiagnosticError;
use thiserror::Error;

use crate::envelope::Envelope;

/// Header read when none is configured.
pub const DEFAULT_API_KEY_HEADER: &str = "API-Key";

/// Cause sent with every 401.
pub const INVALID_API_KEY_CAUSE: &str = "Invalid API key";

/// Body sent if the 401 envelope cannot be serialized.
pub const FALLBACK_UNAUTHORIZED_BODY: &str = r#"{"success": false, "error": "Invalid API key"}"#;

/// Authentication errors. All but `InvalidKey` are fatal at startup.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no API key file is configured")]
    MissingKeyPath,
    #[error("cannot read API key file {path}: {source}")]
    UnreadableKeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("API key file {0} is empty")]
    EmptyKey(PathBuf),
    #[error("'{0}' is not a valid header name")]
    InvalidHeaderName(String),
    /// Per request: missing header or wrong value.
    #[error("invalid API key")]
    InvalidKey,
}

impl DiagnosticError for AuthError {
    fn hint(&self) -> Option<String> {
        match self {
            Self::MissingKeyPath => Some("docgate refuses to start without a shared API key.".into()),
            Self::UnreadableKeyFile { .. } => {
                Some("The API key file must exist and be readable by the service user.".into())
            }
            Self::EmptyKey(_) => Some("The API key file contains only whitespace.".into()),
            Self::InvalidHeaderName(_) => {
                Some("Header names may only contain visible ASCII token characters.".into())
            }
            Self::InvalidKey => None,
        }
    }

    fn fix(&self) -> Option<String> {
        match self {
            Self::MissingKeyPath | Self::UnreadableKeyFile { .. } | Self::EmptyKey(_) => Some(
                "Set auth.api_key_path (or DOCGATE_AUTH__API_KEY_PATH) to a file holding the key."
                    .into(),
            ),
            Self::InvalidHeaderName(_) => Some("Fix auth.api_key_header, e.g. \"API-Key\".".into()),
            Self::InvalidKey => None,
        }
    }
}

/// Reads the secret at `path`, trimming surrounding whitespace.
///
/// # Errors
///
/// Returns `AuthError::UnreadableKeyFile` if the file cannot be read and
/// `AuthError::EmptyKey` if nothing remains after trimming.
pub fn load_secret(path: &Path) -> Result<String, AuthError> {
    let raw = std::fs::read_to_string(path).map_err(|source| AuthError::UnreadableKeyFile {
        path: path.to_path_buf(),
        source,
    })?;
    let secret = raw.trim();
    if secret.is_empty() {
        return Err(AuthError::EmptyKey(path.to_path_buf()));
    }
    Ok(secret.to_string())
}

/// The identity attached to an authenticated request. Carries no roles.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeyPrincipal {
    key: Arc<str>,
}

impl ApiKeyPrincipal {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for ApiKeyPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyPrincipal")
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Compares a request header against the cached secret.
#[derive(Clone)]
pub struct ApiKeyGate {
    header: HeaderName,
    secret: Arc<str>,
}

impl ApiKeyGate {
    /// Builds a gate from an in-memory secret.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidHeaderName` for a malformed header and
    /// `AuthError::EmptyKey` for a blank secret.
    pub fn new(header: Option<&str>, secret: &str) -> Result<Self, AuthError> {
        let name = header.unwrap_or(DEFAULT_API_KEY_HEADER);
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| AuthError::InvalidHeaderName(name.to_string()))?;
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(AuthError::EmptyKey(PathBuf::new()));
        }
        Ok(Self {
            header,
            secret: Arc::from(secret),
        })
    }

    /// Builds a gate from configuration, reading the key file once.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingKeyPath` if no path is configured, or
    /// any error from [`load_secret`] and [`ApiKeyGate::new`].
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let path = config.api_key_path.as_deref().ok_or(AuthError::MissingKeyPath)?;
        let secret = load_secret(path)?;
        let gate = Self::new(config.api_key_header.as_deref(), &secret)?;
        tracing::info!(header = gate.header.as_str(), path = %path.display(), "API key loaded");
        Ok(gate)
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header
    }

    /// Accepts the request only if the header value equals the secret
    /// byte for byte.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidKey` for a missing or different value.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<ApiKeyPrincipal, AuthError> {
        match headers.get(&self.header) {
            Some(value) if value.as_bytes() == self.secret.as_bytes() => Ok(ApiKeyPrincipal {
                key: Arc::clone(&self.secret),
            }),
            _ => Err(AuthError::InvalidKey),
        }
    }
}

impl fmt::Debug for ApiKeyGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyGate")
            .field("header", &self.header)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// The 401 answer, degrading to a fixed literal if serialization fails.
pub fn unauthorized_response() -> Response {
    let envelope = Envelope::unauthorized(INVALID_API_KEY_CAUSE);
    let body = serde_json::to_string(&envelope)
        .unwrap_or_else(|_| FALLBACK_UNAUTHORIZED_BODY.to_string());
    (
        StatusCode::UNAUTHORIZED,
        [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response()
}

/// Middleware: authenticate, then attach the principal or stop with 401.
pub async fn require_api_key(
    State(gate): State<ApiKeyGate>,
    mut request: Request,
    next: Next,
) -> Response {
    match gate.authenticate(request.headers()) {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(_) => {
            tracing::debug!(path = %request.uri().path(), "rejected request with invalid API key");
            unauthorized_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn headers(name: &'static str, value: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(name, HeaderValue::from_static(value));
        h
    }

    #[test]
    fn matching_key_passes() {
        let gate = ApiKeyGate::new(None, "secret123").expect("gate");
        let principal = gate
            .authenticate(&headers("api-key", "secret123"))
            .expect("accepted");
        assert_eq!(principal.key(), "secret123");
    }

    #[test]
    fn wrong_key_rejected() {
        let gate = ApiKeyGate::new(None, "secret123").expect("gate");
        assert!(matches!(
            gate.authenticate(&headers("api-key", "secret12")),
            Err(AuthError::InvalidKey)
        ));
    }

    #[test]
    fn missing_header_rejected() {
        let gate = ApiKeyGate::new(None, "secret123").expect("gate");
        assert!(gate.authenticate(&HeaderMap::new()).is_err());
    }

    #[test]
    fn default_header_ignored_when_custom_configured() {
        let gate = ApiKeyGate::new(Some("X-Gateway-Key"), "secret123").expect("gate");
        assert!(gate.authenticate(&headers("api-key", "secret123")).is_err());
        assert!(gate
            .authenticate(&headers("x-gateway-key", "secret123"))
            .is_ok());
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        assert!(matches!(
            ApiKeyGate::new(Some("bad header"), "k"),
            Err(AuthError::InvalidHeaderName(_))
        ));
    }

    #[test]
    fn secret_file_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp");
        writeln!(file, "  abc123xyz-0123456789-key  ").expect("write");
        assert_eq!(
            load_secret(file.path()).expect("load"),
            "abc123xyz-0123456789-key"
        );
    }

    #[test]
    fn blank_secret_file_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp");
        writeln!(file, "   ").expect("write");
        assert!(matches!(load_secret(file.path()), Err(AuthError::EmptyKey(_))));
    }

    #[test]
    fn unreadable_secret_file_is_fatal() {
        let err = load_secret(Path::new("/no/such/docgate.key")).expect_err("missing");
        assert!(matches!(err, AuthError::UnreadableKeyFile { .. }));
        assert!(err.fix().is_some());
    }

    #[test]
    fn missing_path_in_config_is_fatal() {
        let err = ApiKeyGate::from_config(&AuthConfig::default()).expect_err("no path");
        assert!(matches!(err, AuthError::MissingKeyPath));
    }

    #[test]
    fn debug_never_shows_secret() {
        let gate = ApiKeyGate::new(None, "top-secret").expect("gate");
        assert!(!format!("{gate:?}").contains("top-secret"));
    }
}
