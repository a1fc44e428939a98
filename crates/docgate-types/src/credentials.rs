//! Per-cluster connection parameters and their validation rules.

use std::fmt;

use thiserror::Error;

/// Minimum accepted password length for a cluster user.
pub const MIN_PASSWORD_LEN: usize = 21;

/// Reasons a set of credentials is rejected before any connection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("the identifier value is empty")]
    EmptyIdentifier,
    #[error("the host value is empty")]
    EmptyHost,
    #[error("the port must be greater than 0")]
    InvalidPort,
    #[error("the user value is empty")]
    EmptyUser,
    #[error("the password is empty or shorter than {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
}

/// Connection parameters for one cluster.
///
/// Built once at startup from configuration and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct InstanceCredentials {
    /// Logical name of the cluster. Not used when connecting.
    pub identifier: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl InstanceCredentials {
    /// Creates a credentials record without validating it.
    pub fn new(
        identifier: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
        }
    }

    /// Checks every field invariant, reporting the first violation.
    ///
    /// # Errors
    ///
    /// Returns the `CredentialsError` naming the offending field.
    pub fn validate(&self) -> Result<(), CredentialsError> {
        if self.identifier.is_empty() {
            return Err(CredentialsError::EmptyIdentifier);
        }
        if self.host.is_empty() {
            return Err(CredentialsError::EmptyHost);
        }
        if self.port == 0 {
            return Err(CredentialsError::InvalidPort);
        }
        if self.user.is_empty() {
            return Err(CredentialsError::EmptyUser);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CredentialsError::WeakPassword);
        }
        Ok(())
    }
}

impl fmt::Debug for InstanceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceCredentials")
            .field("identifier", &self.identifier)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> InstanceCredentials {
        InstanceCredentials::new(
            "game-eu-1",
            "10.0.0.4",
            27017,
            "gateway",
            "correct-horse-battery-staple",
        )
    }

    #[test]
    fn valid_credentials_pass() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn empty_identifier_rejected() {
        let mut c = valid();
        c.identifier.clear();
        assert_eq!(c.validate(), Err(CredentialsError::EmptyIdentifier));
    }

    #[test]
    fn empty_host_rejected() {
        let mut c = valid();
        c.host.clear();
        assert_eq!(c.validate(), Err(CredentialsError::EmptyHost));
    }

    #[test]
    fn zero_port_rejected() {
        let mut c = valid();
        c.port = 0;
        assert_eq!(c.validate(), Err(CredentialsError::InvalidPort));
    }

    #[test]
    fn empty_user_rejected() {
        let mut c = valid();
        c.user.clear();
        assert_eq!(c.validate(), Err(CredentialsError::EmptyUser));
    }

    #[test]
    fn password_length_boundary() {
        let mut c = valid();
        c.password = "a".repeat(MIN_PASSWORD_LEN - 1);
        assert_eq!(c.validate(), Err(CredentialsError::WeakPassword));
        c.password = "a".repeat(MIN_PASSWORD_LEN);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("correct-horse"));
        assert!(rendered.contains("<redacted>"));
    }
}
