//! Connection string construction.

use docgate_types::InstanceCredentials;

/// Database the cluster user authenticates against.
pub const AUTH_DATABASE: &str = "admin";

/// Builds `mongodb://<user>:<password>@<host>:<port>/admin`.
///
/// User and password are percent-encoded so reserved characters in
/// generated passwords survive URI parsing.
pub fn connection_uri(credentials: &InstanceCredentials) -> String {
    format!(
        "mongodb://{}:{}@{}:{}/{AUTH_DATABASE}",
        urlencoding::encode(&credentials.user),
        urlencoding::encode(&credentials.password),
        credentials.host,
        credentials.port,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_admin_uri() {
        let creds = InstanceCredentials::new("m", "db.internal", 27017, "gw", "p".repeat(21));
        assert_eq!(
            connection_uri(&creds),
            format!("mongodb://gw:{}@db.internal:27017/admin", "p".repeat(21))
        );
    }

    #[test]
    fn encodes_reserved_characters() {
        let creds = InstanceCredentials::new("m", "h", 1, "us@r", "pa:ss/word@1234567890123");
        let uri = connection_uri(&creds);
        assert!(uri.starts_with("mongodb://us%40r:pa%3Ass%2Fword%401234567890123@h:1/"));
    }
}
