//! Database and collection name rules shared by every adapter.
//!
//! An adapter resolves a `(database, collection)` pair to "absent" when
//! either name breaks these rules, instead of raising a driver error.

const DATABASE_FORBIDDEN: &[char] = &['/', '\\', '.', ' ', '"', '$', '\0'];

/// Maximum database name length accepted by the document store.
const MAX_DATABASE_LEN: usize = 63;

pub fn is_valid_database_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_DATABASE_LEN && !name.contains(DATABASE_FORBIDDEN)
}

pub fn is_valid_collection_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['$', '\0']) && !name.starts_with("system.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_valid() {
        assert!(is_valid_database_name("network"));
        assert!(is_valid_collection_name("proxies"));
        assert!(is_valid_collection_name("game.stats"));
    }

    #[test]
    fn empty_names_are_invalid() {
        assert!(!is_valid_database_name(""));
        assert!(!is_valid_collection_name(""));
    }

    #[test]
    fn database_rejects_forbidden_characters() {
        for name in ["a/b", "a.b", "a b", "a$b", "a\"b", "a\\b"] {
            assert!(!is_valid_database_name(name), "{name} should be rejected");
        }
        assert!(!is_valid_database_name(&"d".repeat(64)));
    }

    #[test]
    fn collection_rejects_reserved_forms() {
        assert!(!is_valid_collection_name("system.users"));
        assert!(!is_valid_collection_name("cash$"));
    }
}
