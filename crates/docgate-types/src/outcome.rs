//! Result taxonomy for repository mutations.

/// Closed set of results produced by create/update/delete.
///
/// These are expected, frequent results rather than errors: every caller
/// branches on them.
#[must_use = "every document outcome must be inspected"]
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation took effect; carries the relevant document state.
    Success(T),
    /// The collection could not be resolved on the target instance.
    NoSuchCollection,
    /// No document matched the filter.
    NoSuchDocument,
    /// A document with the same identifier is already stored.
    AlreadyExists,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the success payload, discarding failure variants.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Stable snake_case label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::NoSuchCollection => "no_such_collection",
            Self::NoSuchDocument => "no_such_document",
            Self::AlreadyExists => "already_exists",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_carries_payload() {
        let o = Outcome::Success(7);
        assert!(o.is_success());
        assert_eq!(o.success(), Some(7));
        assert_eq!(Outcome::<i32>::NoSuchDocument.success(), None);
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(Outcome::Success(7).label(), "success");
        assert_eq!(Outcome::<i32>::NoSuchCollection.label(), "no_such_collection");
        assert_eq!(Outcome::<i32>::NoSuchDocument.label(), "no_such_document");
        assert_eq!(Outcome::<i32>::AlreadyExists.label(), "already_exists");
    }
}
