use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored short link.
///
/// Records are created once and never updated; they are removed only by
/// an explicit delete from their owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The globally unique short code.
    pub code: ShortCode,
    /// The destination the code redirects to. Not validated for well-formedness.
    pub original_url: String,
    /// Email of the owning user, `None` for anonymous links.
    pub owner: Option<String>,
    /// When the record was created.
    pub created_at: Timestamp,
}

impl LinkRecord {
    /// Builds a record stamped with the current time.
    pub fn new(code: ShortCode, original_url: impl Into<String>, owner: Option<String>) -> Self {
        Self {
            code,
            original_url: original_url.into(),
            owner,
            created_at: Timestamp::now(),
        }
    }

    /// Returns `true` if this record belongs to the given scope.
    pub fn in_scope(&self, scope: &LinkScope<'_>) -> bool {
        match scope {
            LinkScope::All => true,
            LinkScope::Anonymous => self.owner.is_none(),
            LinkScope::Owner(email) => self.owner.as_deref() == Some(*email),
        }
    }
}

/// Filter for listing and counting links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope<'a> {
    /// Every record.
    All,
    /// Records created without a signed-in user.
    Anonymous,
    /// Records owned by the user with this email.
    Owner(&'a str),
}

impl<'a> LinkScope<'a> {
    /// The scope matching an optional owner: `Owner` when present, `Anonymous` otherwise.
    pub fn for_owner(owner: Option<&'a str>) -> Self {
        match owner {
            Some(email) => LinkScope::Owner(email),
            None => LinkScope::Anonymous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: Option<&str>) -> LinkRecord {
        LinkRecord::new(
            ShortCode::new_unchecked("abcd"),
            "https://example.com",
            owner.map(str::to_string),
        )
    }

    #[test]
    fn scope_matching() {
        let anonymous = record(None);
        let owned = record(Some("a@example.com"));

        assert!(anonymous.in_scope(&LinkScope::All));
        assert!(anonymous.in_scope(&LinkScope::Anonymous));
        assert!(!anonymous.in_scope(&LinkScope::Owner("a@example.com")));

        assert!(owned.in_scope(&LinkScope::All));
        assert!(!owned.in_scope(&LinkScope::Anonymous));
        assert!(owned.in_scope(&LinkScope::Owner("a@example.com")));
        assert!(!owned.in_scope(&LinkScope::Owner("b@example.com")));
    }

    #[test]
    fn for_owner() {
        assert_eq!(LinkScope::for_owner(None), LinkScope::Anonymous);
        assert_eq!(
            LinkScope::for_owner(Some("a@example.com")),
            LinkScope::Owner("a@example.com")
        );
    }
}
