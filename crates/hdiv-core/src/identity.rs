//! # Division Identifiers
//!
//! Newtype wrapper for division identifiers. Keeps ids from being mixed up
//! with file names, dates, or other free-form strings in the lint pipeline.
//!
//! Identifiers are opaque strings. The only structure the linter relies on is
//! the version suffix: `NO-03:1838` is the version of base division `NO-03`
//! that begins with the 1838 reform. Ids without a `:` are their own base.

use serde::{Deserialize, Serialize};

/// Identifier of a single division record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DivisionId(String);

impl DivisionId {
    /// Wrap a raw identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier with its last `:suffix` segment removed.
    ///
    /// All versions of one division share a base id.
    pub fn base(&self) -> &str {
        match self.0.rsplit_once(':') {
            Some((base, _)) => base,
            None => &self.0,
        }
    }
}

impl std::fmt::Display for DivisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DivisionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for DivisionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for DivisionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_strips_last_version_segment() {
        assert_eq!(DivisionId::new("NO-03:1838").base(), "NO-03");
        assert_eq!(DivisionId::new("NO:oslo:1948").base(), "NO:oslo");
    }

    #[test]
    fn base_of_unversioned_id_is_itself() {
        assert_eq!(DivisionId::new("NO-03").base(), "NO-03");
    }

    #[test]
    fn display_is_raw_string() {
        assert_eq!(DivisionId::new("NO-46:2020").to_string(), "NO-46:2020");
    }

    #[test]
    fn serde_is_transparent() {
        let id = DivisionId::new("NO-18");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"NO-18\"");
    }

    #[test]
    fn borrow_allows_str_lookup() {
        let mut set = std::collections::BTreeSet::new();
        set.insert(DivisionId::new("NO-11"));
        assert!(set.contains("NO-11"));
    }
}
