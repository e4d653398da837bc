//! Request fingerprints
//!
//! Stable cache keys for idempotent lookups.

use std::fmt;

use crate::protocol::QueryKind;

/// Cache key derived from a query kind and its target
///
/// Rendered as `query,<Kind>,<target>`. Kind names never contain a comma,
/// so two different (kind, target) pairs cannot render to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestFingerprint(String);

impl RequestFingerprint {
    pub fn new(kind: QueryKind, target: &str) -> Self {
        Self(format!("query,{},{}", kind.as_str(), target))
    }

    /// Fingerprint for a group metadata lookup
    pub fn group_metadata(jid: &str) -> Self {
        Self::new(QueryKind::GroupMetadata, jid)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
