//! Request definitions
//!
//! Represents the logical requests a client can submit.

use serde_json::{json, Value};

use crate::group::GroupSetRequest;

/// Read-only lookups the service answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    GroupMetadata,
    InviteCode,
}

impl QueryKind {
    /// Name used on the wire and in cache fingerprints
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::GroupMetadata => "GroupMetadata",
            QueryKind::InviteCode => "inviteCode",
        }
    }
}

/// A request to submit through a connection
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Look something up about a target (usually a group jid)
    Query { kind: QueryKind, target: String },

    /// Join a group through an invite code
    AcceptInvite { code: String },

    /// Change group state (create, rename, membership, leave)
    SetGroup(GroupSetRequest),
}

impl Request {
    /// Metadata lookup for a group
    pub fn group_metadata(jid: impl Into<String>) -> Self {
        Request::Query {
            kind: QueryKind::GroupMetadata,
            target: jid.into(),
        }
    }

    /// Invite code lookup for a group
    pub fn invite_code(jid: impl Into<String>) -> Self {
        Request::Query {
            kind: QueryKind::InviteCode,
            target: jid.into(),
        }
    }

    /// Accept an invite code
    pub fn accept_invite(code: impl Into<String>) -> Self {
        Request::AcceptInvite { code: code.into() }
    }

    /// Build the JSON array sent on the wire
    pub fn to_value(&self) -> Value {
        match self {
            Request::Query { kind, target } => json!(["query", kind.as_str(), target]),
            Request::AcceptInvite { code } => json!(["action", "invite", code]),
            Request::SetGroup(set) => json!(["action", set.action().as_str(), set]),
        }
    }

    /// Short label for logging
    pub fn label(&self) -> String {
        match self {
            Request::Query { kind, target } => format!("query {} {}", kind.as_str(), target),
            Request::AcceptInvite { .. } => "action invite".to_string(),
            Request::SetGroup(set) => format!("action {}", set.action().as_str()),
        }
    }
}
