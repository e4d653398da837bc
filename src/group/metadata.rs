//! Group metadata types

use serde::{Deserialize, Serialize};

/// Snapshot of a group as returned by a metadata lookup
///
/// Fields the service leaves out decode as their zero value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupMetadata {
    pub id: String,
    pub owner: String,
    pub subject: String,

    /// Creation time (seconds since the epoch)
    #[serde(rename = "creation")]
    pub creation_timestamp: u64,

    pub participants: Vec<GroupParticipant>,

    #[serde(rename = "subjectTime")]
    pub subject_last_changed_at: i64,

    #[serde(rename = "subjectOwner")]
    pub subject_last_changed_by: String,
}

impl GroupMetadata {
    /// Look up a participant by jid
    pub fn participant(&self, id: &str) -> Option<&GroupParticipant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Participants with admin rights (super admins included)
    pub fn admins(&self) -> impl Iterator<Item = &GroupParticipant> {
        self.participants
            .iter()
            .filter(|p| p.is_admin || p.is_super_admin)
    }
}

/// A member of a group
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupParticipant {
    pub id: String,

    #[serde(rename = "isAdmin")]
    pub is_admin: bool,

    #[serde(rename = "isSuperAdmin")]
    pub is_super_admin: bool,
}
