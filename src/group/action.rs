//! Group actions
//!
//! Every mutation shares one request shape; the action decides which
//! fields are sent.

use serde::Serialize;

use crate::error::{LinkError, Result};

/// Mutations the service accepts on a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupAction {
    Create,
    Subject,
    Promote,
    Demote,
    Add,
    Remove,
    Leave,
}

impl GroupAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupAction::Create => "create",
            GroupAction::Subject => "subject",
            GroupAction::Promote => "promote",
            GroupAction::Demote => "demote",
            GroupAction::Add => "add",
            GroupAction::Remove => "remove",
            GroupAction::Leave => "leave",
        }
    }

    /// Whether the action addresses an existing group
    pub fn uses_target(&self) -> bool {
        !matches!(self, GroupAction::Create)
    }

    pub fn uses_subject(&self) -> bool {
        matches!(self, GroupAction::Create | GroupAction::Subject)
    }

    pub fn uses_participants(&self) -> bool {
        matches!(
            self,
            GroupAction::Create
                | GroupAction::Promote
                | GroupAction::Demote
                | GroupAction::Add
                | GroupAction::Remove
        )
    }

    /// Whether an empty participant list makes the action meaningless
    fn requires_participants(&self) -> bool {
        self.uses_participants() && !matches!(self, GroupAction::Create)
    }
}

/// Body of a "set group state" request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSetRequest {
    #[serde(skip)]
    action: GroupAction,

    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    participants: Option<Vec<String>>,
}

impl GroupSetRequest {
    /// Build a request, keeping only the fields `action` uses.
    ///
    /// Empty strings count as absent. Missing required fields fail with
    /// `InvalidRequest`.
    pub fn new(
        action: GroupAction,
        target_id: &str,
        subject: &str,
        participants: &[String],
    ) -> Result<Self> {
        let id = (action.uses_target() && !target_id.is_empty()).then(|| target_id.to_string());
        let subject = (action.uses_subject() && !subject.is_empty()).then(|| subject.to_string());
        let participants = action.uses_participants().then(|| participants.to_vec());

        if action.uses_target() && id.is_none() {
            return Err(LinkError::InvalidRequest(format!(
                "`{}` needs a group id",
                action.as_str()
            )));
        }
        if action.uses_subject() && subject.is_none() {
            return Err(LinkError::InvalidRequest(format!(
                "`{}` needs a subject",
                action.as_str()
            )));
        }
        if action.requires_participants() && participants.as_ref().map_or(true, |p| p.is_empty())
        {
            return Err(LinkError::InvalidRequest(format!(
                "`{}` needs at least one participant",
                action.as_str()
            )));
        }

        Ok(Self {
            action,
            id,
            subject,
            participants,
        })
    }

    pub fn action(&self) -> GroupAction {
        self.action
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn participants(&self) -> Option<&[String]> {
        self.participants.as_deref()
    }
}
