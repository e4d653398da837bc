//! Group client
//!
//! Group operations over any `Connection`.

use super::{GroupAction, GroupMetadata, GroupSetRequest};
use crate::cache::ReadThroughCache;
use crate::config::Config;
use crate::error::{LinkError, Result};
use crate::fingerprint::RequestFingerprint;
use crate::network::{Connection, ResultFuture};
use crate::protocol::Request;
use crate::query::CachedQuery;
use crate::resolver::{ExchangeState, ResponseResolver};

/// Cache type accepted by metadata lookups
pub type MetadataCache = dyn ReadThroughCache<GroupMetadata>;

/// Issues group requests and resolves their replies
pub struct GroupClient<C> {
    conn: C,
    resolver: ResponseResolver,
    metadata: CachedQuery<GroupMetadata>,
}

impl<C: Connection> GroupClient<C> {
    pub fn new(conn: C, config: &Config) -> Self {
        Self {
            conn,
            resolver: ResponseResolver::from_config(config),
            metadata: CachedQuery::from_config(config),
        }
    }

    /// Replace the resolver (e.g. a shorter timeout for one call site)
    pub fn with_resolver(mut self, resolver: ResponseResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Resolver used by this client, for resolving mutation futures
    pub fn resolver(&self) -> &ResponseResolver {
        &self.resolver
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    fn submit(&self, request: &Request) -> Result<ResultFuture> {
        self.conn.send(request).map_err(|e| match e {
            LinkError::Submission(_) => e,
            other => LinkError::Submission(other.to_string()),
        })
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Fetch group metadata, consulting `cache` first when one is given
    pub fn get_group_metadata(
        &self,
        jid: &str,
        cache: Option<&MetadataCache>,
    ) -> Result<GroupMetadata> {
        let fingerprint = RequestFingerprint::group_metadata(jid);

        self.metadata.query(&fingerprint, cache, || {
            let future = self.submit(&Request::group_metadata(jid))?;
            self.resolver
                .resolve(future, |envelope| envelope.into_payload::<GroupMetadata>())
        })
    }

    /// Fetch the invite code for a group
    pub fn group_invite_link(&self, jid: &str) -> Result<String> {
        let future = self.submit(&Request::invite_code(jid))?;
        self.resolver.resolve_string_field(future, "code")
    }

    /// Join a group by invite code, returning the group's jid
    pub fn group_accept_invite_code(&self, code: &str) -> Result<String> {
        let future = self.submit(&Request::accept_invite(code))?;
        self.resolver.resolve_string_field(future, "gid")
    }

    /// Invite link lookup reported as a finished exchange
    pub fn invite_link_state(&self, jid: &str) -> ExchangeState<String> {
        ExchangeState::from(self.group_invite_link(jid))
    }

    /// Invite acceptance reported as a finished exchange
    pub fn accept_invite_state(&self, code: &str) -> ExchangeState<String> {
        ExchangeState::from(self.group_accept_invite_code(code))
    }

    // =========================================================================
    // Mutations
    //
    // These return the raw future; what counts as success differs per call
    // site. None of them touch the metadata cache.
    // =========================================================================

    /// Submit a "set group state" request
    pub fn set_group(
        &self,
        action: GroupAction,
        target_id: &str,
        subject: &str,
        participants: &[String],
    ) -> Result<ResultFuture> {
        let request = GroupSetRequest::new(action, target_id, subject, participants)?;
        tracing::debug!("Submitting group action {}", action.as_str());
        self.submit(&Request::SetGroup(request))
    }

    pub fn create_group(&self, subject: &str, participants: &[String]) -> Result<ResultFuture> {
        self.set_group(GroupAction::Create, "", subject, participants)
    }

    pub fn update_group_subject(&self, subject: &str, jid: &str) -> Result<ResultFuture> {
        self.set_group(GroupAction::Subject, jid, subject, &[])
    }

    pub fn set_admin(&self, jid: &str, participants: &[String]) -> Result<ResultFuture> {
        self.set_group(GroupAction::Promote, jid, "", participants)
    }

    pub fn remove_admin(&self, jid: &str, participants: &[String]) -> Result<ResultFuture> {
        self.set_group(GroupAction::Demote, jid, "", participants)
    }

    pub fn add_member(&self, jid: &str, participants: &[String]) -> Result<ResultFuture> {
        self.set_group(GroupAction::Add, jid, "", participants)
    }

    pub fn remove_member(&self, jid: &str, participants: &[String]) -> Result<ResultFuture> {
        self.set_group(GroupAction::Remove, jid, "", participants)
    }

    pub fn leave_group(&self, jid: &str) -> Result<ResultFuture> {
        self.set_group(GroupAction::Leave, jid, "", &[])
    }
}
