//! Group Module
//!
//! Group-management operations built on the resolver and cached query.
//!
//! ## Operations
//! - Lookups: metadata (cacheable), invite link
//! - One-shot action: accept invite
//! - Mutations: create, subject, promote, demote, add, remove, leave
//!   (all one request shape, never cached)

mod metadata;
mod action;
mod client;

pub use metadata::{GroupMetadata, GroupParticipant};
pub use action::{GroupAction, GroupSetRequest};
pub use client::{GroupClient, MetadataCache};
