//! # grouplink
//!
//! Request/response correlation with read-through caching for
//! group-management operations:
//! - One-shot futures raced against a bounded timeout
//! - Status-checked, schema-validated response decoding
//! - TTL + weight bounded cache for idempotent lookups
//! - Tag-correlated TCP transport
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        GroupClient                           │
//! │          (lookups, invite codes, group mutations)            │
//! └──────────────┬───────────────────────────────┬──────────────┘
//!                │                               │
//!                ▼                               │
//!        ┌──────────────┐     ┌──────────┐       │
//!        │ CachedQuery  │────►│ TtlCache │       │
//!        └──────┬───────┘     └──────────┘       │
//!               │ miss                           │
//!               ▼                                ▼
//!        ┌──────────────────────────────────────────────┐
//!        │           Connection::send (tagged)           │
//!        └──────────────────────┬───────────────────────┘
//!                               │ ResultFuture
//!                               ▼
//!                     ┌──────────────────┐
//!                     │ ResponseResolver │
//!                     │ timeout / status │
//!                     └──────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod fingerprint;
pub mod cache;
pub mod resolver;
pub mod query;
pub mod group;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LinkError, Result};
pub use config::Config;
pub use cache::{ReadThroughCache, TtlCache};
pub use fingerprint::RequestFingerprint;
pub use group::{GroupAction, GroupClient, GroupMetadata, GroupParticipant};
pub use network::{Connection, ResultFuture, TcpConnection};
pub use query::CachedQuery;
pub use resolver::{ExchangeState, ResponseResolver};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of grouplink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
