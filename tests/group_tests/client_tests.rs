//! GroupClient Tests
//!
//! Tests verify:
//! - Metadata lookups populate the cache and then skip the round trip
//! - Invite link / accept invite end to end through a connection
//! - Invite outcomes reported as exchange states
//! - Mutations use the shared set-group shape and never touch the cache
//! - Submission failures and invalid requests surface as typed errors

#[path = "../common/mod.rs"]
mod common;

use std::time::Duration;

use common::{metadata_body, MockConnection, Reply};
use grouplink::cache::{ReadThroughCache, TtlCache};
use grouplink::{
    Config, ExchangeState, GroupClient, GroupMetadata, LinkError, RequestFingerprint,
};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn config() -> Config {
    Config::builder().msg_timeout_ms(500).build()
}

fn client(conn: MockConnection) -> GroupClient<MockConnection> {
    GroupClient::new(conn, &config())
}

fn metadata_cache() -> TtlCache<GroupMetadata> {
    TtlCache::from_config(&config())
}

fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Metadata Tests
// =============================================================================

#[test]
fn test_metadata_cache_population() {
    let client = client(MockConnection::new().always(Reply::Body(metadata_body())));
    let cache = metadata_cache();

    let first = client
        .get_group_metadata("group123@g.us", Some(&cache))
        .unwrap();
    assert_eq!(client.connection().send_count(), 1);
    assert_eq!(first.subject, "Weekend plans");
    assert_eq!(first.participants.len(), 2);

    let fp = RequestFingerprint::group_metadata("group123@g.us");
    assert_eq!(cache.get(fp.as_str()), Some(first.clone()));

    let second = client
        .get_group_metadata("group123@g.us", Some(&cache))
        .unwrap();
    assert_eq!(second, first);
    assert_eq!(client.connection().send_count(), 1);
}

#[test]
fn test_metadata_request_shape() {
    let client = client(MockConnection::new().respond(&metadata_body()));
    client.get_group_metadata("group123@g.us", None).unwrap();

    assert_eq!(
        client.connection().sent_values(),
        vec![json!(["query", "GroupMetadata", "group123@g.us"])]
    );
}

#[test]
fn test_metadata_without_cache_always_round_trips() {
    let client = client(MockConnection::new().always(Reply::Body(metadata_body())));

    client.get_group_metadata("group123@g.us", None).unwrap();
    client.get_group_metadata("group123@g.us", None).unwrap();

    assert_eq!(client.connection().send_count(), 2);
}

#[test]
fn test_metadata_rejection_not_cached() {
    let client = client(
        MockConnection::new()
            .respond(r#"{"status":500}"#)
            .respond(&metadata_body()),
    );
    let cache = metadata_cache();

    let err = client
        .get_group_metadata("group123@g.us", Some(&cache))
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(cache.is_empty());

    // Next call goes back to the network
    assert!(client
        .get_group_metadata("group123@g.us", Some(&cache))
        .is_ok());
    assert_eq!(client.connection().send_count(), 2);
}

#[test]
fn test_metadata_timeout() {
    let client = client(MockConnection::new().reply(Reply::Silent));
    let cache = metadata_cache();

    let err = client
        .get_group_metadata("group123@g.us", Some(&cache))
        .unwrap_err();

    assert!(matches!(err, LinkError::Timeout(d) if d == Duration::from_millis(500)));
    assert!(cache.is_empty());
}

// =============================================================================
// Invite Tests
// =============================================================================

#[test]
fn test_invite_link() {
    let client = client(MockConnection::new().respond(r#"{"status":200,"code":"ABCD1234"}"#));

    assert_eq!(client.group_invite_link("group123").unwrap(), "ABCD1234");
    assert_eq!(
        client.connection().sent_values(),
        vec![json!(["query", "inviteCode", "group123"])]
    );
}

#[test]
fn test_invite_link_rejected() {
    let client = client(MockConnection::new().respond(r#"{"status":404}"#));

    let err = client.group_invite_link("group123").unwrap_err();
    assert!(matches!(err, LinkError::RequestRejected { status: 404 }));
}

#[test]
fn test_accept_invite() {
    let client = client(MockConnection::new().reply(Reply::Delayed(
        Duration::from_millis(20),
        r#"{"status":200,"gid":"group123@g.us"}"#.to_string(),
    )));

    assert_eq!(
        client.group_accept_invite_code("ABCD1234").unwrap(),
        "group123@g.us"
    );
    assert_eq!(
        client.connection().sent_values(),
        vec![json!(["action", "invite", "ABCD1234"])]
    );
}

#[test]
fn test_submission_failure() {
    let client = client(MockConnection::new().reply(Reply::Refuse));

    let err = client.group_invite_link("group123").unwrap_err();
    assert!(matches!(err, LinkError::Submission(_)));
}

#[test]
fn test_invite_link_state_resolved() {
    let client = client(MockConnection::new().respond(r#"{"status":200,"code":"ABCD1234"}"#));

    let state = client.invite_link_state("group123");
    assert_eq!(state, ExchangeState::Resolved("ABCD1234".to_string()));
    assert!(state.is_terminal());
}

#[test]
fn test_invite_link_state_rejected() {
    let client = client(MockConnection::new().respond(r#"{"status":404}"#));

    assert_eq!(client.invite_link_state("group123"), ExchangeState::Rejected(404));
}

#[test]
fn test_invite_link_state_malformed() {
    let client = client(MockConnection::new().respond(r#"{"status":200,"code":7}"#));

    assert!(matches!(
        client.invite_link_state("group123"),
        ExchangeState::Malformed(_)
    ));
}

#[test]
fn test_accept_invite_state_timed_out() {
    let client = client(MockConnection::new().reply(Reply::Silent));

    assert_eq!(client.accept_invite_state("ABCD1234"), ExchangeState::TimedOut);
}

#[test]
fn test_accept_invite_state_submission_failed() {
    let client = client(MockConnection::new().reply(Reply::Refuse));

    assert!(matches!(
        client.accept_invite_state("ABCD1234"),
        ExchangeState::Failed(_)
    ));
}

// =============================================================================
// Mutation Tests
// =============================================================================

#[test]
fn test_mutation_shapes() {
    let client = client(MockConnection::new().always(Reply::Body(r#"{"status":200}"#.into())));
    let who = ids(&["a@c.us"]);

    client.create_group("Weekend plans", &ids(&["a@c.us", "b@c.us"])).unwrap();
    client.update_group_subject("Renamed", "g@g.us").unwrap();
    client.set_admin("g@g.us", &who).unwrap();
    client.remove_admin("g@g.us", &who).unwrap();
    client.add_member("g@g.us", &who).unwrap();
    client.remove_member("g@g.us", &who).unwrap();
    client.leave_group("g@g.us").unwrap();

    assert_eq!(
        client.connection().sent_values(),
        vec![
            json!(["action", "create", {"subject": "Weekend plans", "participants": ["a@c.us", "b@c.us"]}]),
            json!(["action", "subject", {"id": "g@g.us", "subject": "Renamed"}]),
            json!(["action", "promote", {"id": "g@g.us", "participants": ["a@c.us"]}]),
            json!(["action", "demote", {"id": "g@g.us", "participants": ["a@c.us"]}]),
            json!(["action", "add", {"id": "g@g.us", "participants": ["a@c.us"]}]),
            json!(["action", "remove", {"id": "g@g.us", "participants": ["a@c.us"]}]),
            json!(["action", "leave", {"id": "g@g.us"}]),
        ]
    );
}

#[test]
fn test_mutation_future_resolved_by_caller() {
    let client = client(
        MockConnection::new()
            .respond(r#"{"status":200,"gid":"new@g.us"}"#)
            .respond(r#"{"status":403}"#),
    );

    let created = client.create_group("Weekend plans", &[]).unwrap();
    let gid = client
        .resolver()
        .resolve_string_field(created, "gid")
        .unwrap();
    assert_eq!(gid, "new@g.us");

    let left = client.leave_group("new@g.us").unwrap();
    let err = client.resolver().resolve_ack(left).unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[test]
fn test_mutations_leave_cache_alone() {
    let client = client(
        MockConnection::new()
            .respond(&metadata_body())
            .always(Reply::Body(r#"{"status":200}"#.into())),
    );
    let cache = metadata_cache();

    let before = client
        .get_group_metadata("group123@g.us", Some(&cache))
        .unwrap();
    let future = client
        .update_group_subject("Renamed", "group123@g.us")
        .unwrap();
    client.resolver().resolve_ack(future).unwrap();

    // Still the pre-rename snapshot; invalidation is the caller's call
    let fp = RequestFingerprint::group_metadata("group123@g.us");
    assert_eq!(cache.get(fp.as_str()), Some(before));

    cache.remove(fp.as_str());
    assert_eq!(cache.get(fp.as_str()), None);
}

#[test]
fn test_invalid_mutation_not_sent() {
    let client = client(MockConnection::new());

    let err = client.add_member("g@g.us", &[]).unwrap_err();
    assert!(matches!(err, LinkError::InvalidRequest(_)));

    let err = client.leave_group("").unwrap_err();
    assert!(matches!(err, LinkError::InvalidRequest(_)));

    assert_eq!(client.connection().send_count(), 0);
}
