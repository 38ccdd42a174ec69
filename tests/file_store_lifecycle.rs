//! Lifecycle tests against the file-backed store: persistence across
//! requests, timeout reset, fingerprint reset, regeneration, and destruction
//! all exercised through real record documents on disk.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::path::Path;
use strict_session::{
    CookieJar, FileStore, RequestIdentity, SessionConfig, SessionManager, SessionStatus,
    SessionStore,
};
use tempfile::TempDir;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64)";
const CLIENT_ADDR: &str = "192.168.1.1";

struct FixedIdentity {
    user_agent: String,
    addr: String,
    now: DateTime<Utc>,
}

impl RequestIdentity for FixedIdentity {
    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn client_addr(&self) -> &str {
        &self.addr
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn identity() -> FixedIdentity {
    FixedIdentity {
        user_agent: USER_AGENT.to_string(),
        addr: CLIENT_ADDR.to_string(),
        now: test_now(),
    }
}

fn open(
    save_path: &Path,
    cookie_id: Option<&str>,
    identity: FixedIdentity,
) -> SessionManager {
    let store = FileStore::new(save_path, cookie_id.map(str::to_string)).unwrap();
    let mut jar = CookieJar::new();
    if let Some(id) = cookie_id {
        jar = jar.with_cookie("sid", id);
    }
    SessionManager::open(
        Box::new(store),
        Box::new(jar),
        Box::new(identity),
        SessionConfig::default(),
    )
    .expect("session should open")
}

#[test]
fn attributes_survive_across_requests() {
    init_tracing();
    let dir = TempDir::new().unwrap();

    let mut session = open(dir.path(), None, identity());
    session.set("user_id", 42);
    session.set("cart", json!({"items": ["a", "b"]}));
    let id = session.current_id();
    session.close().unwrap();

    let session = open(dir.path(), Some(&id), identity());
    assert_eq!(session.current_id(), id);
    assert_eq!(session.get("user_id"), Some(&json!(42)));
    assert_eq!(session.get("cart"), Some(&json!({"items": ["a", "b"]})));
}

#[test]
fn save_path_points_at_the_store_directory() {
    let dir = TempDir::new().unwrap();
    let session = open(dir.path(), None, identity());
    assert_eq!(session.save_path(), dir.path());
    assert_eq!(session.status(), SessionStatus::Active);
}

#[test]
fn record_documents_are_created_and_removed_on_disk() {
    let dir = TempDir::new().unwrap();

    let mut session = open(dir.path(), None, identity());
    let id = session.current_id();
    let record_file = dir.path().join(format!("{id}.json"));
    assert!(record_file.exists());

    session.destroy().unwrap();
    assert!(!record_file.exists());
    assert_eq!(session.current_id(), "");
}

#[test]
fn regeneration_moves_the_document_to_the_new_identifier() {
    let dir = TempDir::new().unwrap();

    let mut session = open(dir.path(), None, identity());
    session.set("user_id", 7);
    let old_id = session.current_id();
    let new_id = session.regenerate_id().unwrap();
    session.close().unwrap();

    assert!(!dir.path().join(format!("{old_id}.json")).exists());
    assert!(dir.path().join(format!("{new_id}.json")).exists());

    let session = open(dir.path(), Some(&new_id), identity());
    assert_eq!(session.get("user_id"), Some(&json!(7)));
}

#[test]
fn stale_client_identifiers_get_a_fresh_session() {
    let dir = TempDir::new().unwrap();

    // Strict mode: an identifier with no document behind it is discarded.
    let session = open(dir.path(), Some("0123456789abcdef0123456789abcdef"), identity());
    assert_ne!(session.current_id(), "0123456789abcdef0123456789abcdef");
    assert!(session.last_activity().is_some());
}

#[test]
fn timed_out_session_resets_on_the_next_request() {
    let dir = TempDir::new().unwrap();
    let timeout = SessionConfig::default().timeout_secs;

    let mut session = open(dir.path(), None, identity());
    session.set("user_id", 42);
    session.set(
        "last_activity",
        test_now().timestamp() - (timeout + 1),
    );
    let old_id = session.current_id();
    session.close().unwrap();

    let session = open(dir.path(), Some(&old_id), identity());
    assert_ne!(session.current_id(), old_id);
    assert!(!session.has("user_id"));
    // The old document is gone from disk as well.
    assert!(!dir.path().join(format!("{old_id}.json")).exists());
}

#[test]
fn hijacked_identifier_resets_on_the_next_request() {
    let dir = TempDir::new().unwrap();

    let mut session = open(dir.path(), None, identity());
    session.set("user_id", 42);
    let stolen_id = session.current_id();
    session.close().unwrap();

    // Same identifier presented from a different client.
    let attacker = FixedIdentity {
        user_agent: "curl/8.5.0".to_string(),
        addr: "198.51.100.23".to_string(),
        now: test_now(),
    };
    let session = open(dir.path(), Some(&stolen_id), attacker);
    assert_ne!(session.current_id(), stolen_id);
    assert!(!session.has("user_id"));
}

#[test]
fn expired_documents_are_garbage_collected() {
    let dir = TempDir::new().unwrap();

    // Plant a record document old enough to fall past the gc horizon.
    let stale = dir.path().join("stalestalestalestalestalestale12.json");
    std::fs::write(&stale, "{}").unwrap();
    let old_mtime = std::time::SystemTime::now() - std::time::Duration::from_secs(120);
    let file = std::fs::File::options().write(true).open(&stale).unwrap();
    file.set_modified(old_mtime).unwrap();
    drop(file);

    let mut store = FileStore::new(dir.path(), None).unwrap();
    store.configure(true, 60, true);
    store.start().unwrap();

    assert!(!stale.exists());
}
