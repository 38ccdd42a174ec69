use crate::request::RequestIdentity;
use crate::session::record::SessionRecord;
use crate::session::types::{SessionConfig, SessionError, SessionStatus};
use crate::store::SessionStore;
use crate::transport::CookieTransport;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Session manager coordinating validation, regeneration, and teardown for
/// one request/response cycle.
///
/// `open` binds the store session and runs the validation passes in order:
/// inactivity timeout, fingerprint integrity, first-use regeneration. A
/// violated check performs a silent full reset — the caller simply observes
/// an empty, freshly-identified session — never an error; the one fatal
/// condition is a disabled store.
///
/// The manager owns the record exclusively for the duration of the request;
/// call [`SessionManager::close`] at request completion to flush it back to
/// the store.
pub struct SessionManager {
    store: Box<dyn SessionStore>,
    transport: Box<dyn CookieTransport>,
    identity: Box<dyn RequestIdentity>,
    config: SessionConfig,
    record: SessionRecord,
}

impl SessionManager {
    /// Construct the manager and bind the session.
    ///
    /// When the store is inactive this applies the configuration to the store
    /// and transport, starts the session, runs the timeout and integrity
    /// checks, performs first-use identifier regeneration, and issues the
    /// session cookie. When a session is already active, construction only
    /// establishes the manager's view of the current record.
    pub fn open(
        mut store: Box<dyn SessionStore>,
        mut transport: Box<dyn CookieTransport>,
        identity: Box<dyn RequestIdentity>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        match store.status() {
            SessionStatus::Disabled => return Err(SessionError::StoreDisabled),
            SessionStatus::Active => {
                let record = store.start()?;
                return Ok(Self {
                    store,
                    transport,
                    identity,
                    config,
                    record,
                });
            }
            SessionStatus::Inactive => {}
        }

        store.configure(
            config.use_strict_mode,
            config.gc_maxlifetime_secs,
            config.use_cookies_only,
        );
        transport.configure_cookie_params(config.cookie_params());

        let record = store.start()?;
        let mut manager = Self {
            store,
            transport,
            identity,
            config,
            record,
        };

        manager.check_timeout()?;
        manager.check_integrity()?;

        if !manager.record.initiated() {
            manager.store.regenerate_id(true)?;
            manager.record.mark_initiated();
            debug!(
                id = manager.store.current_id(),
                "first use, regenerated session identifier"
            );
        }

        manager.issue_cookie();
        Ok(manager)
    }

    /// Purge, destroy, and restart: the shared reset used by both the timeout
    /// and integrity checks. Seeds `last_activity` on the fresh record so
    /// construction never completes without an activity timestamp.
    fn full_reset(&mut self) -> Result<(), SessionError> {
        self.record.clear();
        self.store.unset_all()?;
        self.store.destroy_session()?;
        self.record = self.store.start()?;
        self.record.touch(self.identity.now().timestamp());
        Ok(())
    }

    /// Reset the session when the inactivity window has been exceeded, and
    /// refresh `last_activity` either way.
    fn check_timeout(&mut self) -> Result<(), SessionError> {
        let now = self.identity.now().timestamp();
        if let Some(last) = self.record.last_activity() {
            if now - last > self.config.timeout_secs {
                debug!(
                    idle_secs = now - last,
                    timeout_secs = self.config.timeout_secs,
                    "session timed out, resetting"
                );
                self.full_reset()?;
            }
        }
        self.record.touch(now);
        Ok(())
    }

    /// Reset the session when the bound fingerprint no longer matches the
    /// request, then re-stamp both fingerprint attributes. The user-agent and
    /// address checks are independent; either alone invalidates the record.
    fn check_integrity(&mut self) -> Result<(), SessionError> {
        let user_agent = self.identity.user_agent().to_owned();
        if self
            .record
            .user_agent()
            .is_some_and(|bound| bound != user_agent)
        {
            warn!("user-agent mismatch, resetting session");
            self.full_reset()?;
        }
        self.record.stamp_user_agent(&user_agent);

        let addr = self.identity.client_addr().to_owned();
        if self.record.ip().is_some_and(|bound| bound != addr) {
            warn!("client address mismatch, resetting session");
            self.full_reset()?;
        }
        self.record.stamp_ip(&addr);
        Ok(())
    }

    fn issue_cookie(&mut self) {
        let name = self.store.cookie_name();
        let id = self.store.current_id();
        self.transport.send_cookie(&name, &id);
    }

    /// Attribute value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.record.get(key)
    }

    /// Attribute value for `key`, or `default` when absent. Never fails.
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.record
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    /// The full attribute mapping, reflecting all mutations made so far.
    pub fn all(&self) -> &HashMap<String, Value> {
        self.record.all()
    }

    /// Upsert an attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.record.set(key, value);
    }

    /// Whether `key` exists, even when the stored value is null.
    pub fn has(&self, key: &str) -> bool {
        self.record.has(key)
    }

    /// Remove an attribute; no-op when absent.
    pub fn unset(&mut self, key: &str) {
        self.record.unset(key);
    }

    /// Remove all attributes. Leaves the store session and its identifier
    /// untouched.
    pub fn clear(&mut self) {
        self.record.clear();
    }

    /// Issue a new identifier for the current record contents, invalidating
    /// the old one, and re-issue the session cookie. Call after privilege
    /// changes such as login.
    pub fn regenerate_id(&mut self) -> Result<String, SessionError> {
        let id = self.store.regenerate_id(true)?;
        self.issue_cookie();
        Ok(id)
    }

    /// Purge all attributes, terminate the store session, and — when the
    /// client presented a session cookie — instruct the transport to
    /// overwrite it with an already-expired cookie carrying the same
    /// attributes.
    pub fn destroy(&mut self) -> Result<(), SessionError> {
        self.record.clear();
        self.store.unset_all()?;
        self.store.destroy_session()?;
        let name = self.store.cookie_name();
        if self.transport.has_cookie(&name) {
            self.transport.expire_cookie(&name);
        }
        debug!("session destroyed");
        Ok(())
    }

    /// Flush the record back to the store at request completion. No-op when
    /// the session was destroyed.
    pub fn close(mut self) -> Result<(), SessionError> {
        if self.store.status() == SessionStatus::Active {
            self.store.persist(&self.record)?;
        }
        Ok(())
    }

    /// The currently bound identifier, or empty after destruction.
    pub fn current_id(&self) -> String {
        self.store.current_id()
    }

    /// Name of the cookie carrying the identifier.
    pub fn cookie_name(&self) -> String {
        self.store.cookie_name()
    }

    /// Where the store keeps its records.
    pub fn save_path(&self) -> PathBuf {
        self.store.save_path()
    }

    /// Lifecycle state of the underlying store.
    pub fn status(&self) -> SessionStatus {
        self.store.status()
    }

    /// The configured inactivity window in seconds.
    pub fn timeout_secs(&self) -> i64 {
        self.config.timeout_secs
    }

    /// Last validation timestamp in seconds since epoch, if present.
    pub fn last_activity(&self) -> Option<i64> {
        self.record.last_activity()
    }

    /// Pure expiry predicate: `last_activity` is present and the inactivity
    /// window has been exceeded. Unlike the timeout check run at `open`, this
    /// mutates nothing.
    pub fn is_expired(&self) -> bool {
        self.record
            .last_activity()
            .is_some_and(|last| self.identity.now().timestamp() - last > self.config.timeout_secs)
    }
}
