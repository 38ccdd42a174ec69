//! Session store capability interface and the bundled implementations.
//!
//! A store owns identifier negotiation and record persistence. The manager
//! drives it through [`SessionStore`] and never assumes a physical format;
//! serializing concurrent access to a given identifier's record is the
//! store's responsibility.

pub mod file;
pub mod memory;

use crate::session::record::SessionRecord;
use crate::session::types::{SessionError, SessionStatus};
use std::path::PathBuf;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Capability contract for the underlying session store.
///
/// One store handle serves one request; `start` binds (creates or resumes) a
/// session and hands the record to the caller, `persist` writes it back at
/// request completion. A destroyed store reports `Inactive` and an empty
/// `current_id` until started again.
pub trait SessionStore {
    /// Apply manager configuration before the first `start`.
    fn configure(&mut self, strict_mode: bool, max_lifetime_secs: i64, cookie_only: bool);

    /// Bind the store session, producing or resuming the record reachable at
    /// the negotiated identifier. Idempotent while a session is bound.
    fn start(&mut self) -> Result<SessionRecord, SessionError>;

    /// Write the record back under the current identifier.
    fn persist(&mut self, record: &SessionRecord) -> Result<(), SessionError>;

    /// Purge all persisted attributes of the current session.
    fn unset_all(&mut self) -> Result<(), SessionError>;

    /// Terminate the current session and discard its persisted record.
    fn destroy_session(&mut self) -> Result<(), SessionError>;

    /// Issue a new identifier for the current record contents. The old
    /// identifier is invalidated when `delete_old` is set.
    fn regenerate_id(&mut self, delete_old: bool) -> Result<String, SessionError>;

    /// The currently bound identifier, or empty when none.
    fn current_id(&self) -> String;

    /// Name of the cookie carrying the identifier.
    fn cookie_name(&self) -> String;

    /// Where this store keeps its records; empty for purely in-memory stores.
    fn save_path(&self) -> PathBuf;

    /// Lifecycle state of the store.
    fn status(&self) -> SessionStatus;
}

/// Mint a fresh opaque session identifier.
pub(crate) fn mint_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Whether a client-presented identifier is safe to use as a lookup key.
///
/// Identifiers minted by this crate are hex; anything outside ASCII
/// alphanumerics is rejected before it can reach a filesystem path.
pub(crate) fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 128 && id.chars().all(|c| c.is_ascii_alphanumeric())
}
