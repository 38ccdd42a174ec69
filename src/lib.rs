//! # strict-session
//!
//! Hardened server-side cookie sessions: a per-request session manager that
//! validates, regenerates, and tears down an authenticated context backed by
//! a server-held key/value store keyed by an opaque identifier.
//!
//! ## Architecture Overview
//!
//! - **[`session`]**: The validation state machine — inactivity timeout,
//!   client fingerprint integrity (user-agent + network address binding),
//!   first-use identifier regeneration, and destructive invalidation with
//!   cookie clearing — plus the record accessor contract.
//! - **[`store`]**: The session store capability trait with in-memory
//!   (concurrent map) and file-backed (atomic JSON documents with garbage
//!   collection) implementations.
//! - **[`transport`]**: The cookie transport capability trait and an
//!   in-memory jar that records outgoing Set-Cookie instructions.
//! - **[`request`]**: The request identity capability trait supplying the
//!   client fingerprint and clock.
//!
//! Timeout and fingerprint violations are handled by silent full reset, not
//! errors: an attacker gets no signal distinguishing "invalid session" from
//! "hijack detected". The only fatal construction error is a disabled store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use strict_session::{
//!     CookieJar, MemoryStore, RequestInfo, SessionConfig, SessionManager,
//! };
//!
//! fn main() -> Result<(), strict_session::SessionError> {
//!     let store = Box::new(MemoryStore::new());
//!     let transport = Box::new(CookieJar::new());
//!     let identity = Box::new(RequestInfo::new("Mozilla/5.0", "203.0.113.7"));
//!
//!     let mut session =
//!         SessionManager::open(store, transport, identity, SessionConfig::default())?;
//!     session.set("user_id", 42);
//!     session.close()?;
//!     Ok(())
//! }
//! ```

/// Session validation state machine, record, and configuration.
///
/// This module owns all security-relevant decision logic: timeout expiry,
/// fingerprint integrity, first-use regeneration, and destruction.
pub mod session;

/// Session store capability interface and bundled implementations.
pub mod store;

/// Cookie transport capability interface and the in-memory jar.
pub mod transport;

/// Request identity capability interface.
pub mod request;

/// Name and path constants.
pub mod env;

// Re-export the core session types
pub use session::{
    CookieParams, SameSite, SessionConfig, SessionError, SessionManager, SessionRecord,
    SessionStatus,
};

// Re-export the capability traits and bundled collaborators
pub use request::{RequestIdentity, RequestInfo};
pub use store::{FileStore, MemoryStore, SessionStore};
pub use transport::{CookieJar, CookieTransport, SetCookie};
