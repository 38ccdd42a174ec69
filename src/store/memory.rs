use super::{SessionStore, is_valid_id, mint_id};
use crate::env;
use crate::session::record::SessionRecord;
use crate::session::types::{SessionError, SessionStatus};
use chrono::Utc;
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// A stored record plus the bookkeeping needed for garbage collection.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    record: SessionRecord,
    updated_at: i64,
}

/// In-process session store backed by a concurrent map.
///
/// The backing map can be shared between store handles so sequential requests
/// (one handle each) observe the same sessions; the map itself serializes
/// access per entry. Entries older than the configured max lifetime are
/// pruned on `start`.
pub struct MemoryStore {
    entries: Arc<DashMap<String, StoredEntry>>,
    cookie_name: String,
    client_id: Option<String>,
    bound_id: Option<String>,
    strict_mode: bool,
    max_lifetime_secs: i64,
    disabled: bool,
}

impl MemoryStore {
    /// Create a store with a fresh, private backing map and no presented
    /// identifier.
    pub fn new() -> Self {
        Self::with_backing(Arc::new(DashMap::new()), None)
    }

    /// Create a store over a shared backing map, resuming the identifier the
    /// client presented (if any).
    pub fn with_backing(
        entries: Arc<DashMap<String, StoredEntry>>,
        client_id: Option<String>,
    ) -> Self {
        Self {
            entries,
            cookie_name: env::DEFAULT_COOKIE_NAME.to_string(),
            client_id,
            bound_id: None,
            strict_mode: true,
            max_lifetime_secs: env::DEFAULT_GC_MAXLIFETIME_SECS,
            disabled: false,
        }
    }

    /// Create a store that reports [`SessionStatus::Disabled`]; starting it
    /// is impossible and manager construction over it fails.
    pub fn disabled() -> Self {
        let mut store = Self::new();
        store.disabled = true;
        store
    }

    /// Override the cookie name (default `sid`).
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Handle to the backing map, for sharing with a later request's store.
    pub fn backing(&self) -> Arc<DashMap<String, StoredEntry>> {
        Arc::clone(&self.entries)
    }

    fn gc(&self) {
        let horizon = Utc::now().timestamp() - self.max_lifetime_secs;
        self.entries.retain(|_, entry| entry.updated_at >= horizon);
    }

    fn insert(&self, id: &str, record: SessionRecord) {
        self.entries.insert(
            id.to_string(),
            StoredEntry {
                record,
                updated_at: Utc::now().timestamp(),
            },
        );
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemoryStore {
    fn configure(&mut self, strict_mode: bool, max_lifetime_secs: i64, _cookie_only: bool) {
        self.strict_mode = strict_mode;
        self.max_lifetime_secs = max_lifetime_secs;
    }

    fn start(&mut self) -> Result<SessionRecord, SessionError> {
        if self.disabled {
            return Err(SessionError::StoreDisabled);
        }
        if let Some(id) = &self.bound_id {
            let record = self
                .entries
                .get(id)
                .map(|entry| entry.record.clone())
                .unwrap_or_default();
            return Ok(record);
        }

        self.gc();

        // Resume the presented identifier when it names a live session;
        // in strict mode an unknown identifier is discarded.
        if let Some(id) = self.client_id.take().filter(|id| is_valid_id(id)) {
            if let Some(entry) = self.entries.get(&id) {
                let record = entry.record.clone();
                drop(entry);
                debug!(id, "resumed session");
                self.bound_id = Some(id);
                return Ok(record);
            }
            if !self.strict_mode {
                let record = SessionRecord::new();
                self.insert(&id, record.clone());
                self.bound_id = Some(id);
                return Ok(record);
            }
        }

        let id = mint_id();
        let record = SessionRecord::new();
        self.insert(&id, record.clone());
        debug!(id, "started new session");
        self.bound_id = Some(id);
        Ok(record)
    }

    fn persist(&mut self, record: &SessionRecord) -> Result<(), SessionError> {
        if let Some(id) = self.bound_id.clone() {
            self.insert(&id, record.clone());
        }
        Ok(())
    }

    fn unset_all(&mut self) -> Result<(), SessionError> {
        if let Some(id) = &self.bound_id {
            if let Some(mut entry) = self.entries.get_mut(id) {
                entry.record.clear();
                entry.updated_at = Utc::now().timestamp();
            }
        }
        Ok(())
    }

    fn destroy_session(&mut self) -> Result<(), SessionError> {
        if let Some(id) = self.bound_id.take() {
            self.entries.remove(&id);
            debug!(id, "destroyed session");
        }
        Ok(())
    }

    fn regenerate_id(&mut self, delete_old: bool) -> Result<String, SessionError> {
        let Some(old_id) = self.bound_id.clone() else {
            return Err(SessionError::Internal(
                "cannot regenerate an unbound session".to_string(),
            ));
        };
        let new_id = mint_id();
        let entry = if delete_old {
            self.entries.remove(&old_id).map(|(_, entry)| entry)
        } else {
            self.entries.get(&old_id).map(|entry| entry.value().clone())
        };
        let record = entry.map(|e| e.record).unwrap_or_default();
        self.insert(&new_id, record);
        debug!(old_id, new_id, "regenerated session identifier");
        self.bound_id = Some(new_id.clone());
        Ok(new_id)
    }

    fn current_id(&self) -> String {
        self.bound_id.clone().unwrap_or_default()
    }

    fn cookie_name(&self) -> String {
        self.cookie_name.clone()
    }

    fn save_path(&self) -> PathBuf {
        PathBuf::new()
    }

    fn status(&self) -> SessionStatus {
        if self.disabled {
            SessionStatus::Disabled
        } else if self.bound_id.is_some() {
            SessionStatus::Active
        } else {
            SessionStatus::Inactive
        }
    }
}
