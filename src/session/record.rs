use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Reserved key marking a record as having completed first-use regeneration.
pub const INITIATED_KEY: &str = "initiated";

/// Reserved key holding the last validation timestamp (seconds since epoch).
pub const LAST_ACTIVITY_KEY: &str = "last_activity";

/// Reserved key holding the user-agent string bound at first observation.
pub const USER_AGENT_KEY: &str = "user_agent";

/// Reserved key holding the client network address bound at first observation.
pub const IP_KEY: &str = "ip";

/// The authoritative state for one client session: a flat key/value mapping
/// holding user attributes alongside the reserved bookkeeping keys.
///
/// This is exactly the shape the store persists; the reserved keys live in
/// the same mapping as user data so a store round-trip preserves them without
/// special handling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionRecord {
    attributes: HashMap<String, Value>,
}

impl SessionRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Upsert an attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Whether `key` exists, even when the stored value is null.
    pub fn has(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Remove an attribute; no-op when absent.
    pub fn unset(&mut self, key: &str) {
        self.attributes.remove(key);
    }

    /// Remove every attribute, reserved keys included.
    pub fn clear(&mut self) {
        self.attributes.clear();
    }

    /// The full attribute mapping.
    pub fn all(&self) -> &HashMap<String, Value> {
        &self.attributes
    }

    /// Whether the record holds no attributes at all.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Whether first-use regeneration already ran for this record.
    pub fn initiated(&self) -> bool {
        self.attributes.contains_key(INITIATED_KEY)
    }

    /// Mark first-use regeneration as done. Set exactly once per record.
    pub fn mark_initiated(&mut self) {
        self.set(INITIATED_KEY, true);
    }

    /// Last validation timestamp in seconds since epoch, if present.
    pub fn last_activity(&self) -> Option<i64> {
        self.attributes.get(LAST_ACTIVITY_KEY).and_then(Value::as_i64)
    }

    /// Refresh the last validation timestamp.
    pub fn touch(&mut self, now: i64) {
        self.set(LAST_ACTIVITY_KEY, now);
    }

    /// The bound user-agent string, if stamped.
    pub fn user_agent(&self) -> Option<&str> {
        self.attributes.get(USER_AGENT_KEY).and_then(Value::as_str)
    }

    /// Stamp the user-agent fingerprint.
    pub fn stamp_user_agent(&mut self, user_agent: &str) {
        self.set(USER_AGENT_KEY, user_agent);
    }

    /// The bound client network address, if stamped.
    pub fn ip(&self) -> Option<&str> {
        self.attributes.get(IP_KEY).and_then(Value::as_str)
    }

    /// Stamp the network address fingerprint.
    pub fn stamp_ip(&mut self, ip: &str) {
        self.set(IP_KEY, ip);
    }
}
