//! Request identity capability interface.
//!
//! Supplies the client fingerprint (user-agent and network address) and the
//! clock the validation passes run against.

use chrono::{DateTime, Utc};

/// Capability contract for the per-request identity and clock source.
pub trait RequestIdentity {
    /// The client's user-agent string for this request.
    fn user_agent(&self) -> &str;

    /// The client's network address for this request.
    fn client_addr(&self) -> &str;

    /// Current time. Overridable so validation is testable against a fixed
    /// clock.
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Plain identity taken verbatim from an incoming request, using the system
/// clock.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub user_agent: String,
    pub client_addr: String,
}

impl RequestInfo {
    pub fn new(user_agent: impl Into<String>, client_addr: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            client_addr: client_addr.into(),
        }
    }
}

impl RequestIdentity for RequestInfo {
    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn client_addr(&self) -> &str {
        &self.client_addr
    }
}
