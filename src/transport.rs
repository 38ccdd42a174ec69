//! Cookie transport capability interface.
//!
//! The manager only decides cookie values and lifetimes; encoding them onto
//! an HTTP response is the transport's job. [`CookieJar`] is the bundled
//! implementation: it holds the request's cookies and records outgoing
//! Set-Cookie instructions for the surrounding server to emit.

use crate::session::types::CookieParams;
use std::collections::HashMap;

/// Capability contract for cookie transport.
pub trait CookieTransport {
    /// Apply the cookie attributes used for every subsequent instruction.
    fn configure_cookie_params(&mut self, params: CookieParams);

    /// Whether the client presented a cookie named `name` on this request.
    fn has_cookie(&self, name: &str) -> bool;

    /// Value of the request cookie named `name`, if presented.
    fn request_cookie(&self, name: &str) -> Option<String>;

    /// Queue a Set-Cookie instruction carrying the configured attributes.
    fn send_cookie(&mut self, name: &str, value: &str);

    /// Queue an already-expired Set-Cookie instruction with the same
    /// name/path/domain/secure/httpOnly/sameSite attributes, guaranteeing
    /// client-side removal.
    fn expire_cookie(&mut self, name: &str);
}

/// A queued Set-Cookie instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    /// `None` = session-only cookie; `Some(0)` = removal.
    pub max_age_secs: Option<i64>,
    pub params: CookieParams,
}

impl SetCookie {
    /// Whether this instruction removes the cookie from the client.
    pub fn is_removal(&self) -> bool {
        matches!(self.max_age_secs, Some(age) if age <= 0)
    }

    /// Render the `Set-Cookie` header value.
    pub fn header_value(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);
        out.push_str(&format!("; Path={}", self.params.path));
        if !self.params.domain.is_empty() {
            out.push_str(&format!("; Domain={}", self.params.domain));
        }
        if let Some(age) = self.max_age_secs {
            out.push_str(&format!("; Max-Age={}", age));
        }
        if self.params.secure {
            out.push_str("; Secure");
        }
        if self.params.http_only {
            out.push_str("; HttpOnly");
        }
        out.push_str(&format!("; SameSite={}", self.params.same_site));
        out
    }
}

/// In-memory cookie transport.
///
/// Build it from the cookies parsed off the incoming request; after the
/// request is handled, drain [`CookieJar::pending`] into response headers.
#[derive(Debug, Default)]
pub struct CookieJar {
    request_cookies: HashMap<String, String>,
    params: CookieParams,
    pending: Vec<SetCookie>,
}

impl CookieJar {
    /// An empty jar: no request cookies, default attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// A jar seeded with the request's cookies.
    pub fn from_request_cookies(cookies: HashMap<String, String>) -> Self {
        Self {
            request_cookies: cookies,
            ..Self::default()
        }
    }

    /// Add a single request cookie.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_cookies.insert(name.into(), value.into());
        self
    }

    /// The queued Set-Cookie instructions, oldest first.
    pub fn pending(&self) -> &[SetCookie] {
        &self.pending
    }

    fn lifetime_max_age(&self) -> Option<i64> {
        // Lifetime 0 means a session-only cookie, which carries no Max-Age.
        (self.params.lifetime_secs != 0).then_some(self.params.lifetime_secs)
    }
}

impl CookieTransport for CookieJar {
    fn configure_cookie_params(&mut self, params: CookieParams) {
        self.params = params;
    }

    fn has_cookie(&self, name: &str) -> bool {
        self.request_cookies.contains_key(name)
    }

    fn request_cookie(&self, name: &str) -> Option<String> {
        self.request_cookies.get(name).cloned()
    }

    fn send_cookie(&mut self, name: &str, value: &str) {
        // A later instruction for the same cookie supersedes earlier ones.
        self.pending.retain(|c| c.name != name);
        self.pending.push(SetCookie {
            name: name.to_string(),
            value: value.to_string(),
            max_age_secs: self.lifetime_max_age(),
            params: self.params.clone(),
        });
    }

    fn expire_cookie(&mut self, name: &str) {
        self.pending.retain(|c| c.name != name);
        self.pending.push(SetCookie {
            name: name.to_string(),
            value: String::new(),
            max_age_secs: Some(0),
            params: self.params.clone(),
        });
    }
}
