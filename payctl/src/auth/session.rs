//! Session cookie contract.
//!
//! The session is a single cookie (name from `session.cookie_name`,
//! default `token`) whose value is the opaque token the backend issued at
//! login. The gateway reads it on every proxied request, sets it on login
//! and clears it on logout. It never inspects or validates the value -
//! the backend is the only authority on whether a token is live.

use axum::http::request::Parts;

use crate::config::Config;

/// An opaque backend session token lifted out of the cookie jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Pull the session token out of the request's cookie header, if present.
///
/// Cookie headers are parsed manually: split on `;`, trim, match the
/// configured name. The first matching cookie wins. A malformed header
/// (non-UTF8) is treated as no session.
pub fn token_from_request(parts: &Parts, config: &Config) -> Option<SessionToken> {
    let cookie_header = parts.headers.get(axum::http::header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;
    token_from_cookie_header(cookie_str, &config.session.cookie_name)
}

/// Parse a raw `Cookie:` header value for the named cookie.
pub fn token_from_cookie_header(cookie_str: &str, cookie_name: &str) -> Option<SessionToken> {
    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=')
            && name == cookie_name
        {
            return Some(SessionToken(value.to_string()));
        }
    }
    None
}

/// Build the `Set-Cookie` value that establishes a session after login.
pub fn create_session_cookie(token: &str, config: &Config) -> String {
    let session = &config.session;
    let max_age = session.timeout.as_secs();

    // Secure is a flag attribute: present or absent, never key=value
    let secure = if session.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}={}; Path=/; HttpOnly{}; SameSite={}; Max-Age={}",
        session.cookie_name, token, secure, session.cookie_same_site, max_age
    )
}

/// Build the expired `Set-Cookie` value that clears the session on logout.
pub fn clear_session_cookie(config: &Config) -> String {
    let secure = if config.session.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}=; Path=/; HttpOnly{}; SameSite={}; Max-Age=0",
        config.session.cookie_name, secure, config.session.cookie_same_site
    )
}
