//! Resolving a session token to the user it belongs to.
//!
//! The gateway holds no user table. Resolution is a backend round-trip:
//! GET the configured `me` path with the token in the Authorization header
//! and deserialize the answer. The backend answering 401 (or not at all)
//! means the session is dead.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppState;
use crate::api::models::users::CurrentUser;
use crate::auth::session::{self, SessionToken};
use crate::errors::{Error, Result};

/// Ask the backend who this token belongs to.
pub async fn resolve(state: &AppState, token: &SessionToken) -> Result<CurrentUser> {
    let value = state
        .proxy
        .get(&state.config.backend.me_path, Some(token), "Failed to fetch current user")
        .await?;

    serde_json::from_value(value).map_err(|e| {
        tracing::warn!("Backend returned an unexpected current-user shape: {e}");
        Error::upstream("Failed to fetch current user")
    })
}

/// Extractor rejecting requests without a live session. Any resolution
/// failure is reported as 401, never as a backend error.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = session::token_from_request(parts, &state.config)
            .ok_or(Error::Unauthenticated { message: None })?;

        resolve(state, &token).await.map_err(|_| Error::Unauthenticated {
            message: Some("Session is invalid or expired".to_string()),
        })
    }
}

/// Non-rejecting extractor for proxy handlers: the cookie if present,
/// `None` otherwise. Absence is not an error at this layer; the outbound
/// request carries `Token undefined` and the backend answers 401.
#[derive(Debug, Clone)]
pub struct SessionCookie(pub Option<SessionToken>);

impl SessionCookie {
    /// Cache scope for this session. Anonymous requests share one scope,
    /// but since failed fetches are never cached it never holds data.
    pub fn scope(&self) -> &str {
        self.0.as_ref().map(|t| t.as_str()).unwrap_or("")
    }
}

impl FromRequestParts<AppState> for SessionCookie {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> std::result::Result<Self, Self::Rejection> {
        Ok(SessionCookie(session::token_from_request(parts, &state.config)))
    }
}
