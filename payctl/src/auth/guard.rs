//! Route guard for protected dashboard pages.
//!
//! The decision logic is a pure function over (session state, required
//! permissions) so it can be tested without a server. The middleware wraps
//! it: resolve the session against the backend, evaluate, then either let
//! the page render or answer 303 to the login or unauthorized page.
//!
//! A session that fails to resolve (dead token, unreachable backend) is
//! treated as anonymous. The dashboard's contract is that a protected page
//! never renders for a session that could not be confirmed.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::AppState;
use crate::api::models::users::CurrentUser;
use crate::auth::{current_user, session};
use crate::config::GuardConfig;

/// What the guard knows about the caller's session.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// Resolution is still in flight; nothing may be decided yet
    Resolving,
    /// No cookie, or the backend rejected the token
    Anonymous,
    /// The backend confirmed the session
    Authenticated(CurrentUser),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session still resolving: render nothing, redirect nowhere
    Wait,
    RedirectToLogin,
    RedirectToUnauthorized,
    Allow,
}

/// The guard decision. Permission checks only apply to confirmed sessions;
/// an anonymous caller is sent to login even when the page requires no
/// permissions at all.
pub fn evaluate(state: &SessionState, required: &[String]) -> GuardOutcome {
    match state {
        SessionState::Resolving => GuardOutcome::Wait,
        SessionState::Anonymous => GuardOutcome::RedirectToLogin,
        SessionState::Authenticated(user) => {
            if user.permission_set().is_superset_of(required) {
                GuardOutcome::Allow
            } else {
                GuardOutcome::RedirectToUnauthorized
            }
        }
    }
}

/// Permissions required for a page path: the longest configured prefix
/// that matches wins. Unlisted pages require a session but no specific
/// permissions.
pub fn required_for_path<'a>(config: &'a GuardConfig, path: &str) -> &'a [String] {
    config
        .required_permissions
        .iter()
        .filter(|(prefix, _)| path == prefix.as_str() || path.starts_with(&format!("{prefix}/")))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, perms)| perms.as_slice())
        .unwrap_or(&[])
}

/// Axum middleware applying the guard to page routes. The login and
/// unauthorized pages themselves are never guarded, so redirects cannot
/// loop.
pub async fn page_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let guard = &state.config.guard;

    if path == guard.login_path || path == guard.unauthorized_path {
        return next.run(request).await;
    }

    // Bundle files are not pages: a redirect would break the shell's own
    // ability to render the login screen
    let last_segment = path.rsplit('/').next().unwrap_or("");
    if path.starts_with("/assets/") || last_segment.contains('.') {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| session::token_from_cookie_header(s, &state.config.session.cookie_name));

    // Server-side, resolution always completes before evaluation; the
    // Resolving state only exists for the pure machine.
    let session_state = match token {
        None => SessionState::Anonymous,
        Some(token) => match current_user::resolve(&state, &token).await {
            Ok(user) => SessionState::Authenticated(user),
            Err(e) => {
                tracing::debug!("Session resolution failed for {path}: {e}");
                SessionState::Anonymous
            }
        },
    };

    let required = required_for_path(guard, &path);
    match evaluate(&session_state, required) {
        GuardOutcome::Allow | GuardOutcome::Wait => next.run(request).await,
        GuardOutcome::RedirectToLogin => {
            tracing::debug!("Redirecting anonymous request for {path} to login");
            Redirect::to(&guard.login_path).into_response()
        }
        GuardOutcome::RedirectToUnauthorized => {
            tracing::info!("Session lacks permissions for {path}");
            Redirect::to(&guard.unauthorized_path).into_response()
        }
    }
}
