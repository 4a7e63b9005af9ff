//! Session lifecycle: login, logout and session resolution.
//!
//! Login is a two-step exchange with the backend: POST the credentials to
//! the token endpoint, then resolve the issued token to a user record. Only
//! when both steps succeed does the gateway set the session cookie. Logout
//! revokes the token on the backend on a best-effort basis and always
//! clears the cookie.

use axum::{Json, extract::State, http::header, response::IntoResponse};

use crate::{
    AppState,
    api::handlers::to_body,
    api::models::{
        auth::{LoginForm, LoginResponse, LogoutResponse, TokenResponse},
        users::CurrentUser,
    },
    auth::{
        current_user::{self, SessionCookie},
        session::{self, SessionToken},
    },
    errors::{Error, Result},
};

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "authentication",
    request_body = LoginForm,
    responses(
        (status = 200, description = "Session established, cookie set", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(form): Json<LoginForm>) -> Result<impl IntoResponse> {
    form.validate()?;

    let body = to_body(&form)?;
    let value = state
        .proxy
        .post_anonymous(&state.config.backend.login_path, &body, "Failed to login")
        .await
        .map_err(|e| {
            tracing::info!("Login rejected for '{}': {e}", form.username);
            Error::Unauthenticated {
                message: Some("Invalid username or password".to_string()),
            }
        })?;

    let issued: TokenResponse = serde_json::from_value(value).map_err(|e| {
        tracing::warn!("Backend login response missing token field: {e}");
        Error::upstream("Failed to login")
    })?;

    // The cookie is only set once the token resolves to a user, so a
    // browser never holds a token the backend will not honor.
    let token = SessionToken(issued.token);
    let user = current_user::resolve(&state, &token).await?;

    tracing::info!("User '{}' logged in", user.username);
    let cookie = session::create_session_cookie(token.as_str(), &state.config);
    Ok(([(header::SET_COOKIE, cookie)], Json(LoginResponse { user })))
}

/// Log out and clear the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "authentication",
    responses(
        (status = 200, description = "Session cleared", body = LogoutResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, cookie: SessionCookie) -> Result<impl IntoResponse> {
    // Revocation is best-effort: the cookie is cleared even when the
    // backend is down, otherwise a dead backend traps users in a session.
    if let Some(token) = &cookie.0
        && let Err(e) = state
            .proxy
            .post_empty(&state.config.backend.logout_path, Some(token), "Failed to logout")
            .await
    {
        tracing::warn!("Backend token revocation failed, clearing cookie anyway: {e}");
    }

    let cleared = session::clear_session_cookie(&state.config);
    Ok((
        [(header::SET_COOKIE, cleared)],
        Json(LogoutResponse {
            message: "Logged out".to_string(),
        }),
    ))
}

/// Resolve the current session to a user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "authentication",
    responses(
        (status = 200, description = "The authenticated user", body = CurrentUser),
        (status = 401, description = "No live session"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn me(user: CurrentUser) -> Json<CurrentUser> {
    Json(user)
}
