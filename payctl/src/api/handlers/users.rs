//! User management proxy: CRUD plus admin balance adjustments.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState,
    api::handlers::{ConfirmQuery, to_body},
    api::models::users::{BalanceUpdateForm, User, UserForm},
    auth::current_user::SessionCookie,
    errors::Result,
    types::{Resource, UserId},
};

const USERS_PATH: &str = "/api/accounts/users/";

fn user_path(id: UserId) -> String {
    format!("/api/accounts/users/{id}/")
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Paginated user list"),
        (status = 500, description = "Backend unavailable or rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(State(state): State<AppState>, cookie: SessionCookie) -> Result<Json<serde_json::Value>> {
    let value = state
        .cache
        .get_or_fetch(Resource::Users, cookie.scope(), async {
            state.proxy.get(USERS_PATH, cookie.0.as_ref(), "Failed to fetch users").await
        })
        .await?;

    Ok(Json(value.as_ref().clone()))
}

/// Fetch a single user
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 500, description = "Backend unavailable or rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_user(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<UserId>,
) -> Result<Json<serde_json::Value>> {
    // Detail reads bypass the cache; invalidation tracks collections only
    let value = state
        .proxy
        .get(&user_path(id), cookie.0.as_ref(), "Failed to fetch user")
        .await?;
    Ok(Json(value))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = UserForm,
    responses(
        (status = 200, description = "User created", body = User),
        (status = 400, description = "Form validation failed"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Json(form): Json<UserForm>,
) -> Result<Json<serde_json::Value>> {
    form.validate(true)?;

    let body = to_body(&form)?;
    let value = state
        .proxy
        .post(USERS_PATH, cookie.0.as_ref(), &body, "Failed to create user")
        .await?;

    state.cache.invalidate(Resource::Users);
    state.cache.invalidate(Resource::DashboardStats);
    Ok(Json(value))
}

/// Update a user
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    request_body = UserForm,
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Form validation failed"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<UserId>,
    Json(form): Json<UserForm>,
) -> Result<Json<serde_json::Value>> {
    // Password is optional on update; a blank password means "unchanged"
    form.validate(false)?;

    let body = to_body(&form)?;
    let value = state
        .proxy
        .patch(&user_path(id), cookie.0.as_ref(), &body, "Failed to update user")
        .await?;

    state.cache.invalidate(Resource::Users);
    Ok(Json(value))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID"),
        ("confirm" = bool, Query, description = "Must be true; unconfirmed deletes are refused"),
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Deletion not confirmed"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_user(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<UserId>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<serde_json::Value>> {
    query.require()?;

    let value = state
        .proxy
        .delete(&user_path(id), cookie.0.as_ref(), "Failed to delete user")
        .await?;

    state.cache.invalidate(Resource::Users);
    state.cache.invalidate(Resource::DashboardStats);
    Ok(Json(value))
}

/// Adjust a user's wallet balance
#[utoipa::path(
    post,
    path = "/users/{id}/balance",
    tag = "users",
    request_body = BalanceUpdateForm,
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Balance adjusted"),
        (status = 400, description = "Zero amount"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_balance(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<UserId>,
    Json(form): Json<BalanceUpdateForm>,
) -> Result<Json<serde_json::Value>> {
    form.validate()?;

    // The backend models this as two wallet actions; the sign of the
    // amount picks which one
    let action = if form.amount.is_sign_positive() { "add_balance" } else { "remove_balance" };
    let mut body = serde_json::json!({ "amount": form.amount.abs() });
    if let Some(description) = &form.description {
        body["description"] = serde_json::Value::String(description.clone());
    }

    let value = state
        .proxy
        .post(
            &format!("/api/accounts/user-profiles/{id}/{action}/"),
            cookie.0.as_ref(),
            &body,
            "Failed to update balance",
        )
        .await?;

    // A balance adjustment creates a top-up transaction on the backend
    state.cache.invalidate(Resource::Users);
    state.cache.invalidate(Resource::Transactions);
    state.cache.invalidate(Resource::DashboardStats);
    Ok(Json(value))
}
