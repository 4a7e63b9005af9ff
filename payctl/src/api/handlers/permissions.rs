//! Permission catalog proxy. The dashboard's roles page edits these
//! records directly; users acquire them through group membership.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState,
    api::handlers::{ConfirmQuery, to_body},
    api::models::groups::{Permission, PermissionForm},
    auth::current_user::SessionCookie,
    errors::Result,
    types::{PermissionId, Resource},
};

const PERMISSIONS_PATH: &str = "/api/accounts/permissions/";

fn permission_path(id: PermissionId) -> String {
    format!("/api/accounts/permissions/{id}/")
}

/// List permission records
#[utoipa::path(
    get,
    path = "/permissions",
    tag = "groups",
    responses(
        (status = 200, description = "Permission list"),
        (status = 500, description = "Backend unavailable or rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_permissions(State(state): State<AppState>, cookie: SessionCookie) -> Result<Json<serde_json::Value>> {
    let value = state
        .cache
        .get_or_fetch(Resource::Permissions, cookie.scope(), async {
            state
                .proxy
                .get(PERMISSIONS_PATH, cookie.0.as_ref(), "Failed to fetch permissions")
                .await
        })
        .await?;

    Ok(Json(value.as_ref().clone()))
}

/// Fetch a single permission record
#[utoipa::path(
    get,
    path = "/permissions/{id}",
    tag = "groups",
    params(("id" = i64, Path, description = "Permission ID")),
    responses(
        (status = 200, description = "The permission", body = Permission),
        (status = 500, description = "Backend unavailable or rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_permission(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<PermissionId>,
) -> Result<Json<serde_json::Value>> {
    let value = state
        .proxy
        .get(&permission_path(id), cookie.0.as_ref(), "Failed to fetch permission")
        .await?;
    Ok(Json(value))
}

/// Create a permission record
#[utoipa::path(
    post,
    path = "/permissions",
    tag = "groups",
    request_body = PermissionForm,
    responses(
        (status = 200, description = "Permission created", body = Permission),
        (status = 400, description = "Missing name or codename"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_permission(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Json(form): Json<PermissionForm>,
) -> Result<Json<serde_json::Value>> {
    form.validate()?;

    let body = to_body(&form)?;
    let value = state
        .proxy
        .post(PERMISSIONS_PATH, cookie.0.as_ref(), &body, "Failed to create permission")
        .await?;

    state.cache.invalidate(Resource::Permissions);
    Ok(Json(value))
}

/// Update a permission record
#[utoipa::path(
    patch,
    path = "/permissions/{id}",
    tag = "groups",
    request_body = PermissionForm,
    params(("id" = i64, Path, description = "Permission ID")),
    responses(
        (status = 200, description = "Permission updated", body = Permission),
        (status = 400, description = "Missing name or codename"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_permission(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<PermissionId>,
    Json(form): Json<PermissionForm>,
) -> Result<Json<serde_json::Value>> {
    form.validate()?;

    let body = to_body(&form)?;
    let value = state
        .proxy
        .patch(&permission_path(id), cookie.0.as_ref(), &body, "Failed to update permission")
        .await?;

    state.cache.invalidate(Resource::Permissions);
    // Group listings embed permission records
    state.cache.invalidate(Resource::Groups);
    Ok(Json(value))
}

/// Delete a permission record
#[utoipa::path(
    delete,
    path = "/permissions/{id}",
    tag = "groups",
    params(
        ("id" = i64, Path, description = "Permission ID"),
        ("confirm" = bool, Query, description = "Must be true; unconfirmed deletes are refused"),
    ),
    responses(
        (status = 200, description = "Permission deleted"),
        (status = 400, description = "Deletion not confirmed"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_permission(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<PermissionId>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<serde_json::Value>> {
    query.require()?;

    let value = state
        .proxy
        .delete(&permission_path(id), cookie.0.as_ref(), "Failed to delete permission")
        .await?;

    state.cache.invalidate(Resource::Permissions);
    state.cache.invalidate(Resource::Groups);
    Ok(Json(value))
}
