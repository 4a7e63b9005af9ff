//! Group management proxy.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState,
    api::handlers::{ConfirmQuery, to_body},
    api::models::groups::{Group, GroupForm},
    auth::current_user::SessionCookie,
    errors::Result,
    types::{GroupId, Resource},
};

const GROUPS_PATH: &str = "/api/accounts/groups/";

fn group_path(id: GroupId) -> String {
    format!("/api/accounts/groups/{id}/")
}

/// List groups
#[utoipa::path(
    get,
    path = "/groups",
    tag = "groups",
    responses(
        (status = 200, description = "Group list"),
        (status = 500, description = "Backend unavailable or rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_groups(State(state): State<AppState>, cookie: SessionCookie) -> Result<Json<serde_json::Value>> {
    let value = state
        .cache
        .get_or_fetch(Resource::Groups, cookie.scope(), async {
            state.proxy.get(GROUPS_PATH, cookie.0.as_ref(), "Failed to fetch groups").await
        })
        .await?;

    Ok(Json(value.as_ref().clone()))
}

/// Fetch a single group
#[utoipa::path(
    get,
    path = "/groups/{id}",
    tag = "groups",
    params(("id" = i64, Path, description = "Group ID")),
    responses(
        (status = 200, description = "The group", body = Group),
        (status = 500, description = "Backend unavailable or rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_group(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<GroupId>,
) -> Result<Json<serde_json::Value>> {
    let value = state
        .proxy
        .get(&group_path(id), cookie.0.as_ref(), "Failed to fetch group")
        .await?;
    Ok(Json(value))
}

/// Create a group
#[utoipa::path(
    post,
    path = "/groups",
    tag = "groups",
    request_body = GroupForm,
    responses(
        (status = 200, description = "Group created", body = Group),
        (status = 400, description = "Missing name"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_group(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Json(form): Json<GroupForm>,
) -> Result<Json<serde_json::Value>> {
    form.validate()?;

    let body = to_body(&form)?;
    let value = state
        .proxy
        .post(GROUPS_PATH, cookie.0.as_ref(), &body, "Failed to create group")
        .await?;

    state.cache.invalidate(Resource::Groups);
    Ok(Json(value))
}

/// Update a group
#[utoipa::path(
    patch,
    path = "/groups/{id}",
    tag = "groups",
    request_body = GroupForm,
    params(("id" = i64, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group updated", body = Group),
        (status = 400, description = "Missing name"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_group(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<GroupId>,
    Json(form): Json<GroupForm>,
) -> Result<Json<serde_json::Value>> {
    form.validate()?;

    let body = to_body(&form)?;
    let value = state
        .proxy
        .patch(&group_path(id), cookie.0.as_ref(), &body, "Failed to update group")
        .await?;

    state.cache.invalidate(Resource::Groups);
    // Group membership feeds the permission codenames attached to users
    state.cache.invalidate(Resource::Permissions);
    Ok(Json(value))
}

/// Delete a group
#[utoipa::path(
    delete,
    path = "/groups/{id}",
    tag = "groups",
    params(
        ("id" = i64, Path, description = "Group ID"),
        ("confirm" = bool, Query, description = "Must be true; unconfirmed deletes are refused"),
    ),
    responses(
        (status = 200, description = "Group deleted"),
        (status = 400, description = "Deletion not confirmed"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_group(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<GroupId>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<serde_json::Value>> {
    query.require()?;

    let value = state
        .proxy
        .delete(&group_path(id), cookie.0.as_ref(), "Failed to delete group")
        .await?;

    state.cache.invalidate(Resource::Groups);
    Ok(Json(value))
}
