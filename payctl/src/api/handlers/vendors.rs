//! Vendor management proxy.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState,
    api::handlers::{ConfirmQuery, to_body},
    api::models::vendors::{Vendor, VendorForm},
    auth::current_user::SessionCookie,
    errors::Result,
    types::{Resource, VendorId},
};

// The backend nests its vendor router under its own prefix
const VENDORS_PATH: &str = "/api/vendors/vendors/";

fn vendor_path(id: VendorId) -> String {
    format!("/api/vendors/vendors/{id}/")
}

/// List vendors
#[utoipa::path(
    get,
    path = "/vendors",
    tag = "vendors",
    responses(
        (status = 200, description = "Paginated vendor list"),
        (status = 500, description = "Backend unavailable or rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_vendors(State(state): State<AppState>, cookie: SessionCookie) -> Result<Json<serde_json::Value>> {
    let value = state
        .cache
        .get_or_fetch(Resource::Vendors, cookie.scope(), async {
            state.proxy.get(VENDORS_PATH, cookie.0.as_ref(), "Failed to fetch vendors").await
        })
        .await?;

    Ok(Json(value.as_ref().clone()))
}

/// Fetch a single vendor
#[utoipa::path(
    get,
    path = "/vendors/{id}",
    tag = "vendors",
    params(("id" = i64, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "The vendor", body = Vendor),
        (status = 500, description = "Backend unavailable or rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_vendor(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<VendorId>,
) -> Result<Json<serde_json::Value>> {
    let value = state
        .proxy
        .get(&vendor_path(id), cookie.0.as_ref(), "Failed to fetch vendor")
        .await?;
    Ok(Json(value))
}

/// Create a vendor
#[utoipa::path(
    post,
    path = "/vendors",
    tag = "vendors",
    request_body = VendorForm,
    responses(
        (status = 200, description = "Vendor created", body = Vendor),
        (status = 400, description = "Missing name"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_vendor(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Json(form): Json<VendorForm>,
) -> Result<Json<serde_json::Value>> {
    form.validate()?;

    let body = to_body(&form)?;
    let value = state
        .proxy
        .post(VENDORS_PATH, cookie.0.as_ref(), &body, "Failed to create vendor")
        .await?;

    state.cache.invalidate(Resource::Vendors);
    state.cache.invalidate(Resource::DashboardStats);
    Ok(Json(value))
}

/// Update a vendor
#[utoipa::path(
    patch,
    path = "/vendors/{id}",
    tag = "vendors",
    request_body = VendorForm,
    params(("id" = i64, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor updated", body = Vendor),
        (status = 400, description = "Missing name"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_vendor(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<VendorId>,
    Json(form): Json<VendorForm>,
) -> Result<Json<serde_json::Value>> {
    form.validate()?;

    let body = to_body(&form)?;
    let value = state
        .proxy
        .patch(&vendor_path(id), cookie.0.as_ref(), &body, "Failed to update vendor")
        .await?;

    state.cache.invalidate(Resource::Vendors);
    Ok(Json(value))
}

/// Delete a vendor
#[utoipa::path(
    delete,
    path = "/vendors/{id}",
    tag = "vendors",
    params(
        ("id" = i64, Path, description = "Vendor ID"),
        ("confirm" = bool, Query, description = "Must be true; unconfirmed deletes are refused"),
    ),
    responses(
        (status = 200, description = "Vendor deleted"),
        (status = 400, description = "Deletion not confirmed"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_vendor(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<VendorId>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<serde_json::Value>> {
    query.require()?;

    let value = state
        .proxy
        .delete(&vendor_path(id), cookie.0.as_ref(), "Failed to delete vendor")
        .await?;

    state.cache.invalidate(Resource::Vendors);
    state.cache.invalidate(Resource::DashboardStats);
    Ok(Json(value))
}
