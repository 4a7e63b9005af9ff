//! Transaction proxy: listing, payment creation and cancellation.
//!
//! The backend nests its transaction router under its own prefix, hence
//! the doubled path segment on outbound requests.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    api::handlers::to_body,
    api::models::transactions::{Transaction, TransactionForm},
    auth::current_user::SessionCookie,
    errors::Result,
    types::{Resource, TransactionId},
};

const TRANSACTIONS_PATH: &str = "/api/transactions/transactions/";

fn transaction_path(id: TransactionId) -> String {
    format!("/api/transactions/transactions/{id}/")
}

/// List transactions
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "transactions",
    responses(
        (status = 200, description = "Paginated transaction list"),
        (status = 500, description = "Backend unavailable or rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_transactions(State(state): State<AppState>, cookie: SessionCookie) -> Result<Json<serde_json::Value>> {
    let value = state
        .cache
        .get_or_fetch(Resource::Transactions, cookie.scope(), async {
            state
                .proxy
                .get(TRANSACTIONS_PATH, cookie.0.as_ref(), "Failed to fetch transactions")
                .await
        })
        .await?;

    Ok(Json(value.as_ref().clone()))
}

/// Fetch a single transaction
#[utoipa::path(
    get,
    path = "/transactions/{id}",
    tag = "transactions",
    params(("id" = i64, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "The transaction", body = Transaction),
        (status = 500, description = "Backend unavailable or rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_transaction(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<TransactionId>,
) -> Result<Json<serde_json::Value>> {
    let value = state
        .proxy
        .get(&transaction_path(id), cookie.0.as_ref(), "Failed to fetch transaction")
        .await?;
    Ok(Json(value))
}

/// Create a transaction
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "transactions",
    request_body = TransactionForm,
    responses(
        (status = 200, description = "Transaction created", body = Transaction),
        (status = 400, description = "Non-positive amount"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_transaction(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Json(form): Json<TransactionForm>,
) -> Result<Json<serde_json::Value>> {
    form.validate()?;

    let body = to_body(&form)?;
    let value = state
        .proxy
        .post(TRANSACTIONS_PATH, cookie.0.as_ref(), &body, "Failed to create transaction")
        .await?;

    state.cache.invalidate(Resource::Transactions);
    state.cache.invalidate(Resource::Users);
    state.cache.invalidate(Resource::DashboardStats);
    Ok(Json(value))
}

/// Create a payment
#[utoipa::path(
    post,
    path = "/transactions/payment",
    tag = "transactions",
    request_body = TransactionForm,
    responses(
        (status = 200, description = "Payment created", body = Transaction),
        (status = 400, description = "Non-positive amount"),
        (status = 500, description = "Backend rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_payment(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Json(form): Json<TransactionForm>,
) -> Result<Json<serde_json::Value>> {
    form.validate()?;

    let body = to_body(&form)?;
    let value = state
        .proxy
        .post(
            "/api/transactions/transactions/make_payment/",
            cookie.0.as_ref(),
            &body,
            "Failed to create payment",
        )
        .await?;

    state.cache.invalidate(Resource::Transactions);
    state.cache.invalidate(Resource::Users);
    state.cache.invalidate(Resource::DashboardStats);
    Ok(Json(value))
}

/// Cancel a pending transaction
#[utoipa::path(
    post,
    path = "/transactions/{id}/cancel",
    tag = "transactions",
    params(("id" = i64, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction cancelled", body = Transaction),
        (status = 500, description = "Backend refused; only pending transactions cancel"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn cancel_transaction(
    State(state): State<AppState>,
    cookie: SessionCookie,
    Path(id): Path<TransactionId>,
) -> Result<Json<serde_json::Value>> {
    let value = state
        .proxy
        .post_empty(
            &format!("/api/transactions/transactions/{id}/cancel_transaction/"),
            cookie.0.as_ref(),
            "Failed to cancel transaction",
        )
        .await?;

    state.cache.invalidate(Resource::Transactions);
    state.cache.invalidate(Resource::Users);
    state.cache.invalidate(Resource::DashboardStats);
    Ok(Json(value))
}
