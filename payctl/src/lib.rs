//! # payctl: Session-Gated Admin Gateway for the Payment System
//!
//! `payctl` sits between the admin dashboard running in a browser and the
//! payment backend's REST API. It owns the browser-facing concerns the
//! backend deliberately does not: the session cookie, page-level access
//! control, short-lived caching of list queries, and serving the dashboard
//! shell itself.
//!
//! ## Overview
//!
//! The payment backend authenticates with opaque bearer tokens and knows
//! nothing about browsers. `payctl` bridges the two worlds: at login it
//! exchanges credentials for a backend token and stores it in an HttpOnly
//! cookie, and on every subsequent request it lifts the token back out of
//! the cookie and forwards it as a token-style `Authorization` header. The
//! browser never sees or holds the token directly.
//!
//! ### Request Flow
//!
//! Requests to `/api/*` are authenticated proxy calls: the handler reads
//! the session cookie, validates any form fields, forwards the request to
//! the backend with the token attached, and relays the backend's JSON
//! verbatim. List reads are cached per session with generation-based
//! invalidation; mutations invalidate the affected resources only after
//! the backend confirms success. Backend failures are collapsed into a
//! fixed `{"error": ...}` envelope with HTTP 500 unless passthrough mode
//! is configured.
//!
//! Every other path is a dashboard page. Page requests pass through the
//! route guard ([`auth::guard`]), which resolves the session against the
//! backend and either serves the embedded SPA shell or answers 303 to the
//! login or unauthorized page.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use payctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = payctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     payctl::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config)?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod errors;
mod openapi;
pub mod proxy;
mod static_assets;
pub mod telemetry;
pub mod types;

#[cfg(test)]
mod test;
#[cfg(test)]
pub mod test_utils;

use axum::{
    Router,
    http::{self, HeaderValue},
    middleware::from_fn_with_state,
    routing::{get, post},
};
use bon::Builder;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::cache::QueryCache;
use crate::config::CorsOrigin;
use crate::openapi::ApiDoc;
use crate::proxy::ProxyClient;

pub use config::Config;
pub use types::{GroupId, PermissionId, TransactionId, UserId, VendorId};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .proxy(ProxyClient::new(&config))
///     .cache(QueryCache::new(&config.cache))
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub proxy: ProxyClient,
    pub cache: QueryCache,
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    // A wildcard cannot appear inside an origin list; it has to become
    // AllowOrigin::any
    let allow_origin = if config.cors.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &config.cors.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                origins.push(url.as_str().parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    // LOCATION exposed so the dashboard can observe guard redirects
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(config.cors.allow_credentials)
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PATCH,
            http::Method::DELETE,
        ])
        .expose_headers(vec![http::header::LOCATION]);

    Ok(cors)
}

/// Build the main application router.
///
/// The router has three surfaces: the proxy API under `/api`, interactive
/// API docs at `/docs`, and the guarded dashboard pages everywhere else.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        // Session lifecycle
        .route("/auth/login", post(api::handlers::auth::login))
        .route("/auth/logout", post(api::handlers::auth::logout))
        .route("/auth/me", get(api::handlers::auth::me))
        // Dashboard statistics
        .route("/dashboard/stats", get(api::handlers::stats::dashboard_stats))
        // User management
        .route("/users", get(api::handlers::users::list_users).post(api::handlers::users::create_user))
        .route(
            "/users/{id}",
            get(api::handlers::users::get_user)
                .patch(api::handlers::users::update_user)
                .delete(api::handlers::users::delete_user),
        )
        .route("/users/{id}/balance", post(api::handlers::users::update_balance))
        // Transactions
        .route(
            "/transactions",
            get(api::handlers::transactions::list_transactions).post(api::handlers::transactions::create_transaction),
        )
        .route("/transactions/payment", post(api::handlers::transactions::create_payment))
        .route("/transactions/{id}", get(api::handlers::transactions::get_transaction))
        .route("/transactions/{id}/cancel", post(api::handlers::transactions::cancel_transaction))
        // Vendors
        .route(
            "/vendors",
            get(api::handlers::vendors::list_vendors).post(api::handlers::vendors::create_vendor),
        )
        .route(
            "/vendors/{id}",
            get(api::handlers::vendors::get_vendor)
                .patch(api::handlers::vendors::update_vendor)
                .delete(api::handlers::vendors::delete_vendor),
        )
        // Groups and permissions
        .route(
            "/groups",
            get(api::handlers::groups::list_groups).post(api::handlers::groups::create_group),
        )
        .route(
            "/groups/{id}",
            get(api::handlers::groups::get_group)
                .patch(api::handlers::groups::update_group)
                .delete(api::handlers::groups::delete_group),
        )
        .route(
            "/permissions",
            get(api::handlers::permissions::list_permissions).post(api::handlers::permissions::create_permission),
        )
        .route(
            "/permissions/{id}",
            get(api::handlers::permissions::get_permission)
                .patch(api::handlers::permissions::update_permission)
                .delete(api::handlers::permissions::delete_permission),
        )
        .with_state(state.clone());

    // Everything that is not the API is a dashboard page: the guard runs
    // first, then the embedded shell is served with SPA fallback
    let pages = Router::new()
        .fallback(get(api::handlers::static_assets::serve_embedded_asset))
        .layer(from_fn_with_state(state.clone(), auth::guard::page_guard));

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .fallback_service(pages);

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        tracing::debug!("Starting gateway with configuration: {:#?}", config);

        let state = AppState::builder()
            .proxy(ProxyClient::new(&config))
            .cache(QueryCache::new(&config.cache))
            .config(config.clone())
            .build();

        let router = build_router(state)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Payment admin gateway listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
