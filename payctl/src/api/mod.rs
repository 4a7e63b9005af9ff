//! API layer for HTTP request handling and data models.
//!
//! This module contains the browser-facing proxy API, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all proxied endpoints
//! - **[`models`]**: Mirrors of backend records plus form types
//!
//! # API Structure
//!
//! Everything the dashboard calls lives under `/api`:
//!
//! - **Authentication** (`/api/auth/*`): Login, logout, session resolution
//! - **Dashboard** (`/api/dashboard/stats`): Read-only aggregate stats
//! - **Users** (`/api/users/*`): User management and balance adjustments
//! - **Transactions** (`/api/transactions/*`): Transaction listing, payments, cancellation
//! - **Vendors** (`/api/vendors/*`): Vendor management
//! - **Groups** (`/api/groups/*`): Group management
//! - **Permissions** (`/api/permissions/*`): Permission records
//!
//! All of these are thin authenticated proxies: the backend owns the data
//! and the business rules; the gateway attaches the session token, caches
//! list reads and invalidates them after successful mutations.
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is served at `/docs` when the server is running.

pub mod handlers;
pub mod models;
