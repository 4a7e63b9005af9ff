//! Authentication and authorization for the gateway.
//!
//! The gateway never mints credentials of its own: the session token is an
//! opaque string issued by the payment backend at login and stored in a
//! cookie. Everything here is about moving that token around and deciding
//! what the bearer may see.
//!
//! # Pieces
//!
//! - [`session`]: the cookie contract - reading the `token` cookie from a
//!   request, and building the `Set-Cookie` values for login and logout.
//! - [`current_user`]: resolves a session token to a [`CurrentUser`] by
//!   asking the backend, exposed as an axum extractor so handlers can take
//!   the authenticated user as an argument.
//! - [`guard`]: the route guard state machine protecting dashboard pages,
//!   plus the middleware that applies it.
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use payctl::auth::current_user::CurrentUser;
//!
//! async fn me(user: CurrentUser) -> Json<CurrentUser> {
//!     Json(user)
//! }
//! ```
//!
//! Proxy handlers deliberately do NOT require authentication: a missing
//! token is still forwarded (as the literal `Token undefined`) and the
//! backend gets to reject it. Only page routes go through the guard.
//!
//! [`CurrentUser`]: crate::api::models::users::CurrentUser

pub mod current_user;
pub mod guard;
pub mod session;
