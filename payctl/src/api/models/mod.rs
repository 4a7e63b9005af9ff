//! Mirrors of backend records and the gateway's form types.
//!
//! Every response model here is a pass-through mirror: the backend owns
//! these records, the gateway only deserializes them for validation, docs
//! and tests, and relays the JSON it received. Nothing is mutated locally.

pub mod auth;
pub mod groups;
pub mod stats;
pub mod transactions;
pub mod users;
pub mod vendors;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The backend's standard paginated list envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Minimal email shape check applied before a form is forwarded: one `@`
/// with a non-empty local part, and a domain containing a dot with an
/// alphabetic TLD of at least two characters. The backend remains the
/// authority on deliverability.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}
