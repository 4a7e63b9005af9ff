//! HTTP request handlers for the gateway's proxy API.
//!
//! Every handler follows the same shape: pull the session cookie, validate
//! any form fields locally, forward to the payment backend with the token
//! attached, and relay the backend's JSON verbatim. List reads go through
//! the query cache; mutations invalidate it only after the backend
//! confirms success.

pub mod auth;
pub mod groups;
pub mod permissions;
pub mod stats;
pub mod static_assets;
pub mod transactions;
pub mod users;
pub mod vendors;

use serde::Deserialize;

use crate::errors::{Error, Result};

/// Query parameter gating destructive operations. Deletes are refused
/// outright unless the caller passes `?confirm=true`; nothing is forwarded
/// to the backend for an unconfirmed delete.
#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

impl ConfirmQuery {
    pub fn require(&self) -> Result<()> {
        if !self.confirm {
            return Err(Error::BadRequest {
                message: "Deletion must be confirmed with confirm=true".to_string(),
            });
        }
        Ok(())
    }
}

/// Serialize a validated form into the JSON body forwarded to the backend.
pub(crate) fn to_body<T: serde::Serialize>(form: &T) -> Result<serde_json::Value> {
    serde_json::to_value(form).map_err(|e| Error::Internal {
        operation: format!("serialize request body: {e}"),
    })
}
