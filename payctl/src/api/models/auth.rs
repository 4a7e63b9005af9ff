//! Login and logout request/response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::models::users::CurrentUser;
use crate::errors::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::BadRequest {
                message: "Username is required".to_string(),
            });
        }
        if self.password.is_empty() {
            return Err(Error::BadRequest {
                message: "Password is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Shape of the backend's token issuance response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: CurrentUser,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}
