//! Mirrors and forms for user records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::models::is_valid_email;
use crate::errors::{Error, Result};
use crate::types::{PermissionSet, UserId};

/// A backend user record, as rendered by the dashboard tables.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

/// A user's wallet profile. Balance is backend-derived; the gateway never
/// computes it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: i64,
    pub user: User,
    pub balance: Decimal,
    pub qr_code_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The resolved session: the user record the backend reports for the
/// current token, plus their permission codenames.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl CurrentUser {
    /// The user's permission codenames as a set, possibly empty.
    pub fn permission_set(&self) -> PermissionSet {
        self.permissions.iter().cloned().collect()
    }
}

/// Create/update form for a user. Matches the dashboard's user modal:
/// password is required on create only, names and flags are optional.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
}

impl UserForm {
    /// Field validation applied before anything is forwarded. Server-side
    /// validation errors are NOT field-mapped back; only these checks
    /// produce per-field messages.
    pub fn validate(&self, require_password: bool) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::BadRequest {
                message: "Username is required".to_string(),
            });
        }
        if self.email.trim().is_empty() {
            return Err(Error::BadRequest {
                message: "Email is required".to_string(),
            });
        }
        if !is_valid_email(&self.email) {
            return Err(Error::BadRequest {
                message: "Invalid email address".to_string(),
            });
        }
        if require_password && self.password.as_deref().is_none_or(str::is_empty) {
            return Err(Error::BadRequest {
                message: "Password is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Admin balance adjustment (top-up or removal) for a user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BalanceUpdateForm {
    /// Positive amount to add; negative to remove
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BalanceUpdateForm {
    pub fn validate(&self) -> Result<()> {
        if self.amount.is_zero() {
            return Err(Error::BadRequest {
                message: "Amount must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> UserForm {
        UserForm {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: Some("hunter22".to_string()),
            first_name: None,
            last_name: None,
            is_active: Some(true),
            is_staff: None,
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate(true).is_ok());
    }

    #[test]
    fn test_username_required() {
        let mut form = valid_form();
        form.username = "  ".to_string();
        assert!(form.validate(true).is_err());
    }

    #[test]
    fn test_email_pattern_checked() {
        let mut form = valid_form();
        form.email = "not-an-email".to_string();
        let err = form.validate(true).unwrap_err();
        assert_eq!(err.user_message(), "Invalid email address");
    }

    #[test]
    fn test_password_only_required_on_create() {
        let mut form = valid_form();
        form.password = None;
        assert!(form.validate(true).is_err());
        assert!(form.validate(false).is_ok());
    }

    #[test]
    fn test_current_user_permission_set() {
        let user: CurrentUser = serde_json::from_value(serde_json::json!({
            "id": 1,
            "username": "admin",
            "email": "admin@example.com",
            "is_active": true,
            "is_staff": true,
            "permissions": ["view_users", "edit_users"]
        }))
        .unwrap();

        let perms = user.permission_set();
        assert!(perms.contains("view_users"));
        assert!(!perms.contains("delete_users"));
    }

    #[test]
    fn test_permissions_default_to_empty() {
        // Backends that omit the permissions field yield an empty set
        let user: CurrentUser = serde_json::from_value(serde_json::json!({
            "id": 2,
            "username": "bob",
            "email": "bob@example.com",
            "is_active": true,
            "is_staff": false
        }))
        .unwrap();
        assert!(user.permission_set().is_empty());
    }
}
