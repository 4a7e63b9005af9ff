//! Mirrors and forms for groups and permissions.
//!
//! Permissions are plain codenames on the backend. Group membership is
//! expressed through the `permissions` list carried on each group.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{Error, Result};
use crate::types::{GroupId, PermissionId};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    pub codename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupForm {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<PermissionId>,
}

impl GroupForm {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::BadRequest {
                message: "Name is required".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PermissionForm {
    pub name: String,
    pub codename: String,
}

impl PermissionForm {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::BadRequest {
                message: "Name is required".to_string(),
            });
        }
        if self.codename.trim().is_empty() {
            return Err(Error::BadRequest {
                message: "Codename is required".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_codename_required() {
        let form = PermissionForm {
            name: "Can view users".to_string(),
            codename: "".to_string(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_group_name_required() {
        let form = GroupForm {
            name: "   ".to_string(),
            permissions: vec![],
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_group_deserializes_without_permissions() {
        let group: Group = serde_json::from_str(r#"{"id": 3, "name": "cashiers"}"#).unwrap();
        assert!(group.permissions.is_empty());
    }
}
