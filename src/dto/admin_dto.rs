//! DTOs del panel de administración

use serde::Deserialize;
use validator::Validate;

use crate::models::{UserChanges, UserRole};
use crate::utils::serde_helpers::patch_blank_as_null;

/// Cuerpo de `PATCH /api/admin/users/:id`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "patch_blank_as_null")]
    #[validate(length(max = 255))]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_blank_as_null")]
    #[validate(length(max = 255))]
    pub last_name: Option<Option<String>>,
}

impl UpdateUserRequest {
    pub fn into_changes(self) -> UserChanges {
        UserChanges {
            role: self.role,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}
