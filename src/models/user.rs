//! Modelo de User
//!
//! Usuarios identificados por el proveedor de identidad externo. El `id` es
//! el `sub` del token; el registro se crea en el primer login (upsert).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Technician,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Technician => "technician",
            UserRole::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technician" => Ok(UserRole::Technician),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role `{}`", other)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User - mapea a la tabla `users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Datos de identidad para el upsert de login
///
/// El rol nunca viaja en el upsert: un usuario nuevo entra como
/// `technician` y un re-login no pisa el rol asignado por un admin.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertUser {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

/// Cambios que un admin puede aplicar a un usuario
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub role: Option<UserRole>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
}

impl UserChanges {
    pub fn apply_to(&self, user: &mut User) {
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
    }
}
