//! Controlador de gestión de usuarios (solo admin)

use tracing::info;

use crate::dto::UpdateUserRequest;
use crate::models::User;
use crate::services::Caller;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::extract::parse_validated;

pub struct AdminController<'a> {
    state: &'a AppState,
}

impl<'a> AdminController<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Usuarios del dominio corporativo, por nombre y apellido
    pub async fn list_users(&self, caller: &Caller) -> AppResult<Vec<User>> {
        self.state.policy.require_admin(caller)?;
        let users = self.state.store().list_users().await?;
        Ok(users
            .into_iter()
            .filter(|u| self.state.policy.is_allowed_email(u.email.as_deref()))
            .collect())
    }

    pub async fn update_user(&self, caller: &Caller, id: &str, body: &[u8]) -> AppResult<User> {
        self.state.policy.require_admin(caller)?;
        if self.state.store().get_user(id).await?.is_none() {
            return Err(not_found_error("User"));
        }
        let request: UpdateUserRequest = parse_validated(body)?;
        let changes = request.into_changes();
        let user = self
            .state
            .store()
            .update_user(id, changes.clone())
            .await?
            .ok_or_else(|| not_found_error("User"))?;
        if let Some(role) = changes.role {
            info!("👤 Rol de {} cambiado a {} por {}", user.id, role, caller.id());
        }
        Ok(user)
    }
}
