//! Controlador de autenticación
//!
//! `login` es el callback de primer acceso y reautenticación: hace upsert
//! del usuario con los datos del token. El rol nunca se toca aquí.

use tracing::info;

use crate::middleware::AuthSubject;
use crate::models::User;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct AuthController<'a> {
    state: &'a AppState,
}

impl<'a> AuthController<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn login(&self, subject: &AuthSubject) -> AppResult<User> {
        let user = self.state.store().upsert_user(subject.claims.to_upsert()).await?;
        self.state.policy.check_domain(&user)?;
        info!("🔐 Login de {} ({})", user.id, user.role);
        Ok(user)
    }

    pub async fn current_user(&self, subject: &AuthSubject) -> AppResult<User> {
        let user = self
            .state
            .store()
            .get_user(subject.id())
            .await?
            .ok_or_else(|| not_found_error("User"))?;
        self.state.policy.check_domain(&user)?;
        Ok(user)
    }
}
