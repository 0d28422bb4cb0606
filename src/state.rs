//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. No contiene estado de sesión: la identidad
//! llega en cada request.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::FieldStore;
use crate::services::AuthorizationPolicy;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub store: Arc<dyn FieldStore>,
    pub policy: AuthorizationPolicy,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, store: Arc<dyn FieldStore>) -> Self {
        let policy = AuthorizationPolicy::new(config.allowed_email_domain.clone());
        Self {
            config: Arc::new(config),
            store,
            policy,
        }
    }

    pub fn store(&self) -> &dyn FieldStore {
        self.store.as_ref()
    }
}
