//! Política de autorización
//!
//! Toda operación resuelve primero al usuario que llama (`Caller`) y a
//! partir de ahí se comprueban dominio corporativo, rol y propiedad del
//! recurso. No hay estado global de sesión: el `Caller` se pasa
//! explícitamente a cada comprobación.

use tracing::warn;

use crate::models::{FieldReport, FieldTask, User};
use crate::repositories::FieldStore;
use crate::utils::errors::{access_denied, AppResult};

const DENIED: &str = "Access denied";

/// Usuario autenticado y autorizado para la request en curso
#[derive(Debug, Clone, PartialEq)]
pub struct Caller {
    pub user: User,
}

impl Caller {
    pub fn id(&self) -> &str {
        &self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}

/// Servicio de autorización para verificar dominio, roles y propiedad
#[derive(Debug, Clone)]
pub struct AuthorizationPolicy {
    allowed_domain: String,
}

impl AuthorizationPolicy {
    pub fn new(allowed_domain: impl Into<String>) -> Self {
        Self {
            allowed_domain: allowed_domain.into().trim_start_matches('@').to_ascii_lowercase(),
        }
    }

    pub fn allowed_domain(&self) -> &str {
        &self.allowed_domain
    }

    /// El email termina en `@<dominio>` sin distinguir mayúsculas
    pub fn is_allowed_email(&self, email: Option<&str>) -> bool {
        match email {
            Some(email) => email
                .trim()
                .to_ascii_lowercase()
                .ends_with(&format!("@{}", self.allowed_domain)),
            None => false,
        }
    }

    /// Verifica el dominio corporativo de un usuario ya cargado
    pub fn check_domain(&self, user: &User) -> AppResult<()> {
        if self.is_allowed_email(user.email.as_deref()) {
            Ok(())
        } else {
            warn!(subject = %user.id, "rejected: email outside corporate domain");
            Err(access_denied(DENIED))
        }
    }

    /// Carga al usuario del sujeto autenticado y verifica su dominio
    pub async fn authorize(&self, store: &dyn FieldStore, subject: &str) -> AppResult<Caller> {
        let user = store.get_user(subject).await?.ok_or_else(|| {
            warn!(subject = %subject, "rejected: no user record");
            access_denied(DENIED)
        })?;
        self.check_domain(&user)?;
        Ok(Caller { user })
    }

    /// Operaciones exclusivas de administradores
    pub fn require_admin(&self, caller: &Caller) -> AppResult<()> {
        if caller.is_admin() {
            Ok(())
        } else {
            warn!(subject = %caller.id(), "rejected: admin role required");
            Err(access_denied(DENIED))
        }
    }

    /// Un técnico solo accede a las tareas que tiene asignadas
    pub fn can_access_task(&self, caller: &Caller, task: &FieldTask) -> bool {
        caller.is_admin() || task.assigned_to_id.as_deref() == Some(caller.id())
    }

    /// Un técnico solo accede a los reportes que ha escrito
    pub fn can_access_report(&self, caller: &Caller, report: &FieldReport) -> bool {
        caller.is_admin() || report.user_id == caller.id()
    }

    pub fn ensure_task_access(&self, caller: &Caller, task: &FieldTask) -> AppResult<()> {
        if self.can_access_task(caller, task) {
            Ok(())
        } else {
            warn!(subject = %caller.id(), "rejected: not the task assignee");
            Err(access_denied(DENIED))
        }
    }

    pub fn ensure_report_access(&self, caller: &Caller, report: &FieldReport) -> AppResult<()> {
        if self.can_access_report(caller, report) {
            Ok(())
        } else {
            warn!(subject = %caller.id(), "rejected: not the report author");
            Err(access_denied(DENIED))
        }
    }

    /// Propietario con el que filtrar un listado; `None` es la vista completa
    ///
    /// Solo un admin que pide `all=true` ve filas de otros usuarios.
    pub fn list_scope<'a>(&self, caller: &'a Caller, all: bool) -> Option<&'a str> {
        if caller.is_admin() && all {
            None
        } else {
            Some(caller.id())
        }
    }
}
