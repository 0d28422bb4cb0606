//! Modelos de Analytics
//!
//! Estadísticas por técnico y el feed de actividad reciente del panel admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Contadores de tareas de un usuario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub today_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub weekly_tasks: i64,
}

/// Tipo de entidad de un evento del feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Task,
    Report,
}

/// Evento del feed de actividad reciente
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Estado de la entidad (`completed`, `draft`, `submitted`...)
    pub action: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub user: Option<User>,
}
