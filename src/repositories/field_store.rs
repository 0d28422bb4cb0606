use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    ActivityEvent, FieldReport, FieldReportChanges, FieldTask, FieldTaskChanges, NewFieldReport,
    NewFieldTask, ReportWithRelations, TaskWithAssignee, UpsertUser, User, UserChanges,
};
use crate::repositories::filters::{ReportFilter, TaskFilter};
use crate::utils::errors::AppError;

/// Almacén de entidades: usuarios, tareas y reportes.
///
/// `owner` en los listados limita el resultado a filas cuyo asignado/autor
/// es ese usuario; `None` significa sin restricción (vista admin).
#[async_trait]
pub trait FieldStore: Send + Sync {
    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn upsert_user(&self, user: UpsertUser) -> Result<User, AppError>;
    async fn update_user(&self, id: &str, changes: UserChanges) -> Result<Option<User>, AppError>;
    /// Ordenados por nombre y apellido
    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    async fn list_tasks(&self, owner: Option<&str>, filter: &TaskFilter) -> Result<Vec<TaskWithAssignee>, AppError>;
    async fn get_task(&self, id: Uuid) -> Result<Option<TaskWithAssignee>, AppError>;
    async fn create_task(&self, task: NewFieldTask) -> Result<FieldTask, AppError>;
    async fn update_task(&self, id: Uuid, changes: FieldTaskChanges) -> Result<Option<FieldTask>, AppError>;
    /// Los reportes que apuntaban a la tarea quedan con `task_id = NULL`
    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError>;
    async fn count_tasks(&self, owner: Option<&str>, filter: &TaskFilter) -> Result<i64, AppError>;

    async fn list_reports(&self, owner: Option<&str>, filter: &ReportFilter) -> Result<Vec<ReportWithRelations>, AppError>;
    async fn get_report(&self, id: Uuid) -> Result<Option<ReportWithRelations>, AppError>;
    async fn create_report(&self, report: NewFieldReport) -> Result<FieldReport, AppError>;
    async fn update_report(&self, id: Uuid, changes: FieldReportChanges) -> Result<Option<FieldReport>, AppError>;

    /// Tareas completadas, `updated_at` más reciente primero
    async fn recent_completed_tasks(&self, limit: i64) -> Result<Vec<ActivityEvent>, AppError>;
    /// Reportes, `created_at` más reciente primero
    async fn recent_reports(&self, limit: i64) -> Result<Vec<ActivityEvent>, AppError>;
}
