//! Almacén en memoria
//!
//! Implementación de `FieldStore` sin base de datos, usada en tests y en
//! desarrollo local (`STORE_BACKEND=memory`). Comparte filtros y orden con
//! el almacén PostgreSQL a través de `repositories::filters`.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    ActivityEvent, ActivityKind, FieldReport, FieldReportChanges, FieldTask, FieldTaskChanges,
    NewFieldReport, NewFieldTask, ReportWithRelations, TaskStatus, TaskWithAssignee, UpsertUser,
    User, UserChanges, UserRole,
};
use crate::repositories::field_store::FieldStore;
use crate::repositories::filters::{report_ordering, task_ordering, ReportFilter, TaskFilter};
use crate::utils::errors::AppError;

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    tasks: HashMap<Uuid, FieldTask>,
    reports: HashMap<Uuid, FieldReport>,
}

impl Tables {
    fn task_view(&self, task: &FieldTask) -> TaskWithAssignee {
        TaskWithAssignee {
            task: task.clone(),
            assigned_to: task
                .assigned_to_id
                .as_ref()
                .and_then(|id| self.users.get(id))
                .cloned(),
        }
    }

    fn report_view(&self, report: &FieldReport) -> Result<ReportWithRelations, AppError> {
        let user = self.users.get(&report.user_id).cloned().ok_or_else(|| {
            AppError::Internal(format!("report {} references missing author", report.id))
        })?;
        Ok(ReportWithRelations {
            report: report.clone(),
            task: report.task_id.and_then(|id| self.tasks.get(&id)).cloned(),
            user,
        })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Nombre y apellido ascendentes con NULL al final, como en PostgreSQL; luego id
fn user_ordering(a: &User, b: &User) -> Ordering {
    fn nulls_last(x: &Option<String>, y: &Option<String>) -> Ordering {
        match (x, y) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
    nulls_last(&a.first_name, &b.first_name)
        .then_with(|| nulls_last(&a.last_name, &b.last_name))
        .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl FieldStore for MemoryStore {
    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn upsert_user(&self, data: UpsertUser) -> Result<User, AppError> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .entry(data.id.clone())
            .and_modify(|existing| {
                existing.email = data.email.clone();
                existing.first_name = data.first_name.clone();
                existing.last_name = data.last_name.clone();
                existing.profile_image_url = data.profile_image_url.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| User {
                id: data.id.clone(),
                email: data.email.clone(),
                first_name: data.first_name.clone(),
                last_name: data.last_name.clone(),
                profile_image_url: data.profile_image_url.clone(),
                role: UserRole::default(),
                created_at: now,
                updated_at: now,
            });
        Ok(user.clone())
    }

    async fn update_user(&self, id: &str, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(id).map(|user| {
            changes.apply_to(user);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(user_ordering);
        Ok(users)
    }

    async fn list_tasks(&self, owner: Option<&str>, filter: &TaskFilter) -> Result<Vec<TaskWithAssignee>, AppError> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<&FieldTask> = tables
            .tasks
            .values()
            .filter(|t| filter.matches(t, owner))
            .collect();
        tasks.sort_by(|a, b| task_ordering(a, b));
        Ok(tasks.into_iter().map(|t| tables.task_view(t)).collect())
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<TaskWithAssignee>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.get(&id).map(|t| tables.task_view(t)))
    }

    async fn create_task(&self, task: NewFieldTask) -> Result<FieldTask, AppError> {
        let task = task.into_task(Uuid::new_v4(), Utc::now());
        self.tables.write().await.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: Uuid, changes: FieldTaskChanges) -> Result<Option<FieldTask>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.tasks.get_mut(&id).map(|task| {
            changes.apply_to(task, Utc::now());
            task.clone()
        }))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.tasks.remove(&id).is_none() {
            return Ok(false);
        }
        for report in tables.reports.values_mut() {
            if report.task_id == Some(id) {
                report.task_id = None;
            }
        }
        Ok(true)
    }

    async fn count_tasks(&self, owner: Option<&str>, filter: &TaskFilter) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        let count = tables
            .tasks
            .values()
            .filter(|t| filter.matches(t, owner))
            .count();
        Ok(count as i64)
    }

    async fn list_reports(&self, owner: Option<&str>, filter: &ReportFilter) -> Result<Vec<ReportWithRelations>, AppError> {
        let tables = self.tables.read().await;
        let mut reports: Vec<&FieldReport> = tables
            .reports
            .values()
            .filter(|r| filter.matches(r, owner))
            .collect();
        reports.sort_by(|a, b| report_ordering(a, b));
        reports.into_iter().map(|r| tables.report_view(r)).collect()
    }

    async fn get_report(&self, id: Uuid) -> Result<Option<ReportWithRelations>, AppError> {
        let tables = self.tables.read().await;
        tables.reports.get(&id).map(|r| tables.report_view(r)).transpose()
    }

    async fn create_report(&self, report: NewFieldReport) -> Result<FieldReport, AppError> {
        let report = report.into_report(Uuid::new_v4(), Utc::now());
        self.tables.write().await.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn update_report(&self, id: Uuid, changes: FieldReportChanges) -> Result<Option<FieldReport>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.reports.get_mut(&id).map(|report| {
            changes.apply_to(report, Utc::now());
            report.clone()
        }))
    }

    async fn recent_completed_tasks(&self, limit: i64) -> Result<Vec<ActivityEvent>, AppError> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<&FieldTask> = tables
            .tasks
            .values()
            .filter(|t| t.status == TaskStatus::Completed)
            .collect();
        tasks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| b.id.cmp(&a.id)));
        Ok(tasks
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|t| ActivityEvent {
                id: t.id,
                kind: ActivityKind::Task,
                action: t.status.as_str().to_string(),
                location: t.location.clone(),
                timestamp: t.updated_at,
                user: t.assigned_to_id.as_ref().and_then(|id| tables.users.get(id)).cloned(),
            })
            .collect())
    }

    async fn recent_reports(&self, limit: i64) -> Result<Vec<ActivityEvent>, AppError> {
        let tables = self.tables.read().await;
        let mut reports: Vec<&FieldReport> = tables.reports.values().collect();
        reports.sort_by(|a, b| report_ordering(a, b));
        Ok(reports
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|r| ActivityEvent {
                id: r.id,
                kind: ActivityKind::Report,
                action: r.status.as_str().to_string(),
                location: r.location.clone(),
                timestamp: r.created_at,
                user: tables.users.get(&r.user_id).cloned(),
            })
            .collect())
    }
}
