//! Modelo de FieldTask
//!
//! Trabajo programado asignado a un técnico. Las vistas con relaciones
//! (`TaskWithAssignee`) se construyen en la capa de repositorios.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Estado de una tarea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status `{}`", other)),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prioridad de una tarea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!("unknown task priority `{}`", other)),
        }
    }
}

/// FieldTask - mapea a la tabla `field_tasks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTask {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub location: String,
    pub assigned_to_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub vehicle_plate: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub scheduled_start_time: Option<String>,
    pub scheduled_end_time: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tarea con su técnico asignado (LEFT JOIN users)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithAssignee {
    #[serde(flatten)]
    pub task: FieldTask,
    pub assigned_to: Option<User>,
}

/// Datos para crear una tarea (sin id ni timestamps)
#[derive(Debug, Clone, PartialEq)]
pub struct NewFieldTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub location: String,
    pub assigned_to_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub vehicle_plate: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub scheduled_start_time: Option<String>,
    pub scheduled_end_time: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl NewFieldTask {
    pub fn into_task(self, id: Uuid, now: DateTime<Utc>) -> FieldTask {
        FieldTask {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            location: self.location,
            assigned_to_id: self.assigned_to_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            vehicle_plate: self.vehicle_plate,
            scheduled_date: self.scheduled_date,
            scheduled_start_time: self.scheduled_start_time,
            scheduled_end_time: self.scheduled_end_time,
            completed_at: self.completed_at,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Actualización parcial de una tarea
///
/// `None` = campo ausente (no se toca); `Some(None)` = borrar el valor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub location: Option<String>,
    pub assigned_to_id: Option<Option<String>>,
    pub customer_name: Option<Option<String>>,
    pub customer_phone: Option<Option<String>>,
    pub vehicle_plate: Option<Option<String>>,
    pub scheduled_date: Option<Option<DateTime<Utc>>>,
    pub scheduled_start_time: Option<Option<String>>,
    pub scheduled_end_time: Option<Option<String>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl FieldTaskChanges {
    /// Aplica los cambios presentes y refresca `updated_at`
    pub fn apply_to(&self, task: &mut FieldTask, now: DateTime<Utc>) {
        if let Some(v) = &self.title {
            task.title = v.clone();
        }
        if let Some(v) = &self.description {
            task.description = v.clone();
        }
        if let Some(v) = self.status {
            task.status = v;
        }
        if let Some(v) = self.priority {
            task.priority = v;
        }
        if let Some(v) = &self.location {
            task.location = v.clone();
        }
        if let Some(v) = &self.assigned_to_id {
            task.assigned_to_id = v.clone();
        }
        if let Some(v) = &self.customer_name {
            task.customer_name = v.clone();
        }
        if let Some(v) = &self.customer_phone {
            task.customer_phone = v.clone();
        }
        if let Some(v) = &self.vehicle_plate {
            task.vehicle_plate = v.clone();
        }
        if let Some(v) = self.scheduled_date {
            task.scheduled_date = v;
        }
        if let Some(v) = &self.scheduled_start_time {
            task.scheduled_start_time = v.clone();
        }
        if let Some(v) = &self.scheduled_end_time {
            task.scheduled_end_time = v.clone();
        }
        if let Some(v) = self.completed_at {
            task.completed_at = v;
        }
        task.updated_at = now;
    }
}
