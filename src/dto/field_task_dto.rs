//! DTOs de tareas de campo
//!
//! Cuerpos de creación y actualización parcial, y parámetros de listado.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::{FieldTaskChanges, NewFieldTask, TaskPriority, TaskStatus};
use crate::repositories::{DayWindow, TaskFilter};
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::serde_helpers::{
    blank_as_none, double_option, optional_timestamp, patch_blank_as_null, patch_timestamp,
};
use crate::utils::validation::{non_empty, validate_date, validate_not_blank, validate_phone, validate_time_of_day};

/// Cuerpo de `POST /api/field-tasks`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateFieldTaskRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[validate(custom = "validate_not_blank")]
    pub location: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub assigned_to_id: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 255))]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 20), custom = "validate_phone")]
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 20))]
    pub vehicle_plate: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom = "validate_time_of_day")]
    pub scheduled_start_time: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom = "validate_time_of_day")]
    pub scheduled_end_time: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CreateFieldTaskRequest {
    pub fn into_new_task(self) -> NewFieldTask {
        NewFieldTask {
            title: self.title.trim().to_string(),
            description: self.description,
            status: self.status,
            priority: self.priority,
            location: self.location.trim().to_string(),
            assigned_to_id: self.assigned_to_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            vehicle_plate: self.vehicle_plate,
            scheduled_date: self.scheduled_date,
            scheduled_start_time: self.scheduled_start_time,
            scheduled_end_time: self.scheduled_end_time,
            completed_at: self.completed_at,
        }
    }
}

/// Cuerpo de `PATCH /api/field-tasks/:id`
///
/// Campo ausente = sin cambios; `null` en un campo opcional lo borra.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateFieldTaskRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[validate(custom = "validate_not_blank")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "patch_blank_as_null")]
    pub assigned_to_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_blank_as_null")]
    #[validate(length(max = 255))]
    pub customer_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_blank_as_null")]
    #[validate(length(max = 20), custom = "validate_phone")]
    pub customer_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_blank_as_null")]
    #[validate(length(max = 20))]
    pub vehicle_plate: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_timestamp")]
    pub scheduled_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "patch_blank_as_null")]
    #[validate(custom = "validate_time_of_day")]
    pub scheduled_start_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_blank_as_null")]
    #[validate(custom = "validate_time_of_day")]
    pub scheduled_end_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_timestamp")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl UpdateFieldTaskRequest {
    pub fn into_changes(self) -> FieldTaskChanges {
        FieldTaskChanges {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description,
            status: self.status,
            priority: self.priority,
            location: self.location.map(|l| l.trim().to_string()),
            assigned_to_id: self.assigned_to_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            vehicle_plate: self.vehicle_plate,
            scheduled_date: self.scheduled_date,
            scheduled_start_time: self.scheduled_start_time,
            scheduled_end_time: self.scheduled_end_time,
            completed_at: self.completed_at,
        }
    }
}

/// Query string de `GET /api/field-tasks`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<String>,
    pub date: Option<String>,
    pub search: Option<String>,
    pub all: Option<String>,
}

impl TaskListQuery {
    /// Solo el literal `true` pide la vista completa
    pub fn wants_all(&self) -> bool {
        self.all.as_deref() == Some("true")
    }

    /// Convierte los parámetros en filtro; los valores vacíos no filtran
    pub fn into_filter(self, offset: FixedOffset) -> AppResult<TaskFilter> {
        let status = match non_empty(self.status) {
            Some(raw) => Some(raw.parse::<TaskStatus>().map_err(|e| validation_error("status", "invalid_status", e))?),
            None => None,
        };

        let scheduled_on = match non_empty(self.date) {
            Some(raw) => {
                let date = validate_date(&raw).map_err(|_| {
                    validation_error("date", "date", "Expected a date formatted as YYYY-MM-DD")
                })?;
                Some(DayWindow::for_date(date, offset))
            }
            None => None,
        };

        Ok(TaskFilter {
            status,
            scheduled_on,
            scheduled_since: None,
            search: non_empty(self.search),
        })
    }
}
