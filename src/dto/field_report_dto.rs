//! DTOs de reportes de campo

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::{FieldReportChanges, NewFieldReport, ReportStatus};
use crate::repositories::ReportFilter;
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::serde_helpers::{blank_as_none, double_option, optional_timestamp, patch_blank_as_null, timestamp};
use crate::utils::validation::{
    non_empty, validate_not_blank, validate_phone, validate_photos, validate_time_of_day, validate_uuid,
};

/// Cuerpo de `POST /api/field-reports`
///
/// `userId` se acepta por compatibilidad con clientes que lo envían, pero
/// el autor siempre es quien hace la llamada.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateFieldReportRequest {
    #[serde(default)]
    pub task_id: Option<Uuid>,
    #[serde(default, rename = "userId")]
    _user_id: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub location: String,
    #[validate(length(min = 1, max = 20), custom = "validate_not_blank")]
    pub vehicle_plate: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub operation_type: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 255))]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 20), custom = "validate_phone")]
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub details: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_photos")]
    pub photos: Vec<String>,
    #[serde(deserialize_with = "timestamp")]
    pub report_date: DateTime<Utc>,
    #[validate(custom = "validate_time_of_day")]
    pub report_time: String,
    #[serde(default)]
    pub status: ReportStatus,
}

impl CreateFieldReportRequest {
    pub fn into_new_report(self, author_id: &str) -> NewFieldReport {
        NewFieldReport {
            task_id: self.task_id,
            user_id: author_id.to_string(),
            location: self.location.trim().to_string(),
            vehicle_plate: self.vehicle_plate.trim().to_string(),
            operation_type: self.operation_type.trim().to_string(),
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            details: self.details,
            photos: self.photos,
            report_date: self.report_date,
            report_time: self.report_time,
            status: self.status,
        }
    }
}

/// Cuerpo de `PATCH /api/field-reports/:id`. El autor no es editable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateFieldReportRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub task_id: Option<Option<Uuid>>,
    #[validate(custom = "validate_not_blank")]
    pub location: Option<String>,
    #[validate(length(min = 1, max = 20), custom = "validate_not_blank")]
    pub vehicle_plate: Option<String>,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub operation_type: Option<String>,
    #[serde(default, deserialize_with = "patch_blank_as_null")]
    #[validate(length(max = 255))]
    pub customer_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_blank_as_null")]
    #[validate(length(max = 20), custom = "validate_phone")]
    pub customer_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub details: Option<Option<String>>,
    #[validate(custom = "validate_photos")]
    pub photos: Option<Vec<String>>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub report_date: Option<DateTime<Utc>>,
    #[validate(custom = "validate_time_of_day")]
    pub report_time: Option<String>,
    pub status: Option<ReportStatus>,
}

impl UpdateFieldReportRequest {
    pub fn into_changes(self) -> FieldReportChanges {
        FieldReportChanges {
            task_id: self.task_id,
            location: self.location.map(|v| v.trim().to_string()),
            vehicle_plate: self.vehicle_plate.map(|v| v.trim().to_string()),
            operation_type: self.operation_type.map(|v| v.trim().to_string()),
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            details: self.details,
            photos: self.photos,
            report_date: self.report_date,
            report_time: self.report_time,
            status: self.status,
        }
    }
}

/// Query string de `GET /api/field-reports`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListQuery {
    pub status: Option<String>,
    pub task_id: Option<String>,
    pub all: Option<String>,
}

impl ReportListQuery {
    pub fn wants_all(&self) -> bool {
        self.all.as_deref() == Some("true")
    }

    pub fn into_filter(self) -> AppResult<ReportFilter> {
        let status = match non_empty(self.status) {
            Some(raw) => Some(
                raw.parse::<ReportStatus>()
                    .map_err(|e| validation_error("status", "invalid_status", e))?,
            ),
            None => None,
        };
        let task_id = match non_empty(self.task_id) {
            Some(raw) => Some(
                validate_uuid(&raw).map_err(|_| validation_error("task_id", "uuid", "taskId must be a UUID"))?,
            ),
            None => None,
        };
        Ok(ReportFilter { status, task_id })
    }
}
