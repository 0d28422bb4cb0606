//! Modelo de FieldReport
//!
//! Reporte de trabajo en campo enviado por un técnico, opcionalmente
//! vinculado a una tarea.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{field_task::FieldTask, user::User};

/// Estado de un reporte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Draft,
    Submitted,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::Submitted => "submitted",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ReportStatus::Draft),
            "submitted" => Ok(ReportStatus::Submitted),
            other => Err(format!("unknown report status `{}`", other)),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FieldReport - mapea a la tabla `field_reports`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    pub id: Uuid,
    pub task_id: Option<Uuid>,
    pub user_id: String,
    pub location: String,
    pub vehicle_plate: String,
    pub operation_type: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub details: Option<String>,
    pub photos: Vec<String>,
    pub report_date: DateTime<Utc>,
    pub report_time: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reporte con su tarea de origen y su autor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportWithRelations {
    #[serde(flatten)]
    pub report: FieldReport,
    pub task: Option<FieldTask>,
    pub user: User,
}

/// Datos para crear un reporte; `user_id` lo pone el servidor
#[derive(Debug, Clone, PartialEq)]
pub struct NewFieldReport {
    pub task_id: Option<Uuid>,
    pub user_id: String,
    pub location: String,
    pub vehicle_plate: String,
    pub operation_type: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub details: Option<String>,
    pub photos: Vec<String>,
    pub report_date: DateTime<Utc>,
    pub report_time: String,
    pub status: ReportStatus,
}

impl NewFieldReport {
    pub fn into_report(self, id: Uuid, now: DateTime<Utc>) -> FieldReport {
        FieldReport {
            id,
            task_id: self.task_id,
            user_id: self.user_id,
            location: self.location,
            vehicle_plate: self.vehicle_plate,
            operation_type: self.operation_type,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            details: self.details,
            photos: self.photos,
            report_date: self.report_date,
            report_time: self.report_time,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Actualización parcial de un reporte. El autor no es editable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldReportChanges {
    pub task_id: Option<Option<Uuid>>,
    pub location: Option<String>,
    pub vehicle_plate: Option<String>,
    pub operation_type: Option<String>,
    pub customer_name: Option<Option<String>>,
    pub customer_phone: Option<Option<String>>,
    pub details: Option<Option<String>>,
    pub photos: Option<Vec<String>>,
    pub report_date: Option<DateTime<Utc>>,
    pub report_time: Option<String>,
    pub status: Option<ReportStatus>,
}

impl FieldReportChanges {
    /// Aplica los cambios presentes y refresca `updated_at`
    pub fn apply_to(&self, report: &mut FieldReport, now: DateTime<Utc>) {
        if let Some(v) = self.task_id {
            report.task_id = v;
        }
        if let Some(v) = &self.location {
            report.location = v.clone();
        }
        if let Some(v) = &self.vehicle_plate {
            report.vehicle_plate = v.clone();
        }
        if let Some(v) = &self.operation_type {
            report.operation_type = v.clone();
        }
        if let Some(v) = &self.customer_name {
            report.customer_name = v.clone();
        }
        if let Some(v) = &self.customer_phone {
            report.customer_phone = v.clone();
        }
        if let Some(v) = &self.details {
            report.details = v.clone();
        }
        if let Some(v) = &self.photos {
            report.photos = v.clone();
        }
        if let Some(v) = self.report_date {
            report.report_date = v;
        }
        if let Some(v) = &self.report_time {
            report.report_time = v.clone();
        }
        if let Some(v) = self.status {
            report.status = v;
        }
        report.updated_at = now;
    }
}
