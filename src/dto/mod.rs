//! DTOs de la API HTTP
//!
//! Cuerpos de entrada validados (`serde` + `validator`) y parámetros de
//! query de los listados.

pub mod admin_dto;
pub mod field_report_dto;
pub mod field_task_dto;

pub use admin_dto::UpdateUserRequest;
pub use field_report_dto::{CreateFieldReportRequest, ReportListQuery, UpdateFieldReportRequest};
pub use field_task_dto::{CreateFieldTaskRequest, TaskListQuery, UpdateFieldTaskRequest};
