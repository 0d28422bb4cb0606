//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean al schema
//! PostgreSQL (`migrations/`) y las vistas con relaciones.

pub mod analytics;
pub mod field_report;
pub mod field_task;
pub mod user;

pub use analytics::{ActivityEvent, ActivityKind, UserStats};
pub use field_report::{FieldReport, FieldReportChanges, NewFieldReport, ReportStatus, ReportWithRelations};
pub use field_task::{FieldTask, FieldTaskChanges, NewFieldTask, TaskPriority, TaskStatus, TaskWithAssignee};
pub use user::{UpsertUser, User, UserChanges, UserRole};
