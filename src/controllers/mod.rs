//! Controladores
//!
//! Orquestan autorización, validaciones que dependen del almacén y la
//! llamada al almacén o a los servicios. Las rutas solo extraen y serializan.

pub mod admin_controller;
pub mod analytics_controller;
pub mod auth_controller;
pub mod field_report_controller;
pub mod field_task_controller;

pub use admin_controller::AdminController;
pub use analytics_controller::AnalyticsController;
pub use auth_controller::AuthController;
pub use field_report_controller::FieldReportController;
pub use field_task_controller::FieldTaskController;
