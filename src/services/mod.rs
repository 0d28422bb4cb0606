//! Services module
//!
//! Este módulo contiene la lógica de negocio que no es acceso directo a
//! datos: la política de autorización, las estadísticas por técnico y el
//! feed de actividad.

pub mod activity_service;
pub mod authorization_service;
pub mod stats_service;

pub use activity_service::ActivityService;
pub use authorization_service::{AuthorizationPolicy, Caller};
pub use stats_service::StatsService;
