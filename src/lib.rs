//! Field Service API
//!
//! Backend de gestión de trabajo de campo: tareas programadas para
//! técnicos, reportes de campo y panel de administración.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
