//! Capa de acceso a datos
//!
//! `FieldStore` es el puerto que usan controladores y servicios. Hay dos
//! implementaciones: PostgreSQL para producción y una en memoria para tests
//! y desarrollo local (`STORE_BACKEND=memory`).

pub mod field_store;
pub mod filters;
pub mod memory_store;
pub mod postgres_store;

pub use field_store::FieldStore;
pub use filters::{DayWindow, ReportFilter, TaskFilter};
pub use memory_store::MemoryStore;
pub use postgres_store::PostgresStore;
