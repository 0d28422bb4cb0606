//! Shell de la SPA
//!
//! Sirve el build del frontend desde `STATIC_DIR`. Las rutas desconocidas
//! devuelven `index.html` para que el router del cliente las resuelva;
//! `offline.html` se sirve tal cual para el service worker.

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

pub fn create_static_router(dir: &Path) -> Router {
    let index = ServeFile::new(dir.join("index.html"));
    Router::new().fallback_service(ServeDir::new(dir).fallback(index))
}
