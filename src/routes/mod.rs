//! Rutas HTTP
//!
//! Todo lo que cuelga de `/api` responde JSON; el resto es la SPA cuando
//! hay `STATIC_DIR` configurado.

pub mod admin_routes;
pub mod analytics_routes;
pub mod auth_routes;
pub mod field_report_routes;
pub mod field_task_routes;
pub mod static_routes;

use axum::{routing::get, Json, Router};
use serde_json::json;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors_layer;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let static_dir = state.config.static_dir.clone();

    let mut app = Router::new()
        .nest("/api", create_api_router())
        .with_state(state);

    if let Some(dir) = static_dir {
        app = app.merge(static_routes::create_static_router(&dir));
    }

    app.layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes::create_auth_router())
        .nest("/field-tasks", field_task_routes::create_field_task_router())
        .nest("/field-reports", field_report_routes::create_field_report_router())
        .nest("/analytics", analytics_routes::create_analytics_router())
        .nest("/admin", admin_routes::create_admin_router())
        .fallback(api_not_found)
}

/// Endpoint de liveness
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn api_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
