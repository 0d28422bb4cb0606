use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::AuthController;
use crate::middleware::AuthSubject;
use crate::models::User;
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Configura las rutas de autenticación
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/user", get(current_user))
        .route("/login", post(login))
}

async fn current_user(State(state): State<AppState>, subject: AuthSubject) -> AppResult<Json<User>> {
    let user = AuthController::new(&state).current_user(&subject).await?;
    Ok(Json(user))
}

async fn login(State(state): State<AppState>, subject: AuthSubject) -> AppResult<Json<User>> {
    let user = AuthController::new(&state).login(&subject).await?;
    Ok(Json(user))
}
