use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};

use crate::controllers::{AdminController, AnalyticsController};
use crate::middleware::AdminCaller;
use crate::models::{ActivityEvent, User};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", patch(update_user))
        .route("/recent-activities", get(recent_activities))
}

async fn list_users(State(state): State<AppState>, AdminCaller(caller): AdminCaller) -> AppResult<Json<Vec<User>>> {
    let users = AdminController::new(&state).list_users(&caller).await?;
    Ok(Json(users))
}

async fn update_user(
    State(state): State<AppState>,
    AdminCaller(caller): AdminCaller,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<User>> {
    let user = AdminController::new(&state).update_user(&caller, &id, &body).await?;
    Ok(Json(user))
}

async fn recent_activities(
    State(state): State<AppState>,
    AdminCaller(caller): AdminCaller,
) -> AppResult<Json<Vec<ActivityEvent>>> {
    let events = AnalyticsController::new(&state).recent_activities(&caller).await?;
    Ok(Json(events))
}
