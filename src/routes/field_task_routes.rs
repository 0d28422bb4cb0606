use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::FieldTaskController;
use crate::dto::{CreateFieldTaskRequest, TaskListQuery};
use crate::middleware::{AdminCaller, CurrentCaller};
use crate::models::{FieldTask, TaskWithAssignee};
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::extract::ValidatedJson;

pub fn create_field_task_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/:id", get(get_task).patch(update_task).delete(delete_task))
}

async fn list_tasks(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Query(query): Query<TaskListQuery>,
) -> AppResult<Json<Vec<TaskWithAssignee>>> {
    let tasks = FieldTaskController::new(&state).list(&caller, query).await?;
    Ok(Json(tasks))
}

async fn get_task(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> AppResult<Json<TaskWithAssignee>> {
    let task = FieldTaskController::new(&state).get(&caller, &id).await?;
    Ok(Json(task))
}

async fn create_task(
    State(state): State<AppState>,
    AdminCaller(caller): AdminCaller,
    ValidatedJson(request): ValidatedJson<CreateFieldTaskRequest>,
) -> AppResult<(StatusCode, Json<FieldTask>)> {
    let task = FieldTaskController::new(&state).create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<FieldTask>> {
    let task = FieldTaskController::new(&state).update(&caller, &id, &body).await?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    AdminCaller(caller): AdminCaller,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    FieldTaskController::new(&state).delete(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
