use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::FieldReportController;
use crate::dto::{CreateFieldReportRequest, ReportListQuery};
use crate::middleware::CurrentCaller;
use crate::models::{FieldReport, ReportWithRelations};
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::extract::ValidatedJson;

pub fn create_field_report_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports).post(create_report))
        .route("/:id", get(get_report).patch(update_report))
}

async fn list_reports(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Query(query): Query<ReportListQuery>,
) -> AppResult<Json<Vec<ReportWithRelations>>> {
    let reports = FieldReportController::new(&state).list(&caller, query).await?;
    Ok(Json(reports))
}

async fn get_report(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
) -> AppResult<Json<ReportWithRelations>> {
    let report = FieldReportController::new(&state).get(&caller, &id).await?;
    Ok(Json(report))
}

async fn create_report(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    ValidatedJson(request): ValidatedJson<CreateFieldReportRequest>,
) -> AppResult<(StatusCode, Json<FieldReport>)> {
    let report = FieldReportController::new(&state).create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

async fn update_report(
    State(state): State<AppState>,
    CurrentCaller(caller): CurrentCaller,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<FieldReport>> {
    let report = FieldReportController::new(&state).update(&caller, &id, &body).await?;
    Ok(Json(report))
}
