use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::AnalyticsController;
use crate::middleware::CurrentCaller;
use crate::models::UserStats;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_analytics_router() -> Router<AppState> {
    Router::new().route("/user-stats", get(user_stats))
}

async fn user_stats(State(state): State<AppState>, CurrentCaller(caller): CurrentCaller) -> AppResult<Json<UserStats>> {
    let stats = AnalyticsController::new(&state).user_stats(&caller).await?;
    Ok(Json(stats))
}
