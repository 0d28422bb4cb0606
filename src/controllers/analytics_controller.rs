//! Controlador de estadísticas y del feed de actividad

use chrono::Utc;

use crate::models::{ActivityEvent, UserStats};
use crate::services::{ActivityService, Caller, StatsService};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct AnalyticsController<'a> {
    state: &'a AppState,
}

impl<'a> AnalyticsController<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn user_stats(&self, caller: &Caller) -> AppResult<UserStats> {
        StatsService::new(self.state.store(), self.state.config.business_utc_offset)
            .user_stats(caller.id(), Utc::now())
            .await
    }

    pub async fn recent_activities(&self, caller: &Caller) -> AppResult<Vec<ActivityEvent>> {
        self.state.policy.require_admin(caller)?;
        ActivityService::new(self.state.store()).recent_activities().await
    }
}
