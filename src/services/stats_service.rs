//! Estadísticas por técnico
//!
//! Cuatro conteos independientes sobre las tareas asignadas al usuario,
//! calculados en el momento de la llamada y sin caché.

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::models::{TaskStatus, UserStats};
use crate::repositories::{DayWindow, FieldStore, TaskFilter};
use crate::utils::errors::AppResult;

/// Ventana de `weeklyTasks`: programadas desde hace 7 días
pub const WEEKLY_WINDOW_DAYS: i64 = 7;

pub struct StatsService<'a> {
    store: &'a dyn FieldStore,
    offset: FixedOffset,
}

impl<'a> StatsService<'a> {
    pub fn new(store: &'a dyn FieldStore, offset: FixedOffset) -> Self {
        Self { store, offset }
    }

    pub async fn user_stats(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<UserStats> {
        let owner = Some(user_id);

        let today = TaskFilter {
            scheduled_on: Some(DayWindow::containing(now, self.offset)),
            ..Default::default()
        };
        let weekly = TaskFilter {
            scheduled_since: Some(now - Duration::days(WEEKLY_WINDOW_DAYS)),
            ..Default::default()
        };

        Ok(UserStats {
            today_tasks: self.store.count_tasks(owner, &today).await?,
            completed_tasks: self
                .store
                .count_tasks(owner, &TaskFilter::with_status(TaskStatus::Completed))
                .await?,
            pending_tasks: self
                .store
                .count_tasks(owner, &TaskFilter::with_status(TaskStatus::Pending))
                .await?,
            weekly_tasks: self.store.count_tasks(owner, &weekly).await?,
        })
    }
}
