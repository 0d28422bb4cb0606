//! Feed de actividad reciente del panel admin
//!
//! Mezcla las últimas tareas completadas con los últimos reportes creados y
//! se queda con los `FEED_SIZE` eventos más recientes.

use crate::models::ActivityEvent;
use crate::repositories::FieldStore;
use crate::utils::errors::AppResult;

pub const FEED_SIZE: usize = 10;

pub struct ActivityService<'a> {
    store: &'a dyn FieldStore,
}

impl<'a> ActivityService<'a> {
    pub fn new(store: &'a dyn FieldStore) -> Self {
        Self { store }
    }

    pub async fn recent_activities(&self) -> AppResult<Vec<ActivityEvent>> {
        let tasks = self.store.recent_completed_tasks(FEED_SIZE as i64).await?;
        let reports = self.store.recent_reports(FEED_SIZE as i64).await?;
        Ok(merge_recent(tasks, reports, FEED_SIZE))
    }
}

/// Une ambas listas, ordena por timestamp descendente y trunca a `limit`
pub fn merge_recent(tasks: Vec<ActivityEvent>, reports: Vec<ActivityEvent>, limit: usize) -> Vec<ActivityEvent> {
    let mut events: Vec<ActivityEvent> = tasks.into_iter().chain(reports).collect();
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
    events.truncate(limit);
    events
}
