//! Controlador de tareas de campo

use tracing::info;
use uuid::Uuid;

use crate::dto::{CreateFieldTaskRequest, TaskListQuery, UpdateFieldTaskRequest};
use crate::models::{FieldTask, TaskWithAssignee};
use crate::services::Caller;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, validation_error, AppResult};
use crate::utils::extract::parse_validated;

const TASK: &str = "Task";

pub struct FieldTaskController<'a> {
    state: &'a AppState,
}

impl<'a> FieldTaskController<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn list(&self, caller: &Caller, query: TaskListQuery) -> AppResult<Vec<TaskWithAssignee>> {
        let owner = self.state.policy.list_scope(caller, query.wants_all());
        let filter = query.into_filter(self.state.config.business_utc_offset)?;
        self.state.store().list_tasks(owner, &filter).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<TaskWithAssignee> {
        let view = self.find(id).await?;
        self.state.policy.ensure_task_access(caller, &view.task)?;
        Ok(view)
    }

    pub async fn create(&self, caller: &Caller, request: CreateFieldTaskRequest) -> AppResult<FieldTask> {
        self.state.policy.require_admin(caller)?;
        self.check_assignee(request.assigned_to_id.as_deref()).await?;

        let task = self.state.store().create_task(request.into_new_task()).await?;
        info!("📋 Tarea {} creada por {}", task.id, caller.id());
        Ok(task)
    }

    /// El body se valida solo después de comprobar existencia y acceso
    pub async fn update(&self, caller: &Caller, id: &str, body: &[u8]) -> AppResult<FieldTask> {
        let view = self.find(id).await?;
        self.state.policy.ensure_task_access(caller, &view.task)?;
        let request: UpdateFieldTaskRequest = parse_validated(body)?;
        if let Some(Some(assignee)) = &request.assigned_to_id {
            self.check_assignee(Some(assignee.as_str())).await?;
        }

        self.state
            .store()
            .update_task(view.task.id, request.into_changes())
            .await?
            .ok_or_else(|| not_found_error(TASK))
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        self.state.policy.require_admin(caller)?;
        let id = parse_id(id)?;
        if self.state.store().delete_task(id).await? {
            info!("🗑️ Tarea {} eliminada por {}", id, caller.id());
            Ok(())
        } else {
            Err(not_found_error(TASK))
        }
    }

    async fn find(&self, id: &str) -> AppResult<TaskWithAssignee> {
        let id = parse_id(id)?;
        self.state
            .store()
            .get_task(id)
            .await?
            .ok_or_else(|| not_found_error(TASK))
    }

    async fn check_assignee(&self, assignee: Option<&str>) -> AppResult<()> {
        let Some(assignee) = assignee else {
            return Ok(());
        };
        match self.state.store().get_user(assignee).await? {
            Some(user) if self.state.policy.is_allowed_email(user.email.as_deref()) => Ok(()),
            Some(_) => Err(validation_error(
                "assigned_to_id",
                "outside_domain",
                "Assignee must belong to the corporate domain",
            )),
            None => Err(validation_error(
                "assigned_to_id",
                "unknown_user",
                "Assignee does not exist",
            )),
        }
    }
}

/// Un id que no es UUID no puede existir: se responde 404
fn parse_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| not_found_error(TASK))
}
