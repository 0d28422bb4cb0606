//! Controlador de reportes de campo

use tracing::info;
use uuid::Uuid;

use crate::dto::{CreateFieldReportRequest, ReportListQuery, UpdateFieldReportRequest};
use crate::models::{FieldReport, ReportWithRelations};
use crate::services::Caller;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, validation_error, AppResult};
use crate::utils::extract::parse_validated;

const REPORT: &str = "Report";

pub struct FieldReportController<'a> {
    state: &'a AppState,
}

impl<'a> FieldReportController<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn list(&self, caller: &Caller, query: ReportListQuery) -> AppResult<Vec<ReportWithRelations>> {
        let owner = self.state.policy.list_scope(caller, query.wants_all());
        let filter = query.into_filter()?;
        self.state.store().list_reports(owner, &filter).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<ReportWithRelations> {
        let view = self.find(id).await?;
        self.state.policy.ensure_report_access(caller, &view.report)?;
        Ok(view)
    }

    /// El autor es siempre quien llama
    pub async fn create(&self, caller: &Caller, request: CreateFieldReportRequest) -> AppResult<FieldReport> {
        self.check_task(request.task_id).await?;

        let report = self
            .state
            .store()
            .create_report(request.into_new_report(caller.id()))
            .await?;
        info!("📝 Reporte {} ({}) creado por {}", report.id, report.status.as_str(), caller.id());
        Ok(report)
    }

    pub async fn update(&self, caller: &Caller, id: &str, body: &[u8]) -> AppResult<FieldReport> {
        let view = self.find(id).await?;
        self.state.policy.ensure_report_access(caller, &view.report)?;
        let request: UpdateFieldReportRequest = parse_validated(body)?;
        if let Some(task_id) = request.task_id {
            self.check_task(task_id).await?;
        }

        self.state
            .store()
            .update_report(view.report.id, request.into_changes())
            .await?
            .ok_or_else(|| not_found_error(REPORT))
    }

    async fn find(&self, id: &str) -> AppResult<ReportWithRelations> {
        let id = Uuid::parse_str(id).map_err(|_| not_found_error(REPORT))?;
        self.state
            .store()
            .get_report(id)
            .await?
            .ok_or_else(|| not_found_error(REPORT))
    }

    async fn check_task(&self, task_id: Option<Uuid>) -> AppResult<()> {
        let Some(task_id) = task_id else {
            return Ok(());
        };
        match self.state.store().get_task(task_id).await? {
            Some(_) => Ok(()),
            None => Err(validation_error("task_id", "unknown_task", "Task does not exist")),
        }
    }
}
