//! Constructor de filtros para listados de tareas y reportes
//!
//! Cada filtro tiene dos representaciones con la misma semántica: un
//! `WHERE` parametrizado para PostgreSQL (`QueryBuilder`) y un predicado
//! en memoria (`matches`). Todos los filtros presentes se combinan con AND.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{FieldReport, FieldTask, ReportStatus, TaskStatus};

/// Día calendario como intervalo semiabierto `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Día `date` en la zona horaria de negocio `offset`
    pub fn for_date(date: NaiveDate, offset: FixedOffset) -> Self {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        // Un offset fijo nunca produce horas ambiguas
        let start = offset
            .from_local_datetime(&midnight)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| midnight.and_utc());
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    /// Día calendario que contiene `instant` en la zona `offset`
    pub fn containing(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self::for_date(instant.with_timezone(&offset).date_naive(), offset)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Filtros de listado de tareas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    /// `scheduled_date` dentro del día
    pub scheduled_on: Option<DayWindow>,
    /// `scheduled_date >= instante`
    pub scheduled_since: Option<DateTime<Utc>>,
    /// Búsqueda parcial sin distinguir mayúsculas en título, ubicación o cliente
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn with_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn matches(&self, task: &FieldTask, owner: Option<&str>) -> bool {
        if let Some(owner) = owner {
            if task.assigned_to_id.as_deref() != Some(owner) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(window) = &self.scheduled_on {
            match task.scheduled_date {
                Some(date) if window.contains(date) => {}
                _ => return false,
            }
        }
        if let Some(since) = self.scheduled_since {
            match task.scheduled_date {
                Some(date) if date >= since => {}
                _ => return false,
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = |field: Option<&str>| {
                field
                    .map(|v| v.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            };
            if !(hit(Some(&task.title)) || hit(Some(&task.location)) || hit(task.customer_name.as_deref())) {
                return false;
            }
        }
        true
    }

    /// Añade las condiciones sobre el alias `t` (field_tasks)
    pub fn push_conditions(&self, qb: &mut QueryBuilder<'_, Postgres>, owner: Option<&str>) {
        let mut clause = WhereClause::default();

        if let Some(owner) = owner {
            clause.next(qb).push("t.assigned_to_id = ").push_bind(owner.to_string());
        }
        if let Some(status) = self.status {
            clause.next(qb).push("t.status = ").push_bind(status.as_str());
        }
        if let Some(window) = self.scheduled_on {
            clause
                .next(qb)
                .push("t.scheduled_date >= ")
                .push_bind(window.start)
                .push(" AND t.scheduled_date < ")
                .push_bind(window.end);
        }
        if let Some(since) = self.scheduled_since {
            clause.next(qb).push("t.scheduled_date >= ").push_bind(since);
        }
        if let Some(search) = &self.search {
            let pattern = like_pattern(search);
            clause
                .next(qb)
                .push("(t.title ILIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\' OR t.location ILIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\' OR t.customer_name ILIKE ")
                .push_bind(pattern)
                .push(r" ESCAPE '\')");
        }
    }
}

/// Filtros de listado de reportes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub task_id: Option<Uuid>,
}

impl ReportFilter {
    pub fn matches(&self, report: &FieldReport, owner: Option<&str>) -> bool {
        if let Some(owner) = owner {
            if report.user_id != owner {
                return false;
            }
        }
        if let Some(status) = self.status {
            if report.status != status {
                return false;
            }
        }
        if let Some(task_id) = self.task_id {
            if report.task_id != Some(task_id) {
                return false;
            }
        }
        true
    }

    /// Añade las condiciones sobre el alias `r` (field_reports)
    pub fn push_conditions(&self, qb: &mut QueryBuilder<'_, Postgres>, owner: Option<&str>) {
        let mut clause = WhereClause::default();

        if let Some(owner) = owner {
            clause.next(qb).push("r.user_id = ").push_bind(owner.to_string());
        }
        if let Some(status) = self.status {
            clause.next(qb).push("r.status = ").push_bind(status.as_str());
        }
        if let Some(task_id) = self.task_id {
            clause.next(qb).push("r.task_id = ").push_bind(task_id);
        }
    }
}

/// Orden por defecto de tareas: fecha programada más reciente primero,
/// las no programadas al final. El id desempata.
pub const TASK_ORDER_BY: &str = " ORDER BY t.scheduled_date DESC NULLS LAST, t.created_at DESC, t.id DESC";

/// Orden por defecto de reportes: creación más reciente primero
pub const REPORT_ORDER_BY: &str = " ORDER BY r.created_at DESC, r.id DESC";

/// Equivalente en memoria de `TASK_ORDER_BY`
pub fn task_ordering(a: &FieldTask, b: &FieldTask) -> Ordering {
    let by_schedule = match (a.scheduled_date, b.scheduled_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_schedule
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Equivalente en memoria de `REPORT_ORDER_BY`
pub fn report_ordering(a: &FieldReport, b: &FieldReport) -> Ordering {
    b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
}

/// Emite ` WHERE ` en la primera condición y ` AND ` en las siguientes
#[derive(Default)]
struct WhereClause {
    started: bool,
}

impl WhereClause {
    fn next<'q, 'a>(&mut self, qb: &'q mut QueryBuilder<'a, Postgres>) -> &'q mut QueryBuilder<'a, Postgres> {
        qb.push(if self.started { " AND " } else { " WHERE " });
        self.started = true;
        qb
    }
}

/// Patrón `ILIKE` literal: escapa `\`, `%` y `_`
pub fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
