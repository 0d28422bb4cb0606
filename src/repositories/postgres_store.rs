//! Almacén PostgreSQL
//!
//! Implementación de `FieldStore` sobre `PgPool`. Las vistas con relaciones
//! se leen con columnas prefijadas (`t_`, `u_`, `tk_`) y se mapean a mano
//! para que una relación ausente (LEFT JOIN sin fila) quede como `None`.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::models::{
    ActivityEvent, ActivityKind, FieldReport, FieldReportChanges, FieldTask, FieldTaskChanges,
    NewFieldReport, NewFieldTask, ReportWithRelations, TaskStatus, TaskWithAssignee, UpsertUser,
    User, UserChanges, UserRole,
};
use crate::repositories::field_store::FieldStore;
use crate::repositories::filters::{ReportFilter, TaskFilter, REPORT_ORDER_BY, TASK_ORDER_BY};
use crate::utils::errors::AppError;

const USER_COLUMNS: &[&str] = &[
    "id", "email", "first_name", "last_name", "profile_image_url", "role", "created_at", "updated_at",
];

const TASK_COLUMNS: &[&str] = &[
    "id", "title", "description", "status", "priority", "location", "assigned_to_id",
    "customer_name", "customer_phone", "vehicle_plate", "scheduled_date", "scheduled_start_time",
    "scheduled_end_time", "completed_at", "created_at", "updated_at",
];

const REPORT_COLUMNS: &[&str] = &[
    "id", "task_id", "user_id", "location", "vehicle_plate", "operation_type", "customer_name",
    "customer_phone", "details", "photos", "report_date", "report_time", "status", "created_at",
    "updated_at",
];

/// `t.id AS t_id, t.title AS t_title, ...`
fn aliased(table: &str, prefix: &str, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("{table}.{c} AS {prefix}{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn col(prefix: &str, name: &str) -> String {
    format!("{prefix}{name}")
}

fn decode_enum<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.try_get(column)?;
    raw.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: e.into(),
    })
}

fn user_from_row(row: &PgRow, prefix: &str) -> Result<Option<User>, sqlx::Error> {
    let id: Option<String> = row.try_get(col(prefix, "id").as_str())?;
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(Some(User {
        id,
        email: row.try_get(col(prefix, "email").as_str())?,
        first_name: row.try_get(col(prefix, "first_name").as_str())?,
        last_name: row.try_get(col(prefix, "last_name").as_str())?,
        profile_image_url: row.try_get(col(prefix, "profile_image_url").as_str())?,
        role: decode_enum::<UserRole>(row, &col(prefix, "role"))?,
        created_at: row.try_get(col(prefix, "created_at").as_str())?,
        updated_at: row.try_get(col(prefix, "updated_at").as_str())?,
    }))
}

fn task_from_row(row: &PgRow, prefix: &str) -> Result<Option<FieldTask>, sqlx::Error> {
    let id: Option<Uuid> = row.try_get(col(prefix, "id").as_str())?;
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(Some(FieldTask {
        id,
        title: row.try_get(col(prefix, "title").as_str())?,
        description: row.try_get(col(prefix, "description").as_str())?,
        status: decode_enum(row, &col(prefix, "status"))?,
        priority: decode_enum(row, &col(prefix, "priority"))?,
        location: row.try_get(col(prefix, "location").as_str())?,
        assigned_to_id: row.try_get(col(prefix, "assigned_to_id").as_str())?,
        customer_name: row.try_get(col(prefix, "customer_name").as_str())?,
        customer_phone: row.try_get(col(prefix, "customer_phone").as_str())?,
        vehicle_plate: row.try_get(col(prefix, "vehicle_plate").as_str())?,
        scheduled_date: row.try_get(col(prefix, "scheduled_date").as_str())?,
        scheduled_start_time: row.try_get(col(prefix, "scheduled_start_time").as_str())?,
        scheduled_end_time: row.try_get(col(prefix, "scheduled_end_time").as_str())?,
        completed_at: row.try_get(col(prefix, "completed_at").as_str())?,
        created_at: row.try_get(col(prefix, "created_at").as_str())?,
        updated_at: row.try_get(col(prefix, "updated_at").as_str())?,
    }))
}

fn report_from_row(row: &PgRow, prefix: &str) -> Result<FieldReport, sqlx::Error> {
    Ok(FieldReport {
        id: row.try_get(col(prefix, "id").as_str())?,
        task_id: row.try_get(col(prefix, "task_id").as_str())?,
        user_id: row.try_get(col(prefix, "user_id").as_str())?,
        location: row.try_get(col(prefix, "location").as_str())?,
        vehicle_plate: row.try_get(col(prefix, "vehicle_plate").as_str())?,
        operation_type: row.try_get(col(prefix, "operation_type").as_str())?,
        customer_name: row.try_get(col(prefix, "customer_name").as_str())?,
        customer_phone: row.try_get(col(prefix, "customer_phone").as_str())?,
        details: row.try_get(col(prefix, "details").as_str())?,
        photos: row.try_get(col(prefix, "photos").as_str())?,
        report_date: row.try_get(col(prefix, "report_date").as_str())?,
        report_time: row.try_get(col(prefix, "report_time").as_str())?,
        status: decode_enum(row, &col(prefix, "status"))?,
        created_at: row.try_get(col(prefix, "created_at").as_str())?,
        updated_at: row.try_get(col(prefix, "updated_at").as_str())?,
    })
}

fn required<T>(value: Option<T>, what: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Internal(format!("row without {}", what)))
}

fn task_view_from_row(row: &PgRow) -> Result<TaskWithAssignee, AppError> {
    Ok(TaskWithAssignee {
        task: required(task_from_row(row, "t_")?, "task id")?,
        assigned_to: user_from_row(row, "u_")?,
    })
}

fn report_view_from_row(row: &PgRow) -> Result<ReportWithRelations, AppError> {
    Ok(ReportWithRelations {
        report: report_from_row(row, "r_")?,
        task: task_from_row(row, "tk_")?,
        user: required(user_from_row(row, "u_")?, "report author")?,
    })
}

fn task_view_select() -> String {
    format!(
        "SELECT {}, {} FROM field_tasks t LEFT JOIN users u ON u.id = t.assigned_to_id",
        aliased("t", "t_", TASK_COLUMNS),
        aliased("u", "u_", USER_COLUMNS),
    )
}

fn report_view_select() -> String {
    format!(
        "SELECT {}, {}, {} FROM field_reports r \
         LEFT JOIN field_tasks tk ON tk.id = r.task_id \
         JOIN users u ON u.id = r.user_id",
        aliased("r", "r_", REPORT_COLUMNS),
        aliased("tk", "tk_", TASK_COLUMNS),
        aliased("u", "u_", USER_COLUMNS),
    )
}

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FieldStore for PostgresStore {
    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(user_from_row(&row, "")?),
            None => Ok(None),
        }
    }

    async fn upsert_user(&self, user: UpsertUser) -> Result<User, AppError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, email, first_name, last_name, profile_image_url, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                profile_image_url = EXCLUDED.profile_image_url,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.profile_image_url)
        .bind(UserRole::default().as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        required(user_from_row(&row, "")?, "user id")
    }

    async fn update_user(&self, id: &str, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        let mut set = qb.separated(", ");
        if let Some(role) = changes.role {
            set.push("role = ").push_bind_unseparated(role.as_str());
        }
        if let Some(first_name) = changes.first_name {
            set.push("first_name = ").push_bind_unseparated(first_name);
        }
        if let Some(last_name) = changes.last_name {
            set.push("last_name = ").push_bind_unseparated(last_name);
        }
        set.push("updated_at = ").push_bind_unseparated(Utc::now());
        qb.push(" WHERE id = ").push_bind(id.to_string()).push(" RETURNING *");

        let row = qb.build().fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(user_from_row(&row, "")?),
            None => Ok(None),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY first_name, last_name, id")
            .fetch_all(&self.pool)
            .await?;
        let mut users = Vec::with_capacity(rows.len());
        for row in &rows {
            users.push(required(user_from_row(row, "")?, "user id")?);
        }
        Ok(users)
    }

    async fn list_tasks(&self, owner: Option<&str>, filter: &TaskFilter) -> Result<Vec<TaskWithAssignee>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(task_view_select());
        filter.push_conditions(&mut qb, owner);
        qb.push(TASK_ORDER_BY);

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(task_view_from_row).collect()
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<TaskWithAssignee>, AppError> {
        let sql = format!("{} WHERE t.id = $1", task_view_select());
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(task_view_from_row).transpose()
    }

    async fn create_task(&self, task: NewFieldTask) -> Result<FieldTask, AppError> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO field_tasks (
                id, title, description, status, priority, location, assigned_to_id,
                customer_name, customer_phone, vehicle_plate, scheduled_date,
                scheduled_start_time, scheduled_end_time, completed_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(task.title)
        .bind(task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.location)
        .bind(task.assigned_to_id)
        .bind(task.customer_name)
        .bind(task.customer_phone)
        .bind(task.vehicle_plate)
        .bind(task.scheduled_date)
        .bind(task.scheduled_start_time)
        .bind(task.scheduled_end_time)
        .bind(task.completed_at)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        required(task_from_row(&row, "")?, "task id")
    }

    async fn update_task(&self, id: Uuid, changes: FieldTaskChanges) -> Result<Option<FieldTask>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE field_tasks SET ");
        let mut set = qb.separated(", ");
        if let Some(v) = changes.title {
            set.push("title = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.description {
            set.push("description = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.status {
            set.push("status = ").push_bind_unseparated(v.as_str());
        }
        if let Some(v) = changes.priority {
            set.push("priority = ").push_bind_unseparated(v.as_str());
        }
        if let Some(v) = changes.location {
            set.push("location = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.assigned_to_id {
            set.push("assigned_to_id = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.customer_name {
            set.push("customer_name = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.customer_phone {
            set.push("customer_phone = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.vehicle_plate {
            set.push("vehicle_plate = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.scheduled_date {
            set.push("scheduled_date = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.scheduled_start_time {
            set.push("scheduled_start_time = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.scheduled_end_time {
            set.push("scheduled_end_time = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.completed_at {
            set.push("completed_at = ").push_bind_unseparated(v);
        }
        set.push("updated_at = ").push_bind_unseparated(Utc::now());
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let row = qb.build().fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(task_from_row(&row, "")?),
            None => Ok(None),
        }
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError> {
        // field_reports.task_id tiene ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM field_tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_tasks(&self, owner: Option<&str>, filter: &TaskFilter) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM field_tasks t");
        filter.push_conditions(&mut qb, owner);
        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn list_reports(&self, owner: Option<&str>, filter: &ReportFilter) -> Result<Vec<ReportWithRelations>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(report_view_select());
        filter.push_conditions(&mut qb, owner);
        qb.push(REPORT_ORDER_BY);

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(report_view_from_row).collect()
    }

    async fn get_report(&self, id: Uuid) -> Result<Option<ReportWithRelations>, AppError> {
        let sql = format!("{} WHERE r.id = $1", report_view_select());
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(report_view_from_row).transpose()
    }

    async fn create_report(&self, report: NewFieldReport) -> Result<FieldReport, AppError> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO field_reports (
                id, task_id, user_id, location, vehicle_plate, operation_type, customer_name,
                customer_phone, details, photos, report_date, report_time, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(report.task_id)
        .bind(report.user_id)
        .bind(report.location)
        .bind(report.vehicle_plate)
        .bind(report.operation_type)
        .bind(report.customer_name)
        .bind(report.customer_phone)
        .bind(report.details)
        .bind(report.photos)
        .bind(report.report_date)
        .bind(report.report_time)
        .bind(report.status.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(report_from_row(&row, "")?)
    }

    async fn update_report(&self, id: Uuid, changes: FieldReportChanges) -> Result<Option<FieldReport>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE field_reports SET ");
        let mut set = qb.separated(", ");
        if let Some(v) = changes.task_id {
            set.push("task_id = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.location {
            set.push("location = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.vehicle_plate {
            set.push("vehicle_plate = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.operation_type {
            set.push("operation_type = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.customer_name {
            set.push("customer_name = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.customer_phone {
            set.push("customer_phone = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.details {
            set.push("details = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.photos {
            set.push("photos = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.report_date {
            set.push("report_date = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.report_time {
            set.push("report_time = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.status {
            set.push("status = ").push_bind_unseparated(v.as_str());
        }
        set.push("updated_at = ").push_bind_unseparated(Utc::now());
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let row = qb.build().fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(Some(report_from_row(&row, "")?)),
            None => Ok(None),
        }
    }

    async fn recent_completed_tasks(&self, limit: i64) -> Result<Vec<ActivityEvent>, AppError> {
        let sql = format!(
            "SELECT t.id, t.status, t.location, t.updated_at, {} \
             FROM field_tasks t LEFT JOIN users u ON u.id = t.assigned_to_id \
             WHERE t.status = $1 ORDER BY t.updated_at DESC, t.id DESC LIMIT $2",
            aliased("u", "u_", USER_COLUMNS),
        );
        let rows = sqlx::query(&sql)
            .bind(TaskStatus::Completed.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut events = Vec::with_capacity(rows.len());
        for row in &rows {
            events.push(ActivityEvent {
                id: row.try_get("id")?,
                kind: ActivityKind::Task,
                action: row.try_get("status")?,
                location: row.try_get("location")?,
                timestamp: row.try_get("updated_at")?,
                user: user_from_row(row, "u_")?,
            });
        }
        Ok(events)
    }

    async fn recent_reports(&self, limit: i64) -> Result<Vec<ActivityEvent>, AppError> {
        let sql = format!(
            "SELECT r.id, r.status, r.location, r.created_at, {} \
             FROM field_reports r LEFT JOIN users u ON u.id = r.user_id \
             ORDER BY r.created_at DESC, r.id DESC LIMIT $1",
            aliased("u", "u_", USER_COLUMNS),
        );
        let rows = sqlx::query(&sql).bind(limit).fetch_all(&self.pool).await?;

        let mut events = Vec::with_capacity(rows.len());
        for row in &rows {
            events.push(ActivityEvent {
                id: row.try_get("id")?,
                kind: ActivityKind::Report,
                action: row.try_get("status")?,
                location: row.try_get("location")?,
                timestamp: row.try_get("created_at")?,
                user: user_from_row(row, "u_")?,
            });
        }
        Ok(events)
    }
}
