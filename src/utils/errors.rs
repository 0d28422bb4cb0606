//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP `{ message, errors? }`.

use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid request body: {message}")]
    InvalidBody { field: Option<String>, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Detalle de error por campo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: Option<String>,
    pub code: String,
    pub message: String,
}

/// Respuesta de error para la API
#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    fn plain(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            AppError::AccessDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::AuthenticationRequired => ErrorResponse::plain("Unauthorized"),

            AppError::AccessDenied(msg) => {
                warn!("Access denied: {}", msg);
                ErrorResponse::plain(msg)
            }

            AppError::NotFound(msg) => ErrorResponse::plain(msg),

            AppError::Validation(e) => ErrorResponse {
                message: "Validation error".to_string(),
                errors: Some(field_errors(&e)),
            },

            AppError::InvalidBody { field, message } => ErrorResponse {
                message: "Validation error".to_string(),
                errors: Some(vec![FieldError {
                    field,
                    code: "invalid_body".to_string(),
                    message,
                }]),
            },

            AppError::Database(e) => {
                error!("Database error: {}", e);
                ErrorResponse::plain("An unexpected error occurred")
            }

            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ErrorResponse::plain("An unexpected error occurred")
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Aplana `ValidationErrors` en una lista ordenada con nombres de campo en camelCase
pub fn field_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldError {
                field: Some(to_camel_case(field)),
                code: err.code.to_string(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", err.code)),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    out
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación de un solo campo
pub fn validation_error(field: &'static str, code: &'static str, message: impl Into<Cow<'static, str>>) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new(code);
    error.message = Some(message.into());

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str) -> AppError {
    AppError::NotFound(format!("{} not found", resource))
}

/// Función helper para crear errores de acceso prohibido
pub fn access_denied(message: &str) -> AppError {
    AppError::AccessDenied(message.to_string())
}
