//! Extractores de Axum
//!
//! `ValidatedJson<T>` deserializa el body y ejecuta `validator::Validate`
//! antes de llegar al handler. Cualquier fallo se convierte en `AppError`
//! (400) y nunca se aplica nada parcialmente.
//!
//! Los PATCH reciben el body crudo y lo pasan por `parse_validated` una vez
//! cargado el recurso y comprobado el acceso.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidBody {
                field: None,
                message: rejection.body_text(),
            })?;
        parse_validated(&body).map(ValidatedJson)
    }
}

/// Deserializa un body JSON y lo valida
///
/// Los errores de serde conservan el campo que falló (`priority`,
/// `photos[2]`...).
pub fn parse_validated<T>(body: &[u8]) -> AppResult<T>
where
    T: DeserializeOwned + Validate,
{
    let mut de = serde_json::Deserializer::from_slice(body);
    let value: T = serde_path_to_error::deserialize(&mut de).map_err(|e| AppError::InvalidBody {
        field: body_field(&e),
        message: e.inner().to_string(),
    })?;
    de.end().map_err(|e| AppError::InvalidBody {
        field: None,
        message: e.to_string(),
    })?;
    value.validate()?;
    Ok(value)
}

fn body_field(error: &serde_path_to_error::Error<serde_json::Error>) -> Option<String> {
    let path = error.path().to_string();
    if path != "." {
        return Some(path);
    }
    // "missing field `title`" / "unknown field `foo`, expected one of ..."
    let message = error.inner().to_string();
    let start = message.find('`')? + 1;
    let len = message[start..].find('`')?;
    Some(message[start..start + len].to_string())
}
