//! Autenticación JWT
//!
//! El proveedor de identidad es externo: el gateway firma un JWT HS256 con
//! el secreto compartido y el cliente lo envía como `Authorization: Bearer`.
//! Los extractores de este módulo entregan la identidad a cada handler.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::UpsertUser;
use crate::services::Caller;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

/// Claims del JWT emitido por el proveedor de identidad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn new(sub: impl Into<String>, email: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            email,
            first_name: None,
            last_name: None,
            profile_image_url: None,
            exp: (now + ttl).timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
        }
    }

    /// Datos de identidad para el upsert de login
    pub fn to_upsert(&self) -> UpsertUser {
        UpsertUser {
            id: self.sub.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            profile_image_url: self.profile_image_url.clone(),
        }
    }
}

/// Firmar un token (lo usan el gateway de desarrollo y los tests)
pub fn generate_token(claims: &Claims, secret: &str) -> AppResult<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Error generando JWT: {}", e)))
}

/// Verificar firma y expiración
pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            debug!("JWT rechazado: {}", e);
            AppError::AuthenticationRequired
        })
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Sujeto autenticado (token válido); todavía sin autorizar
#[derive(Debug, Clone)]
pub struct AuthSubject {
    pub claims: Claims,
}

impl AuthSubject {
    pub fn id(&self) -> &str {
        &self.claims.sub
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSubject {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::AuthenticationRequired)?;
        let claims = verify_token(token, &state.config.jwt_secret)?;
        Ok(AuthSubject { claims })
    }
}

/// Usuario autenticado y autorizado: existe y pertenece al dominio corporativo
#[derive(Debug, Clone)]
pub struct CurrentCaller(pub Caller);

#[async_trait]
impl FromRequestParts<AppState> for CurrentCaller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let subject = AuthSubject::from_request_parts(parts, state).await?;
        let caller = state.policy.authorize(state.store(), subject.id()).await?;
        Ok(CurrentCaller(caller))
    }
}

/// Usuario autorizado con rol admin
///
/// Se resuelve antes que el body: un técnico recibe 403 sin que se llegue a
/// validar lo que envía.
#[derive(Debug, Clone)]
pub struct AdminCaller(pub Caller);

#[async_trait]
impl FromRequestParts<AppState> for AdminCaller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentCaller(caller) = CurrentCaller::from_request_parts(parts, state).await?;
        state.policy.require_admin(&caller)?;
        Ok(AdminCaller(caller))
    }
}
