//! Utilidades compartidas por los tests de integración
//!
//! Levantan el router completo sobre `MemoryStore` y lo ejercitan con
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::Router;
use chrono::Duration;
use http::{header, Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use field_service::config::EnvironmentConfig;
use field_service::middleware::auth::{generate_token, Claims};
use field_service::models::{UpsertUser, User, UserChanges, UserRole};
use field_service::repositories::{FieldStore, MemoryStore};
use field_service::{create_router, AppState};

pub const SECRET: &str = "integration-secret";

pub struct TestResponse {
    status: StatusCode,
    body: Value,
}

impl TestResponse {
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn json(&self) -> Value {
        self.body.clone()
    }
}

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

pub async fn create_test_app() -> TestApp {
    let config = EnvironmentConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some(SECRET.to_string()),
        "STORE_BACKEND" => Some("memory".to_string()),
        _ => None,
    })
    .expect("test config");
    let store: Arc<dyn FieldStore> = Arc::new(MemoryStore::new());
    let state = AppState::new(config, store);
    TestApp {
        router: create_router(state.clone()),
        state,
    }
}

/// Token firmado para `sub` con el email dado
pub fn token_for(sub: &str, email: &str) -> String {
    let mut claims = Claims::new(sub, Some(email.to_string()), Duration::hours(1));
    claims.first_name = Some(sub.to_uppercase());
    generate_token(&claims, SECRET).expect("token")
}

impl TestApp {
    /// Crea el usuario (como haría el login) y le asigna `role`
    pub async fn seed_user(&self, id: &str, email: &str, role: UserRole) -> User {
        let store = self.state.store();
        store
            .upsert_user(UpsertUser {
                id: id.to_string(),
                email: Some(email.to_string()),
                first_name: Some(id.to_uppercase()),
                last_name: None,
                profile_image_url: None,
            })
            .await
            .expect("upsert");
        store
            .update_user(
                id,
                UserChanges {
                    role: Some(role),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("user exists")
    }

    /// Usuario del dominio corporativo; devuelve su token
    pub async fn technician(&self, id: &str) -> String {
        let email = format!("{id}@netmon.com.tr");
        self.seed_user(id, &email, UserRole::Technician).await;
        token_for(id, &email)
    }

    pub async fn admin(&self, id: &str) -> String {
        let email = format!("{id}@netmon.com.tr");
        self.seed_user(id, &email, UserRole::Admin).await;
        token_for(id, &email)
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}
