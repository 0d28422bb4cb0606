//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Todas las variables
//! tienen un valor por defecto salvo `JWT_SECRET`.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use chrono::FixedOffset;

use crate::utils::validation::parse_utc_offset;

pub const DEFAULT_ALLOWED_EMAIL_DOMAIN: &str = "netmon.com.tr";

/// Implementación de `FieldStore` a usar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("STORE_BACKEND must be `postgres` or `memory`, got `{}`", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub allowed_email_domain: String,
    pub business_utc_offset: FixedOffset,
    pub cors_origins: Vec<String>,
    pub store_backend: StoreBackend,
    pub static_dir: Option<PathBuf>,
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno del proceso
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let port = match var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid number, got `{}`", raw))?,
            None => 5000,
        };

        let business_utc_offset = match var("BUSINESS_UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw)
                .ok_or_else(|| anyhow!("BUSINESS_UTC_OFFSET must look like +03:00, got `{}`", raw))?,
            None => FixedOffset::east_opt(0).context("UTC offset")?,
        };

        let allowed_email_domain = var("ALLOWED_EMAIL_DOMAIN")
            .map(|d| d.trim_start_matches('@').to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_ALLOWED_EMAIL_DOMAIN.to_string());
        if allowed_email_domain.is_empty() {
            bail!("ALLOWED_EMAIL_DOMAIN cannot be empty");
        }

        let store_backend = match var("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StoreBackend::Postgres,
        };

        let cors_origins = var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            jwt_secret,
            allowed_email_domain,
            business_utc_offset,
            cors_origins,
            store_backend,
            static_dir: var("STATIC_DIR").map(PathBuf::from),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
