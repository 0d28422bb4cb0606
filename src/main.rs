use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use field_service::config::{database, DatabaseConfig, EnvironmentConfig, StoreBackend};
use field_service::repositories::{FieldStore, MemoryStore, PostgresStore};
use field_service::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,field_service=debug,tower_http=info")),
        )
        .init();

    info!("🛠️ Field Service API");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;

    let store: Arc<dyn FieldStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = match db_config.create_pool().await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            database::run_migrations(&pool)
                .await
                .context("Error aplicando migraciones")?;
            info!("✅ PostgreSQL conectado");
            Arc::new(PostgresStore::new(pool))
        }
        StoreBackend::Memory => {
            info!("🧪 Usando almacén en memoria (los datos se pierden al reiniciar)");
            Arc::new(MemoryStore::new())
        }
    };

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección inválida: {}", config.server_url()))?;

    info!("🌐 Servidor iniciando en http://{} ({})", addr, config.environment);
    info!("🔒 Dominio permitido: @{}", config.allowed_email_domain);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /api/health");
    info!("   GET    /api/auth/user | POST /api/auth/login");
    info!("   GET    /api/field-tasks | POST /api/field-tasks");
    info!("   GET    /api/field-tasks/:id | PATCH | DELETE");
    info!("   GET    /api/field-reports | POST /api/field-reports");
    info!("   GET    /api/field-reports/:id | PATCH");
    info!("   GET    /api/analytics/user-stats");
    info!("   GET    /api/admin/users | PATCH /api/admin/users/:id");
    info!("   GET    /api/admin/recent-activities");
    if let Some(dir) = &config.static_dir {
        info!("📦 Sirviendo SPA desde {}", dir.display());
    }

    let app = create_router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
