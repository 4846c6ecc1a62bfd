use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use materials_backoffice::{
    config::{database::DatabaseConfig, environment::EnvironmentConfig},
    create_app,
    database::{seed, DatabaseConnection},
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏗️ Materials back office - stock y nómina");
    info!("==========================================");

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;
    info!("⚙️ Entorno: {}", config.environment);

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new(&DatabaseConfig::from(&config)).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {:#}", e);
            return Err(e);
        }
    };
    let pool = db_connection.pool().clone();

    let seed_requested = std::env::args().any(|arg| arg == "--seed")
        || std::env::var("SEED_ON_START").is_ok_and(|v| v == "true");
    if seed_requested {
        let password = std::env::var("SEED_ADMIN_PASSWORD")
            .unwrap_or_else(|_| seed::DEFAULT_ADMIN_PASSWORD.to_string());
        seed::run_seed(&pool, &password)
            .await
            .context("Error ejecutando el seed")?;
    }

    if config.line_notify_token.is_none() {
        warn!("⚠️ LINE_NOTIFY_TOKEN no definido: las alertas de stock no se enviarán");
    }

    let addr = config.server_url();
    let app = create_app(AppState::new(pool, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("🔐 /api/auth: login, logout, me");
    info!("📦 /api/stock: materials, in, out, low-stock, history");
    info!("👷 /api/employees: empleados, trips, advances, salary");
    info!("📊 /api/reports: salary-excel, salary-pdf, stock-excel, stock-pdf");
    info!("⏰ /api/cron/stock-alert");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("No se pudo abrir {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
