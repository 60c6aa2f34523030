use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timebook_api::config::ServerConfig;
use timebook_api::router::build_app_router;
use timebook_api::state::AppState;
use timebook_core::config::{required, ConfigError};
use timebook_reconcile::{BatchReconciler, EntryReconciler, ReconcileConfig};
use timebook_trac::{TicketServiceError, TracClient, TracConfig};

/// Anything that stops the server from starting.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid HOST address: {0}")]
    Host(#[from] AddrParseError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to run database migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to build ticket service client: {0}")]
    TicketService(#[from] TicketServiceError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timebook_api=debug,timebook_reconcile=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    let reconcile_config = ReconcileConfig::from_env()?;
    let trac_config = TracConfig::from_env()?;
    let database_url = required("DATABASE_URL")?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        shards = reconcile_config.shard_count.get(),
        trac = %trac_config.base_url,
        "Loaded configuration"
    );

    // --- Database ---
    let pool = timebook_db::create_pool(&database_url).await?;
    tracing::info!("Database connection pool created");

    timebook_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    timebook_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    // --- Reconciliation ---
    let tickets = Arc::new(TracClient::new(trac_config)?);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        entries: EntryReconciler::new(tickets, reconcile_config.clone()),
        batch: BatchReconciler::new(reconcile_config),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(config.host.parse::<IpAddr>()?, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
