//! TalentFlow API Server

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use talentflow_api::{AppState, routes};
use talentflow_config::{StorageConfig, SystemConfig, load_system_config};
use talentflow_db::seed::seed_if_empty;
use talentflow_db::{JobStore, MemoryJobStore, PgJobStore, create_pool, run_migrations};
use talentflow_service::{FaultInjector, FlakyStore};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("TALENTFLOW_CONFIG") {
        Ok(path) => load_system_config(&path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        Err(_) => SystemConfig::default(),
    };

    let store = open_store(&config.storage).await?;
    seed_if_empty(store.as_ref(), config.seed.jobs).await?;

    // Latency and failures are injected after seeding so startup is deterministic
    let store: Arc<dyn JobStore> = if config.network.is_enabled() {
        info!(
            min_delay_ms = config.network.min_delay_ms,
            max_delay_ms = config.network.max_delay_ms,
            failure_rate = config.network.failure_rate,
            "Simulating network faults"
        );
        Arc::new(FlakyStore::new(store, FaultInjector::new(&config.network)))
    } else {
        store
    };

    let state = AppState::new(store);

    // Build router
    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.bind))?;
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn open_store(storage: &StorageConfig) -> anyhow::Result<Arc<dyn JobStore>> {
    match storage {
        StorageConfig::Memory => {
            info!("Using in-memory job store");
            Ok(Arc::new(MemoryJobStore::new()))
        }
        StorageConfig::Postgres { url } => {
            info!("Connecting to database...");
            let pool = create_pool(url).await?;
            run_migrations(&pool).await?;
            info!("Database connected");
            Ok(Arc::new(PgJobStore::new(pool)))
        }
    }
}
