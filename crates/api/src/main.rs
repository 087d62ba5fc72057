use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courtside::app::build_router;
use courtside::gql::build_schema;
use courtside::services::spawn_auto_fill_service;
use courtside::{AppConfig, AppState};
use infra::store::{FacilityStore, MemoryFacilityStore, PgFacilityStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    let store: Arc<dyn FacilityStore> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .acquire_timeout(std::time::Duration::from_secs(3))
                .idle_timeout(Some(std::time::Duration::from_secs(600))) // 10 minutes
                .max_lifetime(Some(std::time::Duration::from_secs(1800))) // 30 minutes
                .connect(url)
                .await?;
            tracing::info!(
                "Connected to Postgres with max {} connections",
                config.database_max_connections
            );

            if config.skip_migrations {
                tracing::info!("Skipping database migrations (SKIP_MIGRATIONS=true)");
            } else {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("../../migrations").run(&pool).await?;
                tracing::info!("Database migrations completed successfully");
            }

            Arc::new(PgFacilityStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store, nothing will persist");
            Arc::new(MemoryFacilityStore::new())
        }
    };

    let state = AppState::new(store, config.clone());
    let schema = build_schema(state.clone());

    if let Some(period) = config.auto_fill_interval {
        let _auto_fill_handle = spawn_auto_fill_service(state.clone(), period);
        tracing::info!("Auto-fill service started");
    }

    let app = build_router(state, schema);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
