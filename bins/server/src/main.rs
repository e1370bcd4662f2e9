//! Furlough API Server
//!
//! Main entry point for the time-off service.

use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use furlough_api::{AppState, create_router};
use furlough_db::{connect_with_pool, migration::Migrator};
use furlough_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "furlough=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    if config.database.run_migrations {
        Migrator::up(&db, None).await?;
        info!("Migrations applied");
    }

    info!(
        allow_negative = config.ledger.allow_negative,
        floor = config.ledger.floor,
        "Ledger policy configured"
    );

    let state = AppState::new(db, &config);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
