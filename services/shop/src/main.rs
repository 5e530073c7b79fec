use anyhow::Result;
use common::database::{health_check, init_pool};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shop::{
    AppState, create_router, database::ensure_schema, jwt::JwtService, password::PasswordService,
    settings::Settings,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting shop service");

    let settings = Settings::load()?;
    let bind_address = settings.bind_address()?;

    // Initialize database connection pool
    let pool = init_pool(&settings.database()).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let policy = settings.account_policy();
    ensure_schema(&pool, policy.enforce_unique_username).await?;

    let passwords = PasswordService::new(&settings.hasher())?;
    let jwt_service = JwtService::new(&settings.jwt())?;

    let app_state = AppState::with_postgres(pool, passwords, jwt_service, policy);
    let app = create_router(app_state);

    let listener = TcpListener::bind(bind_address).await?;
    info!("Shop service listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down shop service");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
