use anyhow::{Context, Result};
use clockbill_server::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().nth(1).as_deref() == Some("--example-config") {
        print!("{}", Config::example());
        return Ok(());
    }

    // Initialize tracing with INFO level by default
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::load_default()?;

    tracing::info!("Clockbill server starting...");
    tracing::info!("Database: {}", config.database.path.display());
    tracing::info!("Trial download limit: {}", config.trial.download_limit);

    // Create parent directory for database if it doesn't exist
    if let Some(parent) = config.database.path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize database
    let db = clockbill_db::Database::new(&config.database.path).await?;
    db.migrate().await?;
    tracing::info!("Database initialized successfully");

    let state = AppState::from_config(&config, db)?;
    let app = build_router(state);

    let bind_addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    tracing::info!("Clockbill ready on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
