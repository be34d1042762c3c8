//! # TaskHub API Server
//!
//! REST API for projects, tasks and comments with per-project owner and
//! member rosters.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/taskhub JWT_SECRET=... cargo run -p taskhub-api
//! ```

use taskhub_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use taskhub_shared::db::{migrations::run_migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.logging.format);

    tracing::info!(
        "TaskHub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let db = pool::create_pool(config.database.pool_config()).await?;

    if config.run_migrations {
        run_migrations(&db).await?;
    }

    let bind_address = config.bind_address();
    let state = AppState::new(db.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskhub_api=debug,taskhub_shared=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
