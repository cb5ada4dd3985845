use std::sync::Arc;

use anyhow::{Context, Result};
use post_comments::{AppState, Settings, SqliteStore};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "post_comments=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env().context("invalid configuration")?;
    tracing::info!(?settings, "configuration loaded");

    let store = SqliteStore::connect(&settings.database_url, settings.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", settings.database_url))?;
    store.migrate().await.context("failed to migrate database")?;

    let shared_state = Arc::new(AppState::new(Arc::new(store)));
    let app = post_comments::mount(&settings.base_path, shared_state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(settings.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_address))?;
    tracing::info!(
        address = %settings.bind_address,
        base_path = %settings.base_path,
        "serving comments"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
