mod config;
mod error;
mod expiry;
mod handler;
mod page;

use config::ServerConfig;
use handler::AppState;
use mks_core::{PurgeScheduler, Store, StoreConfig};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mks_server=info,mks_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration from environment variables
    let config = ServerConfig::from_env()?;

    // Create the store and its purge loop
    let store_config = StoreConfig::default().with_purge_interval(config.purge_interval);
    let store = Store::with_config(store_config.clone());
    let purger = PurgeScheduler::spawn(store.clone(), &store_config);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("🚀 mks listening on {}", addr);
    tracing::info!("   Public URL: {}", config.public_url);
    tracing::info!("   Purge interval: {}s", purger.interval().as_secs());
    tracing::info!("   Render stats: {}", config.render_stats);

    let app = handler::router(AppState::new(store, config));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    purger.shutdown();
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
