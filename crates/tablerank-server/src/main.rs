mod api;
mod middleware;

use std::net::SocketAddr;
use std::time::Duration;

use tablerank_places::DetailsCache;
use tablerank_ranking::{load_weights, WeightsConfig};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, rate_limit_state, AppState};

const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = tablerank_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let weights = match &config.weights_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading ranking weights");
            load_weights(path)?
        }
        None => WeightsConfig::default(),
    };

    let state = AppState::from_config(&config, weights)?;
    spawn_cache_purge(state.cache.clone());

    let app = build_app(state, rate_limit_state(&config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = ?config.env, "tablerank server listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

/// Drops stale details every hour so the cache does not grow without bound.
fn spawn_cache_purge(cache: DetailsCache) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_PURGE_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = cache.purge_expired(chrono::Utc::now()).await;
            tracing::debug!(removed, "cache purge finished");
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
