//! Peercache node
//!
//! Runs one cache node: the peer endpoint, and optionally the front-end API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peercache::{api, AppState, Config, GetterFn, Group, GroupRegistry, HttpPool};

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Register the demo group backed by an in-memory "slow DB"
/// 4. Build the peer pool and attach it to the group
/// 5. Start the front-end API server if `API_PORT` is set
/// 6. Serve the peer endpoint on the port of `SELF_ADDR`
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peercache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting peercache node");

    let config = Config::from_env();
    info!(
        "Configuration loaded: group={}, cache_bytes={}, self={}, peers={:?}, replicas={}",
        config.group_name, config.cache_bytes, config.self_addr, config.peers, config.replicas
    );

    let registry = Arc::new(GroupRegistry::new());
    let group = create_group(&registry, &config);

    let pool = Arc::new(
        HttpPool::new(config.self_addr.as_str())
            .with_base_path(&config.base_path)
            .with_replicas(config.replicas),
    );
    pool.set(&config.peers);
    group.register_peers(pool.clone())?;

    let api_handle = config
        .api_port
        .map(|port| spawn_api_server(port, group.clone()));

    let port = config
        .listen_port()
        .context("SELF_ADDR must be a URL with a port")?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding peer server to {}", addr))?;
    info!("peercache is running at {} (listening on {})", config.self_addr, addr);

    axum::serve(listener, pool.router(registry))
        .with_graceful_shutdown(shutdown_signal(api_handle))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Registers the demo group, loading from a small in-memory table.
fn create_group(registry: &GroupRegistry, config: &Config) -> Arc<Group> {
    let db: HashMap<&'static str, &'static str> =
        HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);

    registry.new_group(
        &config.group_name,
        config.cache_bytes,
        GetterFn::new(move |key: &str| {
            info!("[SlowDB] search key {}", key);
            db.get(key)
                .map(|v| v.as_bytes().to_vec())
                .ok_or_else(|| anyhow::anyhow!("{} not exist", key))
        }),
    )
}

/// Serves the front-end API on `port` in the background.
fn spawn_api_server(port: u16, group: Arc<Group>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind front-end API to {}: {}", addr, e);
                return;
            }
        };
        info!("Front-end API listening on http://{}", addr);

        let app = api::create_router(AppState::new(group));
        if let Err(e) = axum::serve(listener, app).await {
            error!("Front-end API stopped: {}", e);
        }
    })
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the front-end API task if one is running.
async fn shutdown_signal(api_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = api_handle {
        handle.abort();
        warn!("Front-end API aborted");
    }
}
