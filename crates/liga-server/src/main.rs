use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use liga_core::LigaConfig;
use liga_live::{KeepaliveTask, Registry};
use liga_server::{build_router, AppState};
use liga_store::LeagueStore;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "liga-server", version, about = "League statistics API with live updates")]
struct Cli {
    /// Path to liga.toml (defaults to ~/.liga/liga.toml).
    #[arg(long, env = "LIGA_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "liga_server=info,liga_live=info,liga_store=info,tower_http=debug".into()
            }),
        )
        .init();

    let cli = Cli::parse();
    let config = LigaConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        LigaConfig::default()
    });

    let db_path = config.database.path.clone();
    ensure_parent_dir(&db_path);
    let store = LeagueStore::open(&db_path)?;
    info!(path = %db_path, "database ready");

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let keepalive_period = Duration::from_secs(config.live.keepalive_secs.max(1));

    let state = Arc::new(AppState::new(config, store));
    let keepalive = KeepaliveTask::spawn(Arc::clone(&state.registry), keepalive_period);
    let router = build_router(Arc::clone(&state));

    info!(
        max_clients = state.registry.max_clients(),
        "liga-server listening on {}", addr
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&state.registry)))
        .await?;

    keepalive.stop().await;
    info!("liga-server stopped");
    Ok(())
}

/// Resolves on Ctrl-C. Live streams never finish on their own, so they are
/// closed here to let in-flight connections drain. Streams opened after this
/// point are refused.
async fn shutdown_signal(registry: Arc<Registry>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
    registry.close_all();
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
