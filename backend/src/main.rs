use std::net::SocketAddr;

use c4_backend::config::{Config, API_KEY_VAR};
use c4_backend::store::MemoryStore;
use c4_backend::{app, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    if config.api_key.is_empty() {
        warn!("{API_KEY_VAR} is not set; every api request will be rejected");
    }

    let state = AppState::new(MemoryStore::default(), &config);
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, static_dir = %config.static_dir.display(), "starting server");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
