use anyhow::Result;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

use site::config::Config;
use site::routes::build_router;
use site::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    site::logging::init(env!("CARGO_CRATE_NAME"), &config.rust_log);

    info!("Starting portfolio site v{}", env!("CARGO_PKG_VERSION"));
    info!("Proxying /api to {}", config.backend_url);
    info!("Serving static bundle from {}", config.static_dir);

    let state = AppState::new(&config.backend_url, &config.static_dir);
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
