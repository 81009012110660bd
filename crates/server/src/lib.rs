pub mod api;
pub mod auth;
pub mod config;
pub mod limit;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

pub use api::{ApiError, AppState, router};
pub use auth::{AuthError, Identity, KeyRegistry};
pub use config::{ConfigError, ServerConfig};
pub use limit::{RateLimitResult, RateLimiter, spawn_reset_task};

/// Binds `config.addr` and serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let state = AppState::from_config(&config);
    let reset_task = spawn_reset_task(Arc::clone(&state.limiter));
    let app = router(&config, state);

    let listener = TcpListener::bind(config.addr).await?;
    info!(
        addr = %listener.local_addr()?,
        keys = config.api_keys.len(),
        anonymous = config.allow_anonymous,
        rate_limit = config.rate_limit,
        "plainpage server listening"
    );

    let served = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;
    reset_task.abort();
    info!("plainpage server stopped");
    served
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
