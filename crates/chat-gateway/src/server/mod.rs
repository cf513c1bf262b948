//! Gateway server setup
//!
//! Provides the main WebSocket server configuration and routes.

mod handler;
mod state;

#[cfg(test)]
pub(crate) use handler::cleanup_connection;
pub use handler::gateway_handler;
pub use state::GatewayState;

use axum::{routing::get, Router};
use chat_common::{AppConfig, AppError};
use chat_core::MessageStore;
use chat_db::{MemoryMessageStore, PgMessageStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the message store named by the configuration
///
/// PostgreSQL when a database is configured, an in-memory store otherwise.
pub async fn create_message_store(config: &AppConfig) -> Result<Arc<dyn MessageStore>, AppError> {
    let Some(database) = &config.database else {
        tracing::warn!("DATABASE_URL not set, messages are kept in memory only");
        return Ok(Arc::new(MemoryMessageStore::new()));
    };

    tracing::info!("Connecting to PostgreSQL...");
    let db_config = chat_db::DatabaseConfig::from(database);
    let pool = chat_db::create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    chat_db::ensure_schema(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    Ok(Arc::new(PgMessageStore::new(pool)))
}

/// Initialize all dependencies and create `GatewayState`
pub async fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    let store = create_message_store(&config).await?;
    GatewayState::with_store(config, store)
}

/// Serve `state` on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: GatewayState, shutdown: F) -> Result<(), AppError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Transport(e.to_string()))?;
    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    let app = create_app(state.clone());
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Transport(format!("Server error: {e}")));

    state.broadcaster().close();
    result
}

/// Run the gateway server
pub async fn run_server(state: GatewayState) -> Result<(), AppError> {
    let addr = state.config().gateway.address();
    tracing::info!("Starting Gateway server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    serve(listener, state, shutdown_signal()).await
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let state = create_gateway_state(config).await?;
    run_server(state).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
