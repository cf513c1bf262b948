//! Chat Gateway Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p chat-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use chat_common::{try_init_tracing_with_config, AppConfig, Environment, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration first so the log format can follow APP_ENV
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(Environment::default());
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    init_tracing(config.app.env);

    if let Err(e) = run(config).await {
        error!(error = %e, "Gateway failed to start");
        std::process::exit(1);
    }
}

fn init_tracing(env: Environment) {
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Chat Gateway Server...");
    info!(
        env = ?config.app.env,
        port = config.gateway.port,
        persistent = config.database.is_some(),
        "Configuration loaded"
    );

    chat_gateway::run(config).await?;

    info!("Gateway stopped");
    Ok(())
}
