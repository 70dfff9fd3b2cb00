//! Mirror Relay entry point
//!
//! Run with:
//! ```bash
//! cargo run -p mirror-relay
//! ```
//!
//! Configuration is loaded from environment variables.

use mirror_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.server.address(),
        asset_root = %config.relay.asset_root.display(),
        "Configuration loaded"
    );

    // Run the server
    if let Err(e) = mirror_relay::run(config).await {
        error!(error = %e, code = e.error_code(), "Relay failed");
        std::process::exit(1);
    }
}
