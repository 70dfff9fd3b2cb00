//! Relay server setup
//!
//! Builds the router, the shared state, and the accept loop.

mod assets;
mod dispatch;
mod error;
mod middleware;
mod relay;
mod state;

pub use dispatch::{create_session, dispatch, health_check, route_upgrades, CreateSessionResponse};
pub use error::RelayError;
pub use middleware::{REQUEST_ID_HEADER, SERVER_NAME};
pub use state::RelayState;

use crate::session::SessionRegistry;
use axum::{middleware::from_fn_with_state, routing::get, Router};
use mirror_common::{AppConfig, AppError};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Create the relay router
///
/// Plain requests only; upgrades are claimed by [`route_upgrades`] in
/// [`create_app`]. Anything unmatched falls through to [`dispatch`].
pub fn create_router(config: &AppConfig) -> Router<RelayState> {
    Router::new()
        .route(
            "/create",
            get(create_session).layer(middleware::create_cors_layer(&config.cors)),
        )
        .route("/health", get(health_check))
        .fallback(dispatch)
}

/// Build the complete application
pub fn create_app(state: RelayState) -> Router {
    let router = create_router(state.config())
        .layer(from_fn_with_state(state.clone(), route_upgrades));
    middleware::apply_middleware(router).with_state(state)
}

/// Create the `RelayState` for a configuration
pub fn create_relay_state(config: AppConfig) -> RelayState {
    let registry = SessionRegistry::new_shared(config.relay.session_limit());
    match registry.limit() {
        Some(limit) => tracing::info!(limit, "Session registry limited"),
        None => tracing::info!("Session registry unbounded; sessions are never evicted"),
    }

    RelayState::new(registry, config)
}

/// Bind the listening socket
pub async fn bind(addr: &str) -> Result<TcpListener, AppError> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::bind(addr, e))
}

/// Run the relay server on an already-bound listener.
///
/// Every accepted connection is served on its own task; there is no cap on
/// concurrent connections.
pub async fn run_server(listener: TcpListener, app: Router) -> Result<(), AppError> {
    let addr = listener.local_addr().map_err(AppError::Server)?;
    tracing::info!("Relay listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(AppError::Server)
}

/// Run the complete relay server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();
    tracing::info!("Starting relay server on {}", addr);

    let listener = bind(&addr).await?;

    let state = create_relay_state(config);
    let app = create_app(state);

    run_server(listener, app).await
}
