//! HTTP server setup

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::routes::create_router;
use crate::AppState;

/// Full application router with CORS and request tracing
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Loopback address for the configured API port
pub fn bind_address(state: &AppState) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], state.config().api_port))
}

/// Bind the configured port and serve until the listener fails.
pub async fn start_server(state: AppState) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(bind_address(&state)).await?;
    serve(listener, state).await
}

/// Serve on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    let local = listener.local_addr()?;
    {
        let registry = state.registry().await;
        tracing::info!(
            %local,
            adapters = registry.adapters().len(),
            bridge_assets = registry.bridge_assets().len(),
            "waypoint API listening"
        );
    }

    axum::serve(listener, create_app(state)).await
}
