//! Permit Server - HTTP wrapper for the permit policy engine
//!
//! This crate provides a REST API around `permit-core`, enabling the
//! dual-mode architecture:
//!
//! - **Mode 1 (Embedded)**: call `permit-core` directly from your process
//! - **Mode 2 (HTTP)**: run this server and call it over REST
//!
//! The server is a thin wrapper - all permitting logic remains in
//! `permit-core`. The engine is immutable after construction, so one shared
//! instance serves every request without locking.

pub mod routes;
mod config;

pub use config::{ServerConfig, ServerConfigBuilder};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use permit_core::PolicyEngine;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
pub struct AppState {
    /// The policy engine (read-only after construction)
    pub engine: PolicyEngine,
}

impl AppState {
    /// Create new app state wrapping the given engine
    pub fn new(engine: PolicyEngine) -> Self {
        Self { engine }
    }
}

/// Permit HTTP server
///
/// Wraps a `permit_core::PolicyEngine` with HTTP endpoints.
pub struct PermitServer {
    state: Arc<AppState>,
    config: ServerConfig,
}

impl PermitServer {
    /// Create a new server wrapping the given engine
    pub fn new(engine: PolicyEngine, config: ServerConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(engine)),
            config,
        }
    }

    /// Build the Axum router with all routes
    pub fn router(&self) -> Router {
        let mut router =
            routes::create_router(Arc::clone(&self.state)).layer(TraceLayer::new_for_http());
        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router
    }

    /// Get the socket address for the server
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.config.port))
    }

    /// Run the server
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();
        let addr = self.addr();

        tracing::info!("Permit Server listening on http://{}", addr);
        tracing::info!("Endpoints:");
        tracing::info!("  GET  /health");
        tracing::info!("  POST /v1/validate");
        tracing::info!("  GET  /v1/permit-types");
        tracing::info!("  GET  /v1/vehicle-types");
        tracing::info!("  GET  /v1/commodities");
        tracing::info!("  GET  /v1/regions");
        tracing::info!("  POST /v1/display-code");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
