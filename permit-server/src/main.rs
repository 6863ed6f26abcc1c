//! Permit Server Binary
//!
//! HTTP server providing REST API access to the permit policy engine.
//!
//! ## Usage
//!
//! ```bash
//! # Start with a policy directory (required)
//! PERMIT_POLICY_DIR=./policies permit-server
//!
//! # Custom port
//! PERMIT_PORT=3000 PERMIT_POLICY_DIR=./policies permit-server
//! ```
//!
//! Policy documents merge in file-name order, so name them
//! most-general-first (e.g., `00-base.json`, `10-lcv-overlay.json`).

use std::path::PathBuf;

use permit_core::{definition, PolicyEngine};
use permit_server::{PermitServer, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "permit_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get configuration from environment
    let port: u16 = std::env::var("PERMIT_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8430);

    let policy_dir = std::env::var("PERMIT_POLICY_DIR")
        .map(PathBuf::from)
        .map_err(|_| "PERMIT_POLICY_DIR must point to a directory of policy documents")?;

    let documents = definition::load_from_directory(&policy_dir)?;
    tracing::info!(
        "Loaded {} policy document(s) from {:?}",
        documents.len(),
        policy_dir
    );
    for document in &documents {
        tracing::info!(
            "  {} (minPEVersion {})",
            if document.name.is_empty() {
                "<unnamed>"
            } else {
                document.name.as_str()
            },
            document.min_engine_version
        );
    }

    // Construction runs the version gate and every invariant check; a bad
    // policy set never serves traffic
    let engine = PolicyEngine::new(documents)?;

    let config = ServerConfig::builder().port(port).build();

    tracing::info!("Starting Permit Server v{}", env!("CARGO_PKG_VERSION"));

    let server = PermitServer::new(engine, config);
    server.run().await?;

    Ok(())
}
