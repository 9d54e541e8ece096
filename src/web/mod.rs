//! Web server exposing the datapoint snapshot.
//!
//! `GET /` returns the collector's latest document as `application/json`.
//! Documents arrive from the collector stream and are handed to handlers
//! through a watch channel, so the HTTP side never touches the cache itself.

pub mod config;
pub mod handlers;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use handlers::AppState;
pub use router::create_app;

use crate::datapoints::snapshot::empty_document;
use crate::error::{HeaterError, Result};
use futures_util::stream::BoxStream;
use std::net::SocketAddr;
use tokio::sync::watch;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// Start the web server with the provided configuration and document stream.
pub async fn start_web_server(
    config: WebConfig,
    mut documents: BoxStream<'static, String>,
) -> Result<()> {
    let (tx, rx) = watch::channel(empty_document());
    let app = create_app(&config, AppState::new(rx, config.service_name.as_str()));

    // Parse the bind address
    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| HeaterError::config_error(format!("Invalid bind address: {}", e)))?;

    info!("Starting {} on http://{}", config.service_name, addr);
    info!("Snapshot endpoint: http://{}/", addr);
    info!("Health endpoint: http://{}/api/health", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HeaterError::web_server_error(format!("Failed to bind to address: {}", e)))?;

    // Publish each document from the collector to the handlers
    let _publish_task = tokio::spawn(async move {
        while let Some(document) = documents.next().await {
            debug!("Publishing snapshot ({} bytes)", document.len());
            tx.send_replace(document);
        }
        warn!("Collector stream ended; serving last snapshot");
    });

    axum::serve(listener, app)
        .await
        .map_err(|e| HeaterError::web_server_error(format!("Server error: {}", e)))?;

    Ok(())
}
