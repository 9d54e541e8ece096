//! HTTP handlers.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json},
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Latest snapshot document published by the collector
    pub snapshot: watch::Receiver<String>,
    pub service_name: Arc<str>,
}

impl AppState {
    pub fn new(snapshot: watch::Receiver<String>, service_name: impl Into<Arc<str>>) -> Self {
        Self {
            snapshot,
            service_name: service_name.into(),
        }
    }
}

/// Current datapoint snapshot.
///
/// The document is already valid JSON; it is served verbatim.
pub async fn get_snapshot(State(state): State<AppState>) -> impl IntoResponse {
    let document = state.snapshot.borrow().clone();
    ([(header::CONTENT_TYPE, "application/json")], document)
}

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": &*state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
