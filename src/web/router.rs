//! Web application router and middleware setup.

use crate::web::config::WebConfig;
use crate::web::handlers::{self, AppState};
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the axum application serving the snapshot document.
///
/// `/update` is owned by the firmware-update collaborator and only linked
/// from the document's trailer.
pub fn create_app(config: &WebConfig, state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::get_snapshot))
        .route("/api/health", get(handlers::health_check))
        .with_state(state);

    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tokio::sync::watch;
    use tower::ServiceExt;

    fn app(document: &str) -> (Router, watch::Sender<String>) {
        let (tx, rx) = watch::channel(document.to_string());
        let app = create_app(&WebConfig::default(), AppState::new(rx, "test-heater"));
        (app, tx)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_root_serves_latest_snapshot() {
        let (app, tx) = app(r#"{"href":{"update":"/update"}}"#);
        tx.send_replace(r#"{"Temp":254.3,"href":{"update":"/update"}}"#.to_string());

        let (status, content_type, body) = get(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, r#"{"Temp":254.3,"href":{"update":"/update"}}"#);
    }

    #[tokio::test]
    async fn test_query_parameters_are_ignored() {
        let (app, _tx) = app(r#"{"href":{"update":"/update"}}"#);
        let (status, _, body) = get(app, "/?pretty=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"href":{"update":"/update"}}"#);
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _tx) = app("{}");
        let (status, _, body) = get(app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["service"], "test-heater");
    }

    #[tokio::test]
    async fn test_update_is_not_served_here() {
        let (app, _tx) = app("{}");
        let (status, _, _) = get(app, "/update").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
