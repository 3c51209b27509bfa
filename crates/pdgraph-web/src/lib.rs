//! pdgraph Web Server
//!
//! Axum router exposing graph resolution over HTTP, the configuration
//! surface, a WebSocket feed of status changes and the passthrough endpoint.

pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/resolve", post(routes::graph::resolve))
        .route("/ref", post(routes::graph::resolve_ref))
        .route("/status", get(routes::config::status))
        .route("/configure", post(routes::config::configure))
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(websocket::ws_handler))
        .fallback(routes::endpoint::endpoint)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pdgraph_api::{Gateway, Hosts};
    use pdgraph_core::ConfigStore;
    use pdgraph_graph::Graph;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state(hosts: Hosts) -> AppState {
        let gateway = Gateway::new(Arc::new(ConfigStore::in_memory()), hosts);
        AppState::new(Arc::new(Graph::new(Arc::new(gateway))))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_endpoint_echoes_path() {
        let app = create_router(state(Hosts::default()));
        let (status, body) = send(app, Request::get("/hooks/pd").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Path: /hooks/pd");
    }

    #[tokio::test]
    async fn test_configure_then_status() {
        let state = state(Hosts::default());
        let mut signals = state.config().subscribe();

        let (_, body) = send(
            create_router(state.clone()),
            Request::get("/api/status").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["status"], "not_configured");

        let (status, body) = send(
            create_router(state.clone()),
            post_json("/api/configure", json!({ "apiKey": "k" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({ "status": "ready", "message": "Ready" })
        );
        assert!(signals.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_resolve_descender_and_elided_entity() {
        let app = create_router(state(Hosts::default()));
        let (_, body) = send(app.clone(), post_json("/api/resolve", json!({ "field": "incidents" }))).await;
        assert_eq!(body, "{}");

        let (status, body) = send(
            app,
            post_json(
                "/api/ref",
                json!({ "gref": "root.incidents.one(id: \"X\")", "select": ["id"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({ "id": "X" }));
    }

    #[tokio::test]
    async fn test_resolve_maps_errors() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid"))
            .mount(&server)
            .await;
        let app = create_router(state(Hosts::single(server.uri())));

        let (status, body) = send(
            app.clone(),
            post_json(
                "/api/resolve",
                json!({
                    "path": [{ "field": "incidents" }, { "field": "one", "args": { "id": "X" } }],
                    "field": "acknowledged",
                    "args": { "email": "a@b.com" }
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, "invalid");

        let (status, _) = send(
            app,
            post_json("/api/resolve", json!({ "path": [{ "field": "services" }], "field": "one" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
