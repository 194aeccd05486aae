//! Top-level router: every endpoint plus the shared tower-http layers.

use axum::http::{header, HeaderValue, Method};
use axum::{middleware, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::conversation::{conversation_routes, ConversationAppState};
use super::middleware::request_deadline;
use super::profile::{profile_routes, ProfileAppState};

/// Builds the application router.
///
/// Routes:
/// - `POST /conversation`
/// - `POST /profile`
pub fn app_router(
    conversation: ConversationAppState,
    profile: ProfileAppState,
    server: &ServerConfig,
) -> Router {
    Router::new()
        .merge(conversation_routes(conversation))
        .merge(profile_routes(profile))
        .layer(middleware::from_fn_with_state(
            server.request_timeout(),
            request_deadline,
        ))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

/// Any origin unless `cors_origins` lists some.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(allow_origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::dialog::MockDialogService;
    use crate::adapters::telemetry::UnboundTelemetryService;
    use crate::application::{GetProfileHandler, HandleConversationHandler, SharedDeviceDirectory};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(server: &ServerConfig) -> Router {
        let dialog = Arc::new(MockDialogService::new("dlg-1").with_reply("", ["Welcome"]));
        let conversation = HandleConversationHandler::new(
            dialog.clone(),
            Arc::new(UnboundTelemetryService),
            SharedDeviceDirectory::new(),
            Default::default(),
        );
        let profile = GetProfileHandler::new(dialog);
        app_router(
            ConversationAppState::new(Arc::new(conversation)),
            ProfileAppState::new(Arc::new(profile)),
            server,
        )
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ORIGIN, "http://localhost:8080")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn mounts_both_endpoints() {
        let server = ServerConfig::default();

        let conversation = app(&server).oneshot(post("/conversation", "{}")).await.unwrap();
        let profile = app(&server)
            .oneshot(post("/profile", r#"{"client_id": 1}"#))
            .await
            .unwrap();

        assert_eq!(conversation.status(), StatusCode::OK);
        assert_eq!(profile.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = app(&ServerConfig::default())
            .oneshot(post("/nowhere", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn any_origin_allowed_by_default() {
        let response = app(&ServerConfig::default())
            .oneshot(post("/conversation", "{}"))
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn configured_origins_are_enforced() {
        let server = ServerConfig {
            cors_origins: Some("https://rooms.example.com".to_string()),
            ..Default::default()
        };

        let response = app(&server).oneshot(post("/conversation", "{}")).await.unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
