//! Integration tests for `POST /profile`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use room_sensor_dialog::adapters::http::{app_router, ConversationAppState, ProfileAppState};
use room_sensor_dialog::adapters::{RestDialogConfig, RestDialogService, UnboundTelemetryService};
use room_sensor_dialog::application::{
    GetProfileHandler, HandleConversationHandler, SharedDeviceDirectory,
};
use room_sensor_dialog::config::ServerConfig;
use room_sensor_dialog::ports::DialogService;

const PROFILE_PATH: &str = "/v1/dialogs/dlg-1/profile";

fn app(dialog_server: &MockServer) -> Router {
    let dialog: Arc<dyn DialogService> = Arc::new(
        RestDialogService::new(RestDialogConfig::new(
            dialog_server.uri(),
            "dlg-1",
            "dialog-user",
            "dialog-pass",
        ))
        .unwrap(),
    );
    let conversation = HandleConversationHandler::new(
        dialog.clone(),
        Arc::new(UnboundTelemetryService),
        SharedDeviceDirectory::new(),
        Default::default(),
    );
    app_router(
        ConversationAppState::new(Arc::new(conversation)),
        ProfileAppState::new(Arc::new(GetProfileHandler::new(dialog))),
        &ServerConfig::default(),
    )
}

async fn post_profile(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/profile")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn stored_profile() -> Value {
    json!({
        "client_id": 7,
        "name_values": [{"name": "value", "value": "21"}]
    })
}

#[tokio::test]
async fn profile_is_returned_verbatim() {
    let dialog = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .and(query_param("client_id", "7"))
        .and(query_param("name", "value"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_profile()))
        .expect(1)
        .mount(&dialog)
        .await;

    let (status, body) =
        post_profile(&app(&dialog), json!({"client_id": 7, "name": "value"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, stored_profile());
}

#[tokio::test]
async fn repeated_lookups_are_identical() {
    let dialog = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .and(query_param("client_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_profile()))
        .expect(2)
        .mount(&dialog)
        .await;

    let app = app(&dialog);
    let first = post_profile(&app, json!({"client_id": 7})).await;
    let second = post_profile(&app, json!({"client_id": 7})).await;

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(first, second);
}

#[tokio::test]
async fn upstream_error_is_propagated() {
    let dialog = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid client_id"})),
        )
        .mount(&dialog)
        .await;

    let (status, body) = post_profile(&app(&dialog), json!({"client_id": "x"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().unwrap().contains("Invalid client_id"));
}
