use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::common::{TestClient, TestStateBuilder, jwt};

#[tokio::test]
async fn test_protected_routes_require_token() {
    let client = TestClient::from_state(TestStateBuilder::new().build_without_db());

    for uri in [
        "/api/topics/1",
        "/api/get-question?topic_id=1",
        "/api/get-random-question",
        "/api/exams",
        "/api/exams/1/questions",
        "/api/stats",
    ] {
        let response = client.get(uri).await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let json: serde_json::Value = response.json();
        assert_eq!(json["error"], "Not authenticated", "uri: {uri}");
    }

    let response = client
        .post_json("/api/ask-topic", &json!({ "context": "texto", "query": "¿qué?" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = client.post_json("/api/tests/start", &json!({})).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_token_rejected() {
    let client = TestClient::from_state(TestStateBuilder::new().build_without_db());

    let response = client.get_with_auth("/api/stats", "not-a-jwt").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let client = TestClient::from_state(TestStateBuilder::new().build_without_db());
    let token = jwt::create_expired_token(Uuid::new_v4());

    let response = client.get_with_auth("/api/stats", &token).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let client = TestClient::from_state(TestStateBuilder::new().build_without_db());
    let token = jwt::create_foreign_token(Uuid::new_v4());

    let response = client.get_with_auth("/api/stats", &token).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_accepted() {
    let client = TestClient::from_state(TestStateBuilder::new().build_without_db());
    let token = jwt::create_test_token(Uuid::new_v4());

    // Tutor with inline context needs no database
    let response = client
        .post_json_with_auth(
            "/api/ask-topic",
            &json!({ "context": "La Constitución se aprobó en 1978.", "query": "¿Cuándo?" }),
            &token,
        )
        .await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_public_topic_list_skips_auth() {
    let client = TestClient::from_state(TestStateBuilder::new().build_without_db());

    // No token, so a failure here comes from the unreachable database, not auth
    let response = client.get("/api/topics").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let json: serde_json::Value = response.json();
    assert_eq!(json["error"], "Internal server error");
}

/// Collects every span field recorded after creation
#[derive(Clone, Default)]
struct RecordedFields(std::sync::Arc<std::sync::Mutex<Vec<(String, String)>>>);

impl tracing::field::Visit for RecordedFields {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .lock()
            .unwrap()
            .push((field.name().to_string(), format!("{value:?}")));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for RecordedFields {
    fn on_record(
        &self,
        _span: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        values.record(&mut self.clone());
    }
}

#[tokio::test]
async fn test_user_id_is_recorded_on_request_span() {
    use opo_api::{config::Environment, middleware::apply_http_layers, router};
    use tracing_subscriber::layer::SubscriberExt;

    let recorded = RecordedFields::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(recorded.clone()));

    let app = apply_http_layers(
        router::router().with_state(TestStateBuilder::new().build_without_db()),
        vec!["https://opoquiz.app".to_string()],
        Environment::Development,
    );
    let client = TestClient::new(app);
    let user_id = Uuid::new_v4();

    let response = client
        .post_json_with_auth(
            "/api/ask-topic",
            &serde_json::json!({ "context": "Texto del tema.", "query": "¿Qué dice?" }),
            &jwt::create_test_token(user_id),
        )
        .await;
    response.assert_status(StatusCode::OK);
    assert!(response.headers.contains_key("x-request-id"));

    let fields = recorded.0.lock().unwrap().clone();
    assert!(
        fields
            .iter()
            .any(|(name, value)| name == "user_id" && value == &user_id.to_string()),
        "user_id was not recorded, got {fields:?}"
    );
}
