//! API 模块
//!
//! HTTP handlers 和路由组装

pub mod health;
pub mod edgex;
pub mod chirpstack;
pub mod tokens;

use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// 构建完整的 API 路由
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Home & Health
        .merge(health::router())
        // EdgeX
        .merge(edgex::router())
        // ChirpStack
        .merge(chirpstack::router())
        // Vault root tokens
        .merge(tokens::router())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::EnvConfig;
    use crate::infra::command::testing::RecordingExecutor;

    fn app_with(executor: Arc<RecordingExecutor>) -> Router {
        let state = AppState::with_executor(EnvConfig::default(), executor);
        router(Arc::new(state))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_home() {
        let exec = Arc::new(RecordingExecutor::output(""));
        let (status, json) = get(app_with(exec.clone()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], health::WELCOME_MESSAGE);
        assert!(exec.calls().is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let exec = Arc::new(RecordingExecutor::output(""));
        let (status, json) = get(app_with(exec.clone()), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["exec_mode"], "argv");
        assert_eq!(json["containers"]["chirpstack"], "chirpstack-chirpstack-1");
        assert!(exec.calls().is_empty());
    }

    #[tokio::test]
    async fn test_generate_password_success() {
        let exec = Arc::new(RecordingExecutor::output(r#"{"username":"u","password":"p"}"#));
        let (status, json) = get(app_with(exec.clone()), "/generate-password/u").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({ "message": "User u created successfully.", "password": "p" })
        );

        let calls = exec.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "docker");
        assert_eq!(
            calls[0].argv(),
            vec![
                "exec",
                "edgex-security-proxy-setup",
                "./secrets-config",
                "proxy",
                "adduser",
                "--user",
                "u",
                "--tokenTTL",
                "60",
                "--jwtTTL",
                "119m",
                "--useRootToken"
            ]
        );
    }

    #[tokio::test]
    async fn test_generate_password_missing_fields() {
        let exec = Arc::new(RecordingExecutor::output("{}"));
        let (status, json) = get(app_with(exec), "/generate-password/u").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "User N/A created successfully.");
        assert_eq!(json["password"], "No password found");
    }

    #[tokio::test]
    async fn test_generate_password_invalid_json() {
        let exec = Arc::new(RecordingExecutor::output("user added, no json"));
        let (status, json) = get(app_with(exec), "/generate-password/u").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].is_string());
        assert_eq!(json["raw_output"], "user added, no json");
    }

    #[tokio::test]
    async fn test_generate_password_json_array_is_unexpected() {
        let exec = Arc::new(RecordingExecutor::output(r#"["alice","pw"]"#));
        let (status, json) = get(app_with(exec), "/generate-password/alice").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "unexpected_output");
        assert_eq!(json["raw_output"], r#"["alice","pw"]"#);
    }

    #[tokio::test]
    async fn test_generate_password_numeric_password() {
        let exec = Arc::new(RecordingExecutor::output(r#"{"username":"u","password":12345}"#));
        let (status, json) = get(app_with(exec), "/generate-password/u").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "User u created successfully.");
        assert_eq!(json["password"], "12345");
    }

    #[tokio::test]
    async fn test_generate_password_query_form() {
        let exec = Arc::new(RecordingExecutor::output(r#"{"username":"q","password":"pw"}"#));
        let (status, json) = get(app_with(exec), "/generate-password?username=q").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["password"], "pw");
    }

    #[tokio::test]
    async fn test_generate_password_query_missing() {
        let exec = Arc::new(RecordingExecutor::output("{}"));
        let (status, json) = get(app_with(exec.clone()), "/generate-password").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "bad_request");
        assert!(exec.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_api_key_success() {
        let exec = Arc::new(RecordingExecutor::output("id: 42\ntoken: xyz"));
        let (status, json) = get(app_with(exec.clone()), "/create-chirpstack-api-key/abc-1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({ "name": "abc-1", "result": { "id": "42", "token": "xyz" } })
        );
        assert_eq!(exec.calls().len(), 1);
        assert_eq!(exec.calls()[0].argv().last(), Some(&"abc-1"));
    }

    #[tokio::test]
    async fn test_create_api_key_invalid_name_not_executed() {
        let exec = Arc::new(RecordingExecutor::output("id: 42\ntoken: xyz"));

        for uri in [
            "/create-chirpstack-api-key/a%20b",
            "/create-chirpstack-api-key/%7Bname%7D",
            "/create-chirpstack-api-key?name=",
            "/create-chirpstack-api-key?name=%20%20",
        ] {
            let (status, json) = get(app_with(exec.clone()), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(json["error"], "not_found", "{uri}");
        }

        assert!(exec.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_api_key_unparseable_output() {
        let exec = Arc::new(RecordingExecutor::output("Error: permission denied"));
        let (status, json) = get(app_with(exec), "/create-chirpstack-api-key/abc").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["raw_output"], "Error: permission denied");
    }

    #[tokio::test]
    async fn test_tokens_order_and_duplicates() {
        let exec = Arc::new(RecordingExecutor::output(
            r#"{"root_token": "A"}
{"root_token": "B"}
{"root_token": "A"}"#,
        ));
        let (status, json) = get(app_with(exec), "/tokens").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "tokens": ["A", "B", "A"] }));
    }

    #[tokio::test]
    async fn test_tokens_none_found() {
        let exec = Arc::new(RecordingExecutor::output(r#"{"keys": []}"#));
        let (status, json) = get(app_with(exec), "/tokens").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "No root tokens found.");
    }

    #[tokio::test]
    async fn test_command_failure_is_500_on_every_endpoint() {
        for uri in [
            "/generate-password/u",
            "/create-chirpstack-api-key/abc",
            "/tokens",
        ] {
            let exec = Arc::new(RecordingExecutor::error("Error: No such container: x"));
            let (status, json) = get(app_with(exec), uri).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(json["message"], "Error: No such container: x", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_repeated_requests_same_shape() {
        let exec = Arc::new(RecordingExecutor::output("id: 1\ntoken: t"));
        let app = app_with(exec.clone());

        let first = get(app.clone(), "/create-chirpstack-api-key/k").await;
        let second = get(app, "/create-chirpstack-api-key/k").await;

        assert_eq!(first, second);
        assert_eq!(exec.calls().len(), 2);
    }
}
