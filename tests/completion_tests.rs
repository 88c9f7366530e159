//! The chat-completion client against a fake endpoint on the loopback interface.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assumption_validator::services::{
    CompletionClient, CompletionError, CompletionSettings, OpenAiClient,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

async fn spawn_endpoint(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

fn settings(base_url: String, timeout: Duration) -> CompletionSettings {
    CompletionSettings {
        api_key: "sk-test".to_string(),
        base_url,
        model: "gpt-4o-mini".to_string(),
        temperature: 0.3,
        timeout,
    }
}

async fn client_for(response: fn() -> Response) -> OpenAiClient {
    let router = Router::new().route("/v1/chat/completions", post(move || async move { response() }));
    let base_url = spawn_endpoint(router).await;
    OpenAiClient::new(settings(base_url, Duration::from_secs(5))).unwrap()
}

#[tokio::test]
async fn returns_first_choice_content_and_sends_expected_request() {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));

    async fn record(
        State(seen): State<Seen>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        seen.lock().unwrap().push((auth, body));
        Json(json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "## Explicit Assumptions\n- stable demand" } },
                { "index": 1, "message": { "role": "assistant", "content": "second choice" } }
            ]
        }))
    }

    let router = Router::new()
        .route("/v1/chat/completions", post(record))
        .with_state(seen.clone());
    let base_url = spawn_endpoint(router).await;
    let client = OpenAiClient::new(settings(format!("{}/", base_url), Duration::from_secs(5))).unwrap();

    let report = client.complete("Analyze this").await.unwrap();

    assert_eq!(report, "## Explicit Assumptions\n- stable demand");
    assert_eq!(client.model(), "gpt-4o-mini");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "gpt-4o-mini");
    assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "Analyze this");
}

#[tokio::test]
async fn unauthorized_status_maps_to_unauthorized() {
    let client = client_for(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "message": "Incorrect API key provided" } })),
        )
            .into_response()
    })
    .await;

    assert_eq!(client.complete("p").await.unwrap_err(), CompletionError::Unauthorized);
}

#[tokio::test]
async fn too_many_requests_maps_to_quota_exceeded() {
    let client = client_for(|| {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": { "message": "You exceeded your current quota" } })),
        )
            .into_response()
    })
    .await;

    assert_eq!(client.complete("p").await.unwrap_err(), CompletionError::QuotaExceeded);
}

#[tokio::test]
async fn other_error_status_carries_api_message() {
    let client = client_for(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": { "message": "The engine is currently overloaded" } })),
        )
            .into_response()
    })
    .await;

    assert_eq!(
        client.complete("p").await.unwrap_err(),
        CompletionError::Api {
            status: 503,
            message: "The engine is currently overloaded".to_string(),
        }
    );
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let client = client_for(|| (StatusCode::OK, "<html>gateway</html>").into_response()).await;

    assert!(matches!(
        client.complete("p").await.unwrap_err(),
        CompletionError::MalformedResponse(_)
    ));
}

#[tokio::test]
async fn empty_choices_is_malformed() {
    let client = client_for(|| Json(json!({ "choices": [] })).into_response()).await;

    assert_eq!(
        client.complete("p").await.unwrap_err(),
        CompletionError::MalformedResponse("no choices returned".to_string())
    );
}

#[tokio::test]
async fn null_content_is_malformed() {
    let client = client_for(|| {
        Json(json!({ "choices": [ { "message": { "role": "assistant", "content": null } } ] }))
            .into_response()
    })
    .await;

    assert_eq!(
        client.complete("p").await.unwrap_err(),
        CompletionError::MalformedResponse("first choice has no content".to_string())
    );
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "choices": [] }))
        }),
    );
    let base_url = spawn_endpoint(router).await;
    let client = OpenAiClient::new(settings(base_url, Duration::from_millis(200))).unwrap();

    assert_eq!(client.complete("p").await.unwrap_err(), CompletionError::Timeout);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = OpenAiClient::new(settings(format!("http://{}/v1", addr), Duration::from_secs(5))).unwrap();

    assert!(matches!(
        client.complete("p").await.unwrap_err(),
        CompletionError::Transport(_)
    ));
}
