//! Tests for the Streamable HTTP transport

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::client::mock_api::{self, MockServer};
use crate::mcp::mcp_router;

const SESSION_HEADER: &str = "mcp-session-id";

/// Serve the MCP router on an ephemeral port and return its base URL.
async fn spawn_mcp_with_mock(ct: CancellationToken) -> (String, MockServer) {
    let mock = mock_api::spawn().await;
    let app = mcp_router(mock.client(), ct);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), mock)
}

async fn spawn_mcp(ct: CancellationToken) -> String {
    spawn_mcp_with_mock(ct).await.0
}

fn initialize_request() -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2025-03-26",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "0.0.0" }
        }
    })
}

async fn post(
    http: &reqwest::Client,
    url: &str,
    session: Option<&str>,
    body: &Value,
) -> reqwest::Response {
    let mut request = http
        .post(format!("{}/mcp", url))
        .header("Accept", "application/json, text/event-stream")
        .json(body);
    if let Some(session) = session {
        request = request.header(SESSION_HEADER, session);
    }
    request.send().await.unwrap()
}

/// Find the JSON-RPC message answering `id` in a JSON or SSE body.
fn find_response(body: &str, id: i64) -> Value {
    let candidates = body
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .chain(std::iter::once(body.trim()));
    candidates
        .filter_map(|data| serde_json::from_str::<Value>(data).ok())
        .find(|message| message["id"] == json!(id))
        .unwrap_or_else(|| panic!("no response with id {} in body: {}", id, body))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_only_mcp_path_is_mounted() {
    let ct = CancellationToken::new();
    let url = spawn_mcp(ct.clone()).await;

    let response = reqwest::get(format!("{}/", url)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = reqwest::get(format!("{}/mcp", url)).await.unwrap();
    assert_ne!(
        response.status(),
        StatusCode::NOT_FOUND,
        "MCP service should be mounted and responding"
    );
    ct.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_initialize_opens_session() {
    let ct = CancellationToken::new();
    let url = spawn_mcp(ct.clone()).await;

    let response = post(&reqwest::Client::new(), &url, None, &initialize_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().contains_key("mcp-session-id"),
        "stateful mode should assign a session id"
    );
    ct.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tools_call_with_bad_arguments_is_an_error_result() {
    let ct = CancellationToken::new();
    let (url, mock) = spawn_mcp_with_mock(ct.clone()).await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    let response = post(&http, &url, None, &initialize_request()).await;
    let session = response
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("session id");
    let body = response.text().await.unwrap();
    assert!(find_response(&body, 1)["result"]["capabilities"]["tools"].is_object());

    let initialized = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
    let response = post(&http, &url, Some(&session), &initialized).await;
    assert!(response.status().is_success());

    let call = json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/call",
        "params": { "name": "todoist_create_task", "arguments": {} }
    });
    let response = post(&http, &url, Some(&session), &call).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();

    let message = find_response(&body, 2);
    assert!(message.get("error").is_none(), "protocol error: {}", message);
    assert_eq!(message["result"]["isError"], true);
    let text = message["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("missing field `content`"), "{}", text);
    assert_eq!(mock.api.request_count(), 0);

    ct.cancel();
}
