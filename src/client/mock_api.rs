//! In-process stand-in for the Todoist REST API, served by axum.
//!
//! Records every request it receives, keeps task state in memory and can be
//! told to fail or stall so client error paths can be exercised.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header::AUTHORIZATION};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::client::TodoistClient;
use crate::config::Config;

pub(crate) const TEST_TOKEN: &str = "test-token";
const API_PREFIX: &str = "/rest/v2";

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub(crate) struct MockApi {
    tasks: Mutex<BTreeMap<String, Value>>,
    projects: Mutex<Vec<Value>>,
    labels: Mutex<Vec<Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
    forced: Mutex<Option<(StatusCode, String)>>,
    delay: Mutex<Option<Duration>>,
    next_id: AtomicU64,
}

type Shared = Arc<MockApi>;

impl MockApi {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }

    /// Answer every following request with `status` and `body`.
    pub fn force_status(&self, status: u16, body: &str) {
        *self.forced.lock().unwrap() = Some((
            StatusCode::from_u16(status).unwrap(),
            body.to_string(),
        ));
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn task(&self, id: &str) -> Option<Value> {
        self.tasks.lock().unwrap().get(id).cloned()
    }

    pub fn seed_task(&self, content: &str, extra: Value) -> String {
        let id = self.allocate_id();
        let mut task = task_json(&id, &json!({ "content": content }));
        merge(&mut task, &extra);
        self.tasks.lock().unwrap().insert(id.clone(), task);
        id
    }

    pub fn seed_project(&self, project: Value) {
        self.projects.lock().unwrap().push(project);
    }

    pub fn seed_label(&self, label: Value) {
        self.labels.lock().unwrap().push(label);
    }

    fn allocate_id(&self) -> String {
        (self.next_id.fetch_add(1, Ordering::SeqCst) + 1000).to_string()
    }
}

pub(crate) struct MockServer {
    pub url: String,
    pub api: Shared,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    /// Client pointed at this server with the accepted token.
    pub fn client(&self) -> TodoistClient {
        self.client_with_token(TEST_TOKEN)
    }

    pub fn client_with_token(&self, token: &str) -> TodoistClient {
        let config = Config::new(token)
            .unwrap()
            .with_base_url(&self.url)
            .unwrap()
            .with_timeout(Duration::from_secs(5));
        TodoistClient::new(&config).unwrap()
    }
}

/// Spawn the mock API on an ephemeral port.
pub(crate) async fn spawn() -> MockServer {
    let api: Shared = Arc::new(MockApi::default());

    let routes = Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).post(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/close", post(close_task))
        .route("/tasks/{id}/reopen", post(reopen_task))
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{id}", get(get_project))
        .route("/labels", get(list_labels).post(create_label));

    let app = Router::new()
        .nest(API_PREFIX, routes)
        .layer(middleware::from_fn_with_state(api.clone(), gatekeeper))
        .with_state(api.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let url = format!("http://{}{}", addr, API_PREFIX);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer {
        url,
        api,
        _handle: handle,
    }
}

/// Records the request, enforces the bearer token and applies forced
/// failures or delays.
async fn gatekeeper(State(api): State<Shared>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let authorization = header_str(&parts.headers);

    api.requests.lock().unwrap().push(RecordedRequest {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: authorization.clone(),
        body: serde_json::from_slice(&bytes).ok(),
    });

    let delay = *api.delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let forced = api.forced.lock().unwrap().clone();
    if let Some((status, body)) = forced {
        return (status, body).into_response();
    }

    if authorization.as_deref() != Some(&format!("Bearer {}", TEST_TOKEN)) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    let request = Request::from_parts(parts, axum::body::Body::from(bytes));
    next.run(request).await
}

fn header_str(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn merge(target: &mut Value, patch: &Value) {
    if let (Value::Object(target), Value::Object(patch)) = (target, patch) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn due_from(body: &Value) -> Option<Value> {
    if let Some(string) = body.get("due_string").and_then(Value::as_str) {
        return Some(json!({
            "date": "2026-10-18",
            "string": string,
            "is_recurring": string.starts_with("every"),
        }));
    }
    body.get("due_date")
        .and_then(Value::as_str)
        .map(|date| json!({ "date": date, "string": date, "is_recurring": false }))
}

fn task_json(id: &str, body: &Value) -> Value {
    json!({
        "id": id,
        "content": body["content"],
        "description": body.get("description").cloned().unwrap_or(json!("")),
        "project_id": body.get("project_id").cloned().unwrap_or(json!("inbox")),
        "section_id": null,
        "parent_id": body.get("parent_id").cloned().unwrap_or(Value::Null),
        "labels": body.get("labels").cloned().unwrap_or(json!([])),
        "priority": body.get("priority").cloned().unwrap_or(json!(1)),
        "due": due_from(body),
        "is_completed": false,
        "comment_count": 0,
        "created_at": "2026-10-17T09:00:00.000000Z",
        "url": format!("https://todoist.com/showTask?id={}", id),
    })
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Task not found").into_response()
}

async fn list_tasks(
    State(api): State<Shared>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Json<Vec<Value>> {
    let tasks = api.tasks.lock().unwrap();
    let items = tasks
        .values()
        .filter(|t| t["is_completed"] == json!(false))
        .filter(|t| {
            query
                .get("project_id")
                .is_none_or(|p| t["project_id"] == json!(p))
        })
        .filter(|t| {
            query.get("label").is_none_or(|l| {
                t["labels"]
                    .as_array()
                    .is_some_and(|labels| labels.contains(&json!(l)))
            })
        })
        .cloned()
        .collect();
    Json(items)
}

async fn create_task(State(api): State<Shared>, Json(body): Json<Value>) -> Response {
    if body.get("content").and_then(Value::as_str).is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Required argument is missing: content" })),
        )
            .into_response();
    }
    let id = api.allocate_id();
    let task = task_json(&id, &body);
    api.tasks.lock().unwrap().insert(id, task.clone());
    Json(task).into_response()
}

async fn get_task(State(api): State<Shared>, Path(id): Path<String>) -> Response {
    match api.task(&id) {
        Some(task) => Json(task).into_response(),
        None => not_found(),
    }
}

async fn update_task(
    State(api): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut tasks = api.tasks.lock().unwrap();
    let Some(task) = tasks.get_mut(&id) else {
        return not_found();
    };
    for key in ["content", "description", "priority", "labels"] {
        if let Some(value) = body.get(key) {
            task[key] = value.clone();
        }
    }
    if let Some(due) = due_from(&body) {
        task["due"] = due;
    }
    Json(task.clone()).into_response()
}

fn set_completed(api: &MockApi, id: &str, completed: bool) -> Response {
    let mut tasks = api.tasks.lock().unwrap();
    match tasks.get_mut(id) {
        Some(task) => {
            task["is_completed"] = json!(completed);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(),
    }
}

async fn close_task(State(api): State<Shared>, Path(id): Path<String>) -> Response {
    set_completed(&api, &id, true)
}

async fn reopen_task(State(api): State<Shared>, Path(id): Path<String>) -> Response {
    set_completed(&api, &id, false)
}

async fn delete_task(State(api): State<Shared>, Path(id): Path<String>) -> Response {
    match api.tasks.lock().unwrap().remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}

async fn list_projects(State(api): State<Shared>) -> Json<Vec<Value>> {
    Json(api.projects.lock().unwrap().clone())
}

async fn get_project(State(api): State<Shared>, Path(id): Path<String>) -> Response {
    let projects = api.projects.lock().unwrap();
    match projects.iter().find(|p| p["id"] == json!(id)) {
        Some(project) => Json(project.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "Project not found").into_response(),
    }
}

async fn create_project(State(api): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let id = api.allocate_id();
    let project = json!({
        "id": id,
        "name": body["name"],
        "parent_id": body.get("parent_id").cloned().unwrap_or(Value::Null),
        "color": body.get("color").cloned().unwrap_or(json!("charcoal")),
        "is_favorite": body.get("is_favorite").cloned().unwrap_or(json!(false)),
        "is_shared": false,
        "comment_count": 0,
        "url": format!("https://todoist.com/showProject?id={}", id),
    });
    api.projects.lock().unwrap().push(project.clone());
    Json(project)
}

async fn list_labels(State(api): State<Shared>) -> Json<Vec<Value>> {
    Json(api.labels.lock().unwrap().clone())
}

async fn create_label(State(api): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let id = api.allocate_id();
    let mut labels = api.labels.lock().unwrap();
    let label = json!({
        "id": id,
        "name": body["name"],
        "color": body.get("color").cloned().unwrap_or(json!("charcoal")),
        "is_favorite": body.get("is_favorite").cloned().unwrap_or(json!(false)),
        "order": labels.len() + 1,
    });
    labels.push(label.clone());
    Json(label)
}
