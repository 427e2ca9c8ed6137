//! In-process stand-in for the to-do backend, plus a driver that runs the
//! controller's requests to completion.

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    routing::{get, put},
    Json, Router,
};
use reqwest::Url;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use todo_client::{
    api::{HttpTodoApi, TodoApi},
    app::App,
    requests::execute,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Store {
    log: Vec<Recorded>,
    users: Vec<Value>,
    tasks: Vec<Value>,
    next_id: u32,
    reject_tasks: Option<(StatusCode, Value)>,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    store: Arc<Mutex<Store>>,
}

impl FakeBackend {
    pub fn with_user(self, id: u32, username: &str) -> Self {
        {
            let mut store = self.store.lock().unwrap();
            store.users.push(json!({
                "id": id,
                "username": username,
                "email": format!("{username}@example.test"),
            }));
            store.next_id = store.next_id.max(id);
        }
        self
    }

    pub fn with_task(self, title: &str, priority: &str) -> Self {
        {
            let mut store = self.store.lock().unwrap();
            store.next_id += 1;
            let id = store.next_id;
            store.tasks.push(json!({
                "id": id,
                "title": title,
                "description": null,
                "is_completed": false,
                "created_at": "2024-03-01T10:00:00",
                "author": null,
                "priority": priority,
            }));
        }
        self
    }

    pub fn rejecting_tasks(self, status: StatusCode, body: Value) -> Self {
        self.store.lock().unwrap().reject_tasks = Some((status, body));
        self
    }

    pub fn log(&self) -> Vec<Recorded> {
        self.store.lock().unwrap().log.clone()
    }

    pub fn clear_log(&self) {
        self.store.lock().unwrap().log.clear();
    }

    fn record(&self, method: Method, path: String, body: Option<Value>) {
        self.store.lock().unwrap().log.push(Recorded { method, path, body });
    }

    /// Serves on an ephemeral port and returns its base URL.
    pub async fn spawn(self) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new()
            .route("/tasks", get(list_tasks).post(create_task))
            .route("/users", get(list_users).post(create_user))
            .route("/tasks/{id}", put(update_task).delete(delete_task))
            .with_state(self);
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}")).unwrap()
    }
}

async fn list_tasks(State(backend): State<FakeBackend>) -> Json<Value> {
    backend.record(Method::GET, "/tasks".to_string(), None);
    Json(Value::Array(backend.store.lock().unwrap().tasks.clone()))
}

async fn list_users(State(backend): State<FakeBackend>) -> Json<Value> {
    backend.record(Method::GET, "/users".to_string(), None);
    Json(Value::Array(backend.store.lock().unwrap().users.clone()))
}

async fn create_task(
    State(backend): State<FakeBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.record(Method::POST, "/tasks".to_string(), Some(body.clone()));
    let mut store = backend.store.lock().unwrap();
    if let Some((status, reply)) = store.reject_tasks.clone() {
        return (status, Json(reply));
    }
    let author = store
        .users
        .iter()
        .find(|user| user["id"] == body["author_id"])
        .map(|user| user["username"].clone())
        .unwrap_or(Value::Null);
    store.next_id += 1;
    let task = json!({
        "id": store.next_id,
        "title": body["title"],
        "description": body["description"],
        "is_completed": false,
        "created_at": "2024-03-01T10:00:00",
        "author": author,
        "priority": body["priority"],
    });
    store.tasks.push(task.clone());
    (StatusCode::CREATED, Json(task))
}

async fn create_user(
    State(backend): State<FakeBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.record(Method::POST, "/users".to_string(), Some(body.clone()));
    let mut store = backend.store.lock().unwrap();
    store.next_id += 1;
    let user = json!({
        "id": store.next_id,
        "username": body["username"],
        "email": body["email"],
    });
    store.users.push(user.clone());
    (StatusCode::CREATED, Json(user))
}

async fn update_task(
    State(backend): State<FakeBackend>,
    Path(id): Path<u32>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.record(Method::PUT, format!("/tasks/{id}"), Some(body.clone()));
    let mut store = backend.store.lock().unwrap();
    let Some(task) = store.tasks.iter_mut().find(|task| task["id"] == id) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Task not found" })));
    };
    for field in ["title", "description", "is_completed"] {
        if let Some(value) = body.get(field) {
            task[field] = value.clone();
        }
    }
    (StatusCode::OK, Json(json!({ "message": "Task updated successfully" })))
}

async fn delete_task(
    State(backend): State<FakeBackend>,
    Path(id): Path<u32>,
) -> (StatusCode, Json<Value>) {
    backend.record(Method::DELETE, format!("/tasks/{id}"), None);
    let mut store = backend.store.lock().unwrap();
    let before = store.tasks.len();
    store.tasks.retain(|task| task["id"] != id);
    if store.tasks.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Task not found" })));
    }
    (StatusCode::OK, Json(json!({ "message": "Task deleted successfully" })))
}

pub fn client(base: Url) -> HttpTodoApi {
    HttpTodoApi::new(base).unwrap()
}

/// Runs queued requests one at a time, applying each response, until the
/// controller stops asking for more.
pub async fn settle(app: &mut App, api: &dyn TodoApi) {
    loop {
        let requests = app.take_requests();
        if requests.is_empty() {
            return;
        }
        for request in requests {
            let response = execute(api, request).await;
            app.apply(response);
        }
    }
}
