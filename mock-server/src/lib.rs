use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub content: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Default)]
pub struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Todo>,
}

pub type Db = Arc<RwLock<Table>>;

type ApiError = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Table::default()));
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/config", get(config))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!("todo mock server listening on {addr}");
    }
    axum::serve(listener, app()).await
}

fn not_found() -> ApiError {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Todo not found"})))
}

fn unprocessable(rejection: JsonRejection) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"detail": rejection.body_text()})),
    )
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

async fn root() -> Json<Value> {
    Json(json!({"message": "Todo API is running!"}))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "message": "API is running"}))
}

async fn config() -> Json<Value> {
    let protocol = env_or("BACKEND_PROTOCOL", "http");
    let host = env_or("BACKEND_HOST", "localhost");
    let port = env_or("BACKEND_PORT", "8000");
    Json(json!({
        "apiBaseUrl": format!("{protocol}://{host}:{port}"),
        "environment": env_or("ENVIRONMENT", "development"),
        "version": "1.0.0",
    }))
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let table = db.read().await;
    Json(table.rows.values().cloned().collect())
}

async fn create_todo(
    State(db): State<Db>,
    input: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Json(input) = input.map_err(unprocessable)?;
    let mut table = db.write().await;
    table.next_id += 1;
    let todo = Todo {
        id: table.next_id,
        title: input.title,
        content: input.content,
        completed: false,
        created_at: Utc::now(),
        updated_at: None,
    };
    table.rows.insert(todo.id, todo.clone());
    Ok(Json(todo))
}

async fn get_todo(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Todo>, ApiError> {
    let table = db.read().await;
    table.rows.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    input: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Json(input) = input.map_err(unprocessable)?;
    let mut table = db.write().await;
    let todo = table.rows.get_mut(&id).ok_or_else(not_found)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(content) = input.content {
        todo.content = Some(content);
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    todo.updated_at = Some(Utc::now());
    Ok(Json(todo.clone()))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Value>, ApiError> {
    let mut table = db.write().await;
    table
        .rows
        .remove(&id)
        .map(|_| Json(json!({"message": "Todo deleted successfully"})))
        .ok_or_else(not_found)
}
