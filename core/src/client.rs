//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.
//!
//! Any 2xx status is a success. For other statuses the body is searched for
//! a `detail` string (the backend's error payload); when that is missing the
//! message falls back to `HTTP error, status <code>`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{BackendConfig, CreateTodo, HealthStatus, TodoRecord, UpdateTodo};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    /// An empty `base_url` produces relative paths, for clients served from
    /// the same origin as the API.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/todos")
    }

    pub fn build_get_todo(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/todos/{id}"))
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.request_with_body(HttpMethod::Post, "/todos", input)
    }

    pub fn build_update_todo(&self, id: i64, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        self.request_with_body(HttpMethod::Put, &format!("/todos/{id}"), input)
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/todos/{id}"))
    }

    pub fn build_health(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/health")
    }

    pub fn build_backend_config(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/config")
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<TodoRecord>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<TodoRecord, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<TodoRecord, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<TodoRecord, ApiError> {
        parse_json(response)
    }

    /// The success body (empty or a confirmation message) is ignored.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_health(&self, response: HttpResponse) -> Result<HealthStatus, ApiError> {
        parse_json(response)
    }

    pub fn parse_backend_config(&self, response: HttpResponse) -> Result<BackendConfig, ApiError> {
        parse_json(response)
    }

    fn request(&self, method: HttpMethod, endpoint: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{endpoint}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn request_with_body<B: Serialize>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{endpoint}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = error_detail(&response.body)
        .unwrap_or_else(|| format!("HTTP error, status {}", response.status));
    if response.status == 404 {
        return Err(ApiError::NotFound(message));
    }
    Err(ApiError::Http {
        status: response.status,
        message,
    })
}

/// Pull the `detail` string out of an error payload, if there is one.
fn error_detail(body: &str) -> Option<String> {
    let payload: serde_json::Value = serde_json::from_str(body).ok()?;
    payload
        .get("detail")?
        .as_str()
        .map(str::trim)
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:8000")
    }

    const RECORD: &str = r#"{"id":1,"title":"Test","content":null,"completed":false,"created_at":"2024-01-05T15:04:00"}"#;

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8000/todos");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = CreateTodo {
            title: "Buy milk".to_string(),
            content: Some("**2 litres**".to_string()),
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/todos");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["content"], "**2 litres**");
    }

    #[test]
    fn build_update_todo_sends_only_present_fields() {
        let req = client().build_update_todo(7, &UpdateTodo::completed(true)).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:8000/todos/7");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"completed": true}));
    }

    #[test]
    fn build_delete_todo_has_no_body_or_headers() {
        let req = client().build_delete_todo(7);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:8000/todos/7");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn empty_base_url_gives_relative_paths() {
        let client = TodoClient::new("");
        assert_eq!(client.build_list_todos().path, "/todos");
        assert_eq!(client.build_health().path, "/health");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:8000/");
        assert_eq!(client.build_list_todos().path, "http://localhost:8000/todos");
    }

    #[test]
    fn parse_list_todos_success() {
        let todos = client()
            .parse_list_todos(HttpResponse::new(200, format!("[{RECORD}]")))
            .unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "Test");
    }

    #[test]
    fn parse_create_accepts_200_and_201() {
        assert!(client().parse_create_todo(HttpResponse::new(200, RECORD)).is_ok());
        assert!(client().parse_create_todo(HttpResponse::new(201, RECORD)).is_ok());
    }

    #[test]
    fn error_detail_becomes_message() {
        let err = client()
            .parse_update_todo(HttpResponse::new(404, r#"{"detail":"Todo not found"}"#))
            .unwrap_err();
        assert_eq!(err, ApiError::NotFound("Todo not found".to_string()));
    }

    #[test]
    fn missing_detail_falls_back_to_status_message() {
        let err = client()
            .parse_create_todo(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 500,
                message: "HTTP error, status 500".to_string()
            }
        );
    }

    #[test]
    fn non_string_detail_falls_back() {
        let err = client()
            .parse_create_todo(HttpResponse::new(
                422,
                r#"{"detail":[{"loc":["body","title"],"msg":"field required"}]}"#,
            ))
            .unwrap_err();
        assert_eq!(err.message(), "HTTP error, status 422");
    }

    #[test]
    fn parse_delete_ignores_confirmation_body() {
        let ok = HttpResponse::new(200, r#"{"message":"Todo deleted successfully"}"#);
        assert!(client().parse_delete_todo(ok).is_ok());
        assert!(client().parse_delete_todo(HttpResponse::new(204, "")).is_ok());
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client()
            .parse_list_todos(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_health_and_config() {
        let health = client()
            .parse_health(HttpResponse::new(
                200,
                r#"{"status":"healthy","message":"API is running"}"#,
            ))
            .unwrap();
        assert_eq!(health.status, "healthy");

        let config = client()
            .parse_backend_config(HttpResponse::new(
                200,
                r#"{"apiBaseUrl":"http://api:8000","environment":"production","version":"1.0.0"}"#,
            ))
            .unwrap();
        assert_eq!(config.environment, "production");
    }
}
