//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The host executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, Cause, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, TransportError};
use crate::types::{NewTodo, Todo, TodoId, TodoUpdate};

/// Address of the backend when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl Default for TodoClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// New todos are always submitted with `completed = false`. Rejecting a
    /// blank title is the caller's job.
    pub fn build_create_todo(&self, title: &str) -> Result<HttpRequest, ApiError> {
        let input = NewTodo {
            title: title.to_string(),
            completed: false,
        };
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todos", self.base_url),
            headers: json_headers(),
            body: Some(to_body(Operation::Create, &input)?),
        })
    }

    pub fn build_update_todo(
        &self,
        id: TodoId,
        title: &str,
        completed: bool,
    ) -> Result<HttpRequest, ApiError> {
        let input = TodoUpdate {
            title: title.to_string(),
            completed,
        };
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/todos/{id}", self.base_url),
            headers: json_headers(),
            body: Some(to_body(Operation::Update, &input)?),
        })
    }

    pub fn build_delete_todo(&self, id: TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/todos/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(Operation::List, &response)?;
        from_body(Operation::List, &response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(Operation::Create, &response)?;
        from_body(Operation::Create, &response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(Operation::Update, &response)?;
        from_body(Operation::Update, &response)
    }

    /// Any 2xx acknowledges the delete; the body is ignored.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(Operation::Delete, &response)
    }

    /// Map a request that never got a response onto the operation's error.
    pub fn transport_failed(&self, op: Operation, err: TransportError) -> ApiError {
        op.fail(Cause::Transport(err.0))
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn to_body<T: Serialize>(op: Operation, value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| op.fail(Cause::Serialization(e.to_string())))
}

fn from_body<T: DeserializeOwned>(op: Operation, response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| op.fail(Cause::Deserialization(e.to_string())))
}

/// Map non-2xx status codes to the operation's error variant.
fn check_status(op: Operation, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(op.fail(Cause::Status {
        status: response.status,
        body: response.body.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:8000")
    }

    #[test]
    fn default_client_targets_local_backend() {
        let req = TodoClient::default().build_list_todos();
        assert_eq!(req.path, "http://127.0.0.1:8000/todos");
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8000/todos");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_todo_sends_completed_false() {
        let req = client().build_create_todo("Buy milk").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/todos");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["completed"], false);
    }

    #[test]
    fn build_update_todo_sends_full_representation() {
        let req = client().build_update_todo(TodoId(3), "Walk dog", true).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:8000/todos/3");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Walk dog", "completed": true}));
    }

    #[test]
    fn build_delete_todo_produces_correct_request() {
        let req = client().build_delete_todo(TodoId(9));
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:8000/todos/9");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_todos_success() {
        let response = HttpResponse::json(200, r#"[{"id":1,"title":"A","completed":false}]"#);
        let todos = client().parse_list_todos(response).unwrap();
        assert_eq!(
            todos,
            vec![Todo {
                id: TodoId(1),
                title: "A".to_string(),
                completed: false,
            }]
        );
    }

    #[test]
    fn parse_list_todos_server_error_is_fetch_failed() {
        let response = HttpResponse::json(503, "unavailable");
        let err = client().parse_list_todos(response).unwrap_err();
        assert!(matches!(err, ApiError::FetchFailed(Cause::Status { status: 503, .. })));
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let response = HttpResponse::json(200, "not json");
        let err = client().parse_list_todos(response).unwrap_err();
        assert!(matches!(err, ApiError::FetchFailed(Cause::Deserialization(_))));
    }

    #[test]
    fn parse_create_todo_accepts_200_and_201() {
        let body = r#"{"id":2,"title":"B","completed":false}"#;
        assert_eq!(client().parse_create_todo(HttpResponse::json(200, body)).unwrap().id, TodoId(2));
        assert_eq!(client().parse_create_todo(HttpResponse::json(201, body)).unwrap().id, TodoId(2));
    }

    #[test]
    fn parse_create_todo_wrong_status() {
        let response = HttpResponse::json(500, "internal error");
        let err = client().parse_create_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::CreateFailed(Cause::Status { status: 500, .. })));
    }

    #[test]
    fn parse_update_todo_success() {
        let response = HttpResponse::json(200, r#"{"id":1,"title":"Updated","completed":true}"#);
        let todo = client().parse_update_todo(response).unwrap();
        assert_eq!(todo.title, "Updated");
        assert!(todo.completed);
    }

    #[test]
    fn parse_update_todo_not_found() {
        let response = HttpResponse::json(404, r#"{"detail":"Todo not found"}"#);
        let err = client().parse_update_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::UpdateFailed(_)));
        assert!(err.is_not_found());
    }

    #[test]
    fn parse_delete_todo_ignores_body() {
        let with_body = HttpResponse::json(200, r#"{"message":"Todo deleted successfully"}"#);
        assert!(client().parse_delete_todo(with_body).is_ok());
        assert!(client().parse_delete_todo(HttpResponse::with_status(204)).is_ok());
    }

    #[test]
    fn parse_delete_todo_keeps_status_and_body() {
        let response = HttpResponse::json(500, "database locked");
        let err = client().parse_delete_todo(response).unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), Some("database locked"));
    }

    #[test]
    fn transport_failure_maps_to_operation() {
        let err = client().transport_failed(Operation::Update, TransportError::new("connection refused"));
        assert_eq!(err, ApiError::UpdateFailed(Cause::Transport("connection refused".to_string())));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:8000/");
        let req = client.build_list_todos();
        assert_eq!(req.path, "http://localhost:8000/todos");
    }
}
