use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Full replace: both fields are required.
#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: String,
    pub completed: bool,
}

/// In-memory collection. Insertion order is the list order; ids come from a
/// counter and are never reused.
#[derive(Debug)]
pub struct Store {
    todos: Vec<Todo>,
    next_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            todos: Vec::new(),
            next_id: 1,
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

type NotFound = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/", get(read_root))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "todo backend listening");
    }
    axum::serve(listener, app()).await
}

fn not_found() -> NotFound {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Todo not found" })))
}

async fn read_root() -> Json<Value> {
    Json(json!({ "message": "Welcome to FastAPI Todo App!" }))
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    Json(store.todos.clone())
}

async fn create_todo(State(db): State<Db>, Json(input): Json<CreateTodo>) -> Json<Todo> {
    let mut store = db.write().await;
    let todo = Todo {
        id: store.next_id,
        title: input.title,
        completed: input.completed,
    };
    store.next_id += 1;
    store.todos.push(todo.clone());
    debug!(id = todo.id, "todo created");
    Json(todo)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, NotFound> {
    let mut store = db.write().await;
    let todo = store.todos.iter_mut().find(|t| t.id == id).ok_or_else(not_found)?;
    todo.title = input.title;
    todo.completed = input.completed;
    debug!(id, completed = todo.completed, "todo replaced");
    Ok(Json(todo.clone()))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>, NotFound> {
    let mut store = db.write().await;
    let idx = store.todos.iter().position(|t| t.id == id).ok_or_else(not_found)?;
    let deleted = store.todos.remove(idx);
    debug!(id, "todo deleted");
    Ok(Json(json!({
        "message": "Todo deleted successfully",
        "deleted": deleted,
    })))
}
