//! Client-side state container and its reconciliation rules.
//!
//! # Design
//! `TodoState` is a reducer: `dispatch` takes an `Action`, mutates the state
//! and returns the `Effect`s the host must carry out (HTTP requests to send,
//! banner timers to arm). It never performs I/O and never reads a clock, so
//! every transition is testable without a network or a renderer.
//!
//! Requests are tracked by `RequestId` while in flight. Overlapping
//! operations are allowed; their responses are applied in the order the host
//! reports them, so the last response to arrive wins.
//!
//! Reconciliation per operation:
//! - load replaces the cached collection wholesale and clears every
//!   divergence mark; on failure the previous collection stays.
//! - add appends the server's todo; on failure the collection is unchanged and
//!   the input text is kept for resubmission.
//! - toggle replaces the entry with the server's representation; on failure
//!   the flip is applied locally, the entry is marked unsynced and nothing is
//!   shown to the user.
//! - delete removes the entry before the request is sent and never rolls
//!   back; on failure a banner explains the divergence and expires after
//!   `BANNER_TTL`.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::client::TodoClient;
use crate::error::{ApiError, Cause, Operation};
use crate::filter::{Filter, Stats};
use crate::http::{HttpRequest, HttpResponse, Outcome};
use crate::types::{Todo, TodoId};

/// How long a delete-failure banner stays up.
pub const BANNER_TTL: Duration = Duration::from_millis(3000);

pub const MSG_EMPTY_INPUT: &str = "Please enter a todo item";
pub const MSG_CONNECTIVITY: &str = "Unable to connect to server. Make sure the backend is running.";
pub const MSG_CREATE_FAILED: &str = "Failed to add todo";
const MSG_DELETE_PREFIX: &str = "Note: Deleted locally only. Backend error: ";

/// Handle for an in-flight request, echoed back in `Action::Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

/// Identifies one banner so a timer armed for it cannot clear a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BannerId(u64);

/// User-facing error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// Blank input on add.
    Validation,
    /// Initial load or refresh failed.
    Connectivity,
    /// Create request failed.
    Create,
    /// Delete request failed after the entry was already removed.
    Delete,
}

/// Informational, non-blocking error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: BannerId,
    pub kind: BannerKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Fetch the full collection (initial load and refresh).
    Load,
    SetInput(String),
    /// Submit the current input as a new todo.
    Add,
    Toggle(TodoId),
    Delete(TodoId),
    SetFilter(Filter),
    /// The host finished executing the request issued as `request`.
    Resolved { request: RequestId, outcome: Outcome },
    /// The timer armed by `Effect::ExpireBanner` fired.
    BannerElapsed(BannerId),
}

/// Work the host must perform on behalf of the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Execute `http` and report back with `Action::Resolved { request, .. }`.
    Send { request: RequestId, http: HttpRequest },
    /// Dispatch `Action::BannerElapsed(banner)` once `after` has passed.
    ExpireBanner { banner: BannerId, after: Duration },
}

#[derive(Debug, Clone)]
enum Pending {
    Load,
    Create,
    Update { id: TodoId, completed: bool },
    Delete { id: TodoId },
}

#[derive(Debug)]
pub struct TodoState {
    client: TodoClient,
    todos: Vec<Todo>,
    unsynced: BTreeSet<TodoId>,
    input: String,
    filter: Filter,
    banner: Option<Banner>,
    loads: usize,
    in_flight: HashMap<RequestId, Pending>,
    next_request: u64,
    next_banner: u64,
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new(TodoClient::default())
    }
}

impl TodoState {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            todos: Vec::new(),
            unsynced: BTreeSet::new(),
            input: String::new(),
            filter: Filter::All,
            banner: None,
            loads: 0,
            in_flight: HashMap::new(),
            next_request: 0,
            next_banner: 0,
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Load => self.load(),
            Action::SetInput(text) => {
                self.input = text;
                Vec::new()
            }
            Action::Add => self.add(),
            Action::Toggle(id) => self.toggle(id),
            Action::Delete(id) => self.delete(id),
            Action::SetFilter(filter) => {
                self.filter = filter;
                Vec::new()
            }
            Action::Resolved { request, outcome } => self.resolve(request, outcome),
            Action::BannerElapsed(id) => {
                if self.banner.as_ref().is_some_and(|b| b.id == id) {
                    self.banner = None;
                }
                Vec::new()
            }
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    /// The cached collection in server order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// The cached collection restricted to the active filter.
    pub fn visible(&self) -> impl Iterator<Item = &Todo> + '_ {
        let filter = self.filter;
        self.todos.iter().filter(move |t| filter.matches(t))
    }

    pub fn stats(&self) -> Stats {
        Stats::from_todos(&self.todos)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.loads > 0
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// True when the cached entry reflects a local change the server never
    /// acknowledged. Cleared by the next successful load.
    pub fn is_unsynced(&self, id: TodoId) -> bool {
        self.unsynced.contains(&id)
    }

    pub fn unsynced(&self) -> impl Iterator<Item = TodoId> + '_ {
        self.unsynced.iter().copied()
    }

    /// Number of requests issued but not yet resolved.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn load(&mut self) -> Vec<Effect> {
        self.loads += 1;
        self.banner = None;
        let http = self.client.build_list_todos();
        vec![self.send(Pending::Load, http)]
    }

    fn add(&mut self) -> Vec<Effect> {
        if self.input.trim().is_empty() {
            self.show(BannerKind::Validation, MSG_EMPTY_INPUT);
            return Vec::new();
        }
        self.banner = None;
        match self.client.build_create_todo(&self.input) {
            Ok(http) => vec![self.send(Pending::Create, http)],
            Err(err) => {
                self.create_failed(&err);
                Vec::new()
            }
        }
    }

    fn toggle(&mut self, id: TodoId) -> Vec<Effect> {
        let Some(todo) = self.todos.iter().find(|t| t.id == id) else {
            warn!(%id, "toggle for todo not in cache ignored");
            return Vec::new();
        };
        let completed = !todo.completed;
        match self.client.build_update_todo(id, &todo.title, completed) {
            Ok(http) => vec![self.send(Pending::Update { id, completed }, http)],
            Err(err) => {
                self.toggle_locally(id, completed, &err);
                Vec::new()
            }
        }
    }

    fn delete(&mut self, id: TodoId) -> Vec<Effect> {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != id);
        self.unsynced.remove(&id);
        if self.todos.len() == before {
            debug!(%id, "deleting todo that is not in cache");
        }
        let http = self.client.build_delete_todo(id);
        vec![self.send(Pending::Delete { id }, http)]
    }

    fn resolve(&mut self, request: RequestId, outcome: Outcome) -> Vec<Effect> {
        let Some(pending) = self.in_flight.remove(&request) else {
            warn!(?request, "response for unknown request dropped");
            return Vec::new();
        };

        match pending {
            Pending::Load => {
                self.loads = self.loads.saturating_sub(1);
                match self.parse(Operation::List, outcome, TodoClient::parse_list_todos) {
                    Ok(todos) => {
                        debug!(count = todos.len(), "todos loaded");
                        self.todos = todos;
                        self.unsynced.clear();
                    }
                    Err(err) => {
                        error!(error = %err, "failed to load todos");
                        self.show(BannerKind::Connectivity, MSG_CONNECTIVITY);
                    }
                }
                Vec::new()
            }
            Pending::Create => {
                match self.parse(Operation::Create, outcome, TodoClient::parse_create_todo) {
                    Ok(todo) => {
                        debug!(id = %todo.id, "todo created");
                        match self.todos.iter().position(|t| t.id == todo.id) {
                            Some(idx) => self.todos[idx] = todo,
                            None => self.todos.push(todo),
                        }
                        self.input.clear();
                    }
                    Err(err) => self.create_failed(&err),
                }
                Vec::new()
            }
            Pending::Update { id, completed } => {
                match self.parse(Operation::Update, outcome, TodoClient::parse_update_todo) {
                    Ok(todo) => {
                        debug!(%id, completed = todo.completed, "todo updated");
                        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == id) {
                            *slot = todo;
                        }
                        self.unsynced.remove(&id);
                    }
                    Err(err) => self.toggle_locally(id, completed, &err),
                }
                Vec::new()
            }
            Pending::Delete { id } => {
                match self.parse(Operation::Delete, outcome, TodoClient::parse_delete_todo) {
                    Ok(()) => {
                        debug!(%id, "todo deleted");
                        Vec::new()
                    }
                    Err(err) => {
                        warn!(
                            %id,
                            status = ?err.status(),
                            body = err.body().unwrap_or_default(),
                            "delete failed, keeping local removal"
                        );
                        let message = format!("{MSG_DELETE_PREFIX}{}", delete_detail(&err));
                        let banner = self.show(BannerKind::Delete, message);
                        vec![Effect::ExpireBanner {
                            banner,
                            after: BANNER_TTL,
                        }]
                    }
                }
            }
        }
    }

    fn parse<T>(
        &self,
        op: Operation,
        outcome: Outcome,
        parse: impl FnOnce(&TodoClient, HttpResponse) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        match outcome {
            Ok(response) => parse(&self.client, response),
            Err(err) => Err(self.client.transport_failed(op, err)),
        }
    }

    fn send(&mut self, pending: Pending, http: HttpRequest) -> Effect {
        let request = RequestId(self.next_request);
        self.next_request += 1;
        debug!(?request, method = %http.method, path = %http.path, "request issued");
        self.in_flight.insert(request, pending);
        Effect::Send { request, http }
    }

    fn show(&mut self, kind: BannerKind, message: impl Into<String>) -> BannerId {
        let id = BannerId(self.next_banner);
        self.next_banner += 1;
        self.banner = Some(Banner {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    fn create_failed(&mut self, err: &ApiError) {
        error!(error = %err, "failed to add todo");
        self.show(BannerKind::Create, MSG_CREATE_FAILED);
    }

    fn toggle_locally(&mut self, id: TodoId, completed: bool, err: &ApiError) {
        warn!(%id, error = %err, "update failed, toggled locally");
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == id) {
            slot.completed = completed;
            self.unsynced.insert(id);
        }
    }
}

fn delete_detail(err: &ApiError) -> String {
    match err.cause() {
        Cause::Status { status, .. } => format!("Failed to delete ({status})"),
        Cause::Transport(msg) => msg.clone(),
        other => other.to_string(),
    }
}
