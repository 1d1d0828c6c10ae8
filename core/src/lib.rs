//! Sans-IO client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and keeps the client-side
//! mirror of the server's collection in a reducer-style `TodoState`.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each remote operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `TodoState::dispatch` turns user actions and reported responses into
//!   state transitions plus `Effect`s for the host to execute.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod filter;
pub mod http;
pub mod state;
pub mod types;

pub use client::{TodoClient, DEFAULT_BASE_URL};
pub use error::{ApiError, Cause, Operation};
pub use filter::{Filter, Stats};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Outcome, TransportError};
pub use state::{Action, Banner, BannerId, BannerKind, Effect, RequestId, TodoState, BANNER_TTL};
pub use types::{NewTodo, Todo, TodoId, TodoUpdate};
