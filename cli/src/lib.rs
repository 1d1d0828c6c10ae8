//! Terminal front end for the todo service.
//!
//! Hosts a `todo_core::TodoState`: parses typed commands into actions,
//! executes the effects it returns (HTTP over ureq, banner timers) and
//! renders the result as text after every event.

pub mod app;
pub mod command;
pub mod config;
pub mod transport;
pub mod view;

pub use app::{App, Event, Flow};
pub use command::{Command, CommandError};
pub use config::Config;
pub use transport::{Transport, UreqTransport};
