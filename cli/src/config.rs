//! Command-line and environment configuration.

use clap::Parser;
use todo_core::DEFAULT_BASE_URL;

/// Terminal client for the todo service.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo", version, about)]
pub struct Config {
    /// Base address of the todo backend.
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Disable ANSI colors in log output.
    #[arg(long)]
    pub no_color: bool,
}
