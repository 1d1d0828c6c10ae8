use std::io::IsTerminal;

use clap::Parser;
use todo_cli::{App, Config, UreqTransport};
use todo_core::TodoClient;
use tracing_subscriber::EnvFilter;

fn main() -> std::io::Result<()> {
    let config = Config::parse();

    let use_ansi = !config.no_color && std::io::stderr().is_terminal();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .init();

    let app = App::new(TodoClient::new(&config.api_url), UreqTransport::default());
    app.run(&mut std::io::stdout())
}
