pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod event;
pub mod search;
pub mod ui;

use app::App;
use clap::Parser;
use cli::{Cli, CliCommand};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Initialize tracing (logs to stderr if RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url.as_deref();

    match cli.command {
        // No subcommand or explicit `tui` → launch the interactive TUI.
        None | Some(CliCommand::Tui) => run_tui(api_url).await,
        // All other subcommands → non-interactive JSONL output.
        Some(cmd) => cli::run_command(cmd, api_url).await,
    }
}

/// Launch the interactive TUI.
async fn run_tui(api_url: Option<&str>) -> color_eyre::Result<()> {
    // Resolve config before taking over the terminal so errors print cleanly.
    let (client, config) = cli::build_api_client(api_url)?;

    let terminal = ratatui::init();
    let result = App::new(config, client).run(terminal).await;
    ratatui::restore();
    result
}
