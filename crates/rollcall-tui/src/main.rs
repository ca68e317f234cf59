//! `rollcall` — terminal client for a school activity sign-up service.
//!
//! Built on [ratatui](https://ratatui.rs) against the `rollcall-api`
//! client crate. Two screens, navigable via number keys: the full
//! activity roster (with signup and withdraw) and a per-student
//! membership lookup.
//!
//! The server is authoritative: the client re-fetches the catalog
//! after every successful mutation and never patches its own snapshot.
//!
//! Logs are written to a file (default `/tmp/rollcall.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and
//! app launch.

mod action;
mod app;
mod component;
mod config;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use rollcall_api::{ActivitiesClient, TransportConfig};

use crate::app::App;

/// Terminal client for browsing and signing up for school activities.
#[derive(Parser, Debug)]
#[command(name = "rollcall", version, about)]
struct Cli {
    /// Sign-up service URL (e.g., http://localhost:8000)
    #[arg(short = 'u', long, env = "ROLLCALL_URL")]
    url: Option<String>,

    /// Log file path (defaults to /tmp/rollcall.log)
    #[arg(long, default_value = "/tmp/rollcall.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("rollcall={log_level},rollcall_api={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("rollcall.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    // Priority: CLI flag > environment > config file > default
    let cfg = config::load_or_default();
    let url_str = cli.url.as_deref().unwrap_or(&cfg.server_url);
    let url: Url = url_str
        .parse()
        .wrap_err_with(|| format!("invalid sign-up service URL: {url_str}"))?;

    info!(url = %url, "starting rollcall");

    let transport = TransportConfig {
        timeout: Duration::from_secs(cfg.timeout_secs),
    };
    let client = ActivitiesClient::new(url, &transport)?;

    let mut app = App::new(client);
    app.run().await?;

    Ok(())
}
