mod cli;

use std::io::Write as _;
use std::process::ExitCode;

use anyhow::Result;
use chatcal::client::GenerateClient;
use chatcal::config;
use chatcal::session::runner::Session;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();

    let config = config::load(&std::env::current_dir()?)?;
    let mut session = Session::new(GenerateClient::new(&config), config.tz()?);

    // Ctrl+C stops reading the stream; nothing partial is printed.
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let outcome = session.parse_event(&cli.input, &cancel).await;
    let mut stdout = std::io::stdout().lock();
    match outcome {
        Ok(Some(block)) => {
            writeln!(stdout, "{}", block.trim_end())?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => Ok(ExitCode::FAILURE),
        Err(e) => {
            error!(error = %e, "event extraction failed");
            writeln!(stdout, "Error parsing event: {e}")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Log to stderr so stdout carries only the event block.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
