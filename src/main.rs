mod classify;
mod cmd;
mod config;
mod controller;
mod country;
mod debounce;
mod decoder;
mod display;
mod error;
mod query;
mod render;
mod repl;

use cmd::CommandLineArgs;
use config::{IniProfile, Settings, DEFAULT_INI_FILE_PATH};
use controller::{SearchController, Shown};
use debounce::debounce;
use display::{TerminalNotifier, TerminalSurface};
use query::CountryClient;

use anyhow::Result;
use colored::*;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

const LOG_ENV: &str = "FLAGLY_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let args = CommandLineArgs::parse();
    init_tracing(args.verbose());

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,flagly={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: CommandLineArgs) -> Result<ExitCode> {
    let profile = IniProfile::load(DEFAULT_INI_FILE_PATH, args.profile())?;
    let settings = Settings::resolve(&args, profile)?;
    tracing::debug!(?settings, "resolved settings");

    let client = Arc::new(CountryClient::new(&settings)?);
    let controller = SearchController::new(
        client,
        TerminalSurface::new(settings.page().cloned()),
        TerminalNotifier,
    );

    // A name on the command line is a single settled value; nothing to debounce.
    if let Some(name) = args.name() {
        let (tx, rx) = mpsc::channel(1);
        tx.send(name.to_string()).await?;
        drop(tx);

        let controller = controller.run(rx).await;
        return Ok(match controller.last_shown() {
            Some(Shown::Failure) => ExitCode::FAILURE,
            _ => ExitCode::SUCCESS,
        });
    }

    let (tx, rx) = mpsc::channel(16);
    let reader = repl::spawn_reader(tx);
    let (settled, gate) = debounce(rx, settings.delay());

    let controller = controller.run(settled).await;
    tracing::debug!(state = ?controller.state(), "session finished");
    gate.await?;
    reader.await??;

    Ok(ExitCode::SUCCESS)
}
