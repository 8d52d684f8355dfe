mod adapters;
mod app;
mod cli;
mod core;
mod global_constants;
mod presentation;

use std::process::ExitCode;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    log::info!("[MAIN] Starting {}", global_constants::APPLICATION_NAME);

    match dotenvy::dotenv() {
        Ok(path) => log::debug!("[MAIN] Loaded environment from {:?}", path),
        Err(error) if error.not_found() => log::debug!("[MAIN] No .env file found"),
        Err(error) => log::warn!("[MAIN] Failed to load .env file: {}", error),
    }

    let app = app::VitalsApp::build(&cli)?;
    app.run().await
}
