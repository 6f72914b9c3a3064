mod command;
mod config;
mod error;

use command::Command;
use config::Config;
use error::CliError;
use log::{debug, info, LevelFilter};
use phil_address_client::{PhilAddressClient, SurfTransport};
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

fn init_logging(config: &Config) -> Result<(), CliError> {
    let level = LevelFilter::from_str(&config.log_level)
        .map_err(|_| CliError::LogLevel(config.log_level.clone()))?;
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

async fn run() -> Result<(), CliError> {
    let config = Config::load()?;
    init_logging(&config)?;
    debug!("Loaded configuration: {:?}", config);

    let command = Command::parse(std::env::args().skip(1))?;
    let client = PhilAddressClient::with_transport(
        config.base_url.clone(),
        Arc::new(SurfTransport::new()),
        config.client_config(),
    );

    let output = command.run(&client).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    let stats = client.cache_stats();
    info!(
        "Cache: {} collections cached, {} requests pending",
        stats.total_cached, stats.pending_requests
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
